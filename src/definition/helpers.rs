//! Helpers that build definitions fluently
//!
//! # Example
//! ```
//! use hkt_container::{ContainerBuilder, Definition, helpers::{array, env, get, value}};
//!
//! let container = ContainerBuilder::new()
//!     .add_definitions([
//!         ("db.host", Definition::from(env("HKT_DOC_DB_HOST").or(value(String::from("localhost"))))),
//!         ("hosts", Definition::from(array().item(get("db.host")))),
//!     ])
//!     .build();
//!
//! let host = container.resolve::<String>("db.host").unwrap();
//! assert_eq!(host, "localhost");
//! ```

use super::{
    Arguments,
    ArrayDefinition,
    ArrayKey,
    DecoratorDefinition,
    DecoratorFn,
    Definition,
    EnvironmentVariableDefinition,
    FactoryDefinition,
    ObjectDefinition,
    ParameterInjection,
    Reference,
    ValueDefinition,
};
use crate::{
    Container,
    Service,
    TypeParameters,
    container::{
        factory::{GenericFactory, make_factory_fn},
        from_container::FromContainer,
    },
    error::Error
};
use std::{marker::PhantomData, sync::Arc};

/// Something that can be materialized into a [`Definition`]
/// once the entry name it is registered under is known
pub trait DefinitionHelper {
    /// Builds the definition for the entry `entry_name`
    fn into_definition(self: Box<Self>, entry_name: &str) -> Definition;
}

#[inline]
fn named(mut definition: Definition, entry_name: &str) -> Definition {
    definition.set_name(entry_name);
    definition
}

/// Defines a precomputed value
#[inline]
pub fn value<T: Send + Sync + 'static>(value: T) -> ValueDefinition {
    ValueDefinition::new(value)
}

/// References another entry
#[inline]
pub fn get(target: impl Into<String>) -> Reference {
    Reference::new(target)
}

/// References a generic instantiation of another entry
#[inline]
pub fn get_generic(target: impl Into<String>, type_parameters: TypeParameters) -> Reference {
    Reference::generic(target, type_parameters)
}

/// Defines an entry built by a factory
///
/// Arguments of the factory are extracted with [`FromContainer`].
#[inline]
pub fn factory<F, Args>(factory: F) -> FactoryHelper
where
    F: GenericFactory<Args>,
    F::Output: Send + Sync + 'static,
    Args: FromContainer
{
    FactoryHelper {
        definition: FactoryDefinition::new(make_factory_fn(factory))
    }
}

/// Defines a decorator of the previous definition of the same entry
///
/// The previous value is handed to the decorator as `Arc<T>`.
#[inline]
pub fn decorate<T, R, F>(decorator: F) -> DecorateHelper<T, R, F>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(Arc<T>, &Container) -> Result<R, Error> + Send + Sync + 'static
{
    DecorateHelper {
        decorator,
        _marker: PhantomData
    }
}

/// Reads an environment variable
#[inline]
pub fn env(variable_name: impl Into<String>) -> EnvironmentVariableDefinition {
    EnvironmentVariableDefinition::new(variable_name)
}

/// Defines an object built by its constructor
#[inline]
pub fn create() -> ObjectHelper {
    ObjectHelper { definition: ObjectDefinition::default() }
}

/// Defines an object completed by the autowiring provider
#[inline]
pub fn autowire() -> ObjectHelper {
    ObjectHelper { definition: ObjectDefinition::default().autowired() }
}

/// Defines an array
#[inline]
pub fn array() -> ArrayHelper {
    ArrayHelper { definition: ArrayDefinition::new() }
}

/// Adds items to the previous array definition of the same entry
#[inline]
pub fn add() -> ArrayHelper {
    ArrayHelper { definition: ArrayDefinition::extension() }
}

impl EnvironmentVariableDefinition {
    /// Makes the variable optional with a default value
    #[inline]
    pub fn or(self, default: impl Into<Definition>) -> Self {
        self.with_default(default)
    }
}

/// Built by [`factory`]
pub struct FactoryHelper {
    definition: FactoryDefinition
}

impl FactoryHelper {
    /// Defines a parameter that is resolved and passed to the factory
    #[inline]
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Definition>) -> Self {
        self.definition.set_parameter(name, value);
        self
    }
}

/// Built by [`decorate`]
pub struct DecorateHelper<T, R, F> {
    decorator: F,
    _marker: PhantomData<fn(Arc<T>) -> R>
}

impl<T, R, F> DefinitionHelper for DecorateHelper<T, R, F>
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(Arc<T>, &Container) -> Result<R, Error> + Send + Sync + 'static
{
    fn into_definition(self: Box<Self>, entry_name: &str) -> Definition {
        let name = entry_name.to_owned();
        let decorator = self.decorator;
        let callable: DecoratorFn = Arc::new(move |previous: Service, container: &Container| {
            let previous = previous
                .downcast::<T>()
                .map_err(|_| Error::TypeMismatch {
                    name: name.clone(),
                    expected: std::any::type_name::<T>()
                })?;
            decorator(previous, container).map(|value| Arc::new(value) as Service)
        });
        named(DecoratorDefinition::new(callable).into(), entry_name)
    }
}

impl<T, R, F> From<DecorateHelper<T, R, F>> for Definition
where
    T: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(Arc<T>, &Container) -> Result<R, Error> + Send + Sync + 'static
{
    #[inline]
    fn from(helper: DecorateHelper<T, R, F>) -> Self {
        Box::new(helper).into_definition("")
    }
}

/// Built by [`create`] and [`autowire`]
pub struct ObjectHelper {
    definition: ObjectDefinition
}

impl ObjectHelper {
    /// Sets the class name; defaults to the entry name
    #[inline]
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.definition.set_class_name(class_name);
        self
    }

    /// Sets the constructor
    #[inline]
    pub fn constructor<R, F>(mut self, constructor: F) -> Self
    where
        R: Send + Sync + 'static,
        F: Fn(Arguments) -> Result<R, Error> + Send + Sync + 'static
    {
        self.definition = self.definition.with_constructor(constructor);
        self
    }

    /// Injects a constructor parameter
    #[inline]
    pub fn parameter(mut self, name: impl Into<String>, value: impl Into<Definition>) -> Self {
        self.definition = self.definition.with_parameter(ParameterInjection::with_value(name, value));
        self
    }

    /// Declares a constructor parameter that must be passed to [`Container::make`]
    #[inline]
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.definition = self.definition.with_parameter(ParameterInjection::new(name));
        self
    }

    /// Calls a method on the built object
    #[inline]
    pub fn method<T, F>(mut self, name: impl Into<String>, parameters: Vec<ParameterInjection>, method: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T, Arguments) -> Result<(), Error> + Send + Sync + 'static
    {
        self.definition = self.definition.with_method(name, parameters, method);
        self
    }
}

/// Built by [`array`] and [`add`]
pub struct ArrayHelper {
    definition: ArrayDefinition
}

impl ArrayHelper {
    /// Appends a positional item
    #[inline]
    pub fn item(mut self, item: impl Into<Definition>) -> Self {
        self.definition.push(item);
        self
    }

    /// Sets a keyed item
    #[inline]
    pub fn entry(mut self, key: impl Into<ArrayKey>, item: impl Into<Definition>) -> Self {
        self.definition.insert(key, item);
        self
    }
}

macro_rules! impl_definition_helper {
    ($($helper:ty => |$this:ident| $definition:expr),* $(,)?) => {
        $(impl DefinitionHelper for $helper {
            #[inline]
            fn into_definition(self: Box<Self>, entry_name: &str) -> Definition {
                let $this = *self;
                named($definition, entry_name)
            }
        })*
    };
}

impl_definition_helper! {
    ValueDefinition => |this| this.into(),
    Reference => |this| this.into(),
    EnvironmentVariableDefinition => |this| this.into(),
    ObjectDefinition => |this| this.into(),
    ArrayDefinition => |this| this.into(),
    FactoryHelper => |this| this.definition.into(),
    ObjectHelper => |this| this.definition.into(),
    ArrayHelper => |this| this.definition.into(),
}

macro_rules! impl_from_helper {
    ($($helper:ty),* $(,)?) => {
        $(impl From<$helper> for Definition {
            #[inline]
            fn from(helper: $helper) -> Self {
                helper.definition.into()
            }
        })*
    };
}

impl_from_helper! { FactoryHelper, ObjectHelper, ArrayHelper }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DefinitionKind;

    #[test]
    fn it_binds_helpers_to_entry_name() {
        let definition = Box::new(factory(|| 42)).into_definition("answer");

        assert_eq!(definition.name(), "answer");
        assert!(matches!(definition.kind(), DefinitionKind::Factory(_)));
    }

    #[test]
    fn it_builds_arrays() {
        let definition = Definition::from(array()
            .item(get("a"))
            .entry("b", value(1)));

        assert_eq!(definition.to_string(), "[0 => get(a), 'b' => Value]");
        assert!(Definition::from(add()).extends_previous());
    }

    #[test]
    fn it_builds_env_with_default() {
        let definition = Definition::from(env("HOME").or(value("/root")));

        assert_eq!(definition.to_string(), "env(HOME, default = Value)");
    }

    #[test]
    fn it_builds_autowired_objects() {
        let definition = Definition::from(autowire().class("Mailer"));

        let DefinitionKind::Object(object) = definition.kind() else {
            panic!("expected an object definition");
        };

        assert!(object.is_autowired());
        assert_eq!(object.class_name(), "Mailer");
    }
}
