//! Definitions describe how a container entry is produced

use crate::{Container, Service, TypeParameters, error::Error};
use std::fmt::{Debug, Display, Formatter};

pub use self::{
    array::{Array, ArrayDefinition, ArrayKey},
    env::EnvironmentVariableDefinition,
    factory::{DecoratorDefinition, DecoratorFn, FactoryDefinition, FactoryFn},
    instance::InstanceDefinition,
    object::{Arguments, ConstructorFn, MethodFn, MethodInjection, ObjectDefinition, ParameterInjection},
    reference::Reference,
    value::ValueDefinition,
};

pub mod helpers;
mod array;
mod env;
mod factory;
mod instance;
mod object;
mod reference;
mod value;

/// A definition that resolves itself without a dedicated resolver
pub trait SelfResolvingDefinition {
    /// Resolves the definition against the container
    fn resolve(&self, container: &Container) -> Result<Service, Error>;

    /// Checks whether the definition can be resolved
    fn is_resolvable(&self, container: &Container) -> bool;
}

/// The container entry that was requested
///
/// Factories can take it as an argument to know which name and
/// type parameters they are building for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedEntry {
    name: String,
    type_parameters: TypeParameters
}

impl RequestedEntry {
    #[inline]
    pub fn new(name: impl Into<String>, type_parameters: TypeParameters) -> Self {
        Self { name: name.into(), type_parameters }
    }

    /// Returns the name of the requested entry
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type parameters of the requested entry
    #[inline]
    pub fn type_parameters(&self) -> &TypeParameters {
        &self.type_parameters
    }
}

/// Cache key of an entry: its name plus the digest of non-empty type parameters
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct EntryKey {
    name: String,
    digest: Option<u64>
}

impl EntryKey {
    #[inline]
    pub(crate) fn new(name: &str, type_parameters: &TypeParameters) -> Self {
        Self {
            name: name.into(),
            digest: type_parameters
                .has_type_parameters()
                .then(|| type_parameters.digest())
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

/// All the ways an entry can be defined
#[derive(Clone)]
pub enum DefinitionKind {
    Value(ValueDefinition),
    Reference(Reference),
    Array(ArrayDefinition),
    Factory(FactoryDefinition),
    Decorator(DecoratorDefinition),
    EnvironmentVariable(EnvironmentVariableDefinition),
    Object(ObjectDefinition),
    Instance(InstanceDefinition),
}

/// Describes how to produce one container entry
///
/// The `name` is empty until the definition is registered and the
/// type parameters are assigned when the definition is looked up.
#[derive(Clone)]
pub struct Definition {
    name: String,
    type_parameters: TypeParameters,
    kind: DefinitionKind
}

macro_rules! impl_from_kind {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for DefinitionKind {
            #[inline]
            fn from(definition: $ty) -> Self {
                DefinitionKind::$variant(definition)
            }
        }

        impl From<$ty> for Definition {
            #[inline]
            fn from(definition: $ty) -> Self {
                Definition::new(DefinitionKind::$variant(definition))
            }
        })*
    };
}

impl_from_kind! {
    Value(ValueDefinition),
    Reference(Reference),
    Array(ArrayDefinition),
    Factory(FactoryDefinition),
    Decorator(DecoratorDefinition),
    EnvironmentVariable(EnvironmentVariableDefinition),
    Object(ObjectDefinition),
    Instance(InstanceDefinition),
}

impl Definition {
    /// Creates an unnamed definition without type parameters
    #[inline]
    pub fn new(kind: DefinitionKind) -> Self {
        Self {
            name: String::new(),
            type_parameters: TypeParameters::empty(),
            kind
        }
    }

    /// Creates a definition of a precomputed value
    #[inline]
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        ValueDefinition::new(value).into()
    }

    /// Returns the entry name, empty if the definition is not registered
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn type_parameters(&self) -> &TypeParameters {
        &self.type_parameters
    }

    #[inline]
    pub fn set_type_parameters(&mut self, type_parameters: TypeParameters) {
        self.type_parameters = type_parameters;
    }

    /// Sets the type parameters and returns the definition
    #[inline]
    pub fn with_type_parameters(mut self, type_parameters: TypeParameters) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    #[inline]
    pub fn kind(&self) -> &DefinitionKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut DefinitionKind {
        &mut self.kind
    }

    #[inline]
    pub fn into_kind(self) -> DefinitionKind {
        self.kind
    }

    /// Returns the requested entry this definition answers
    #[inline]
    pub fn requested_entry(&self) -> RequestedEntry {
        RequestedEntry::new(self.name.clone(), self.type_parameters.clone())
    }

    #[inline]
    pub(crate) fn key(&self) -> EntryKey {
        EntryKey::new(&self.name, &self.type_parameters)
    }

    /// Human-readable entry identity, e.g. `Repo<User>`
    pub(crate) fn label(&self) -> String {
        entry_label(&self.name, &self.type_parameters)
    }

    /// Returns `true` if the definition must be composed with the
    /// previous definition of the same entry
    #[inline]
    pub fn extends_previous(&self) -> bool {
        match &self.kind {
            DefinitionKind::Decorator(_) => true,
            DefinitionKind::Array(array) => array.is_extension(),
            _ => false
        }
    }

    /// Attaches the previous definition of the same entry
    pub(crate) fn set_extended_definition(&mut self, previous: Definition) -> Result<(), Error> {
        match &mut self.kind {
            DefinitionKind::Decorator(decorator) => {
                decorator.set_decorated_definition(previous);
                Ok(())
            },
            DefinitionKind::Array(array) if array.is_extension() => match previous.kind {
                DefinitionKind::Array(previous) => {
                    array.extend_previous(previous);
                    Ok(())
                },
                _ => Err(Error::invalid(format!(
                    "Definition '{}' tries to add array entries but the previous definition is not an array",
                    self.name
                )))
            },
            _ => Ok(())
        }
    }

    /// Replaces every definition nested in this one
    pub(crate) fn replace_nested_definitions<F>(&mut self, replacer: &mut F) -> Result<(), Error>
    where
        F: FnMut(Definition) -> Result<Definition, Error>
    {
        match &mut self.kind {
            DefinitionKind::Array(array) => array.replace_nested_definitions(replacer),
            DefinitionKind::Factory(factory) => factory.replace_nested_definitions(replacer),
            DefinitionKind::EnvironmentVariable(env) => env.replace_nested_definitions(replacer),
            DefinitionKind::Object(object) => object.replace_nested_definitions(replacer),
            DefinitionKind::Instance(instance) => instance.replace_nested_definitions(replacer),
            DefinitionKind::Value(_)
            | DefinitionKind::Reference(_)
            | DefinitionKind::Decorator(_) => Ok(())
        }
    }
}

#[inline]
pub(crate) fn entry_label(name: &str, type_parameters: &TypeParameters) -> String {
    if type_parameters.has_type_parameters() {
        format!("{name}<{type_parameters}>")
    } else {
        name.into()
    }
}

pub(crate) fn replace_nested<F>(definition: &mut Definition, replacer: &mut F) -> Result<(), Error>
where
    F: FnMut(Definition) -> Result<Definition, Error>
{
    let nested = std::mem::replace(definition, Definition::value(()));
    *definition = replacer(nested)?;
    Ok(())
}

impl Display for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DefinitionKind::Value(_) => f.write_str("Value"),
            DefinitionKind::Reference(reference) => Display::fmt(reference, f),
            DefinitionKind::Array(array) => Display::fmt(array, f),
            DefinitionKind::Factory(_) => write!(f, "Factory({})", self.label()),
            DefinitionKind::Decorator(_) => write!(f, "Decorate({})", self.label()),
            DefinitionKind::EnvironmentVariable(env) => Display::fmt(env, f),
            DefinitionKind::Object(object) => Display::fmt(object, f),
            DefinitionKind::Instance(instance) => Display::fmt(instance, f),
        }
    }
}

impl Debug for Definition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Definition")
            .field("name", &self.name)
            .field("type_parameters", &self.type_parameters)
            .field("kind", &format_args!("{self}"))
            .finish()
    }
}
