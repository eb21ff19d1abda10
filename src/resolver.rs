//! Resolvers turn definitions into values

use crate::{
    Container,
    Definition,
    DefinitionKind,
    Parameters,
    RequestedEntry,
    Service,
    TypeParameters,
    definition::SelfResolvingDefinition,
    error::Error
};
use std::sync::{Arc, OnceLock};

pub use self::{
    array::ArrayResolver,
    decorator::DecoratorResolver,
    env::EnvironmentVariableResolver,
    factory::FactoryResolver,
    instance::InstanceInjector,
    object::ObjectCreator,
};

mod array;
mod decorator;
mod env;
mod factory;
mod instance;
mod object;

/// Reads an environment variable
pub type EnvReader = Arc<
    dyn Fn(&str) -> Option<String>
    + Send
    + Sync
>;

/// Returns the reader of the process environment
#[inline]
pub fn process_env() -> EnvReader {
    Arc::new(|name: &str| std::env::var(name).ok())
}

/// Resolves one kind of definition
pub trait DefinitionResolver<D>: Send + Sync {
    /// Resolves the definition into a value
    fn resolve(&self, definition: &D, resolution: &Resolution<'_>) -> Result<Service, Error>;

    /// Checks whether the definition can be resolved, without side effects
    fn is_resolvable(&self, definition: &D, resolution: &Resolution<'_>) -> bool;
}

/// Everything a resolver needs to know about the ongoing resolution
pub struct Resolution<'a> {
    container: &'a Container,
    dispatcher: &'a ResolverDispatcher,
    definition: &'a Definition,
    parameters: &'a Parameters
}

impl<'a> Resolution<'a> {
    #[inline]
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The definition being resolved
    #[inline]
    pub fn definition(&self) -> &'a Definition {
        self.definition
    }

    /// Parameters passed explicitly to [`Container::make`]
    #[inline]
    pub fn parameters(&self) -> &'a Parameters {
        self.parameters
    }

    #[inline]
    pub fn name(&self) -> &'a str {
        self.definition.name()
    }

    #[inline]
    pub fn type_parameters(&self) -> &'a TypeParameters {
        self.definition.type_parameters()
    }

    #[inline]
    pub fn requested_entry(&self) -> RequestedEntry {
        self.definition.requested_entry()
    }

    /// Resolves a definition nested in the current one
    #[inline]
    pub fn resolve_nested(&self, definition: &Definition) -> Result<Service, Error> {
        self.dispatcher.resolve(self.container, definition, &Parameters::new())
    }

    #[inline]
    pub(crate) fn dispatcher(&self) -> &'a ResolverDispatcher {
        self.dispatcher
    }

    #[inline]
    pub(crate) fn label(&self) -> String {
        self.definition.label()
    }
}

/// Dispatches a definition to the resolver of its kind
///
/// Every resolver is created on first use and kept for the lifetime of the dispatcher.
pub struct ResolverDispatcher {
    env_reader: EnvReader,
    array: OnceLock<ArrayResolver>,
    factory: OnceLock<FactoryResolver>,
    decorator: OnceLock<DecoratorResolver>,
    env: OnceLock<EnvironmentVariableResolver>,
    object: OnceLock<ObjectCreator>,
    instance: OnceLock<InstanceInjector>
}

impl Default for ResolverDispatcher {
    #[inline]
    fn default() -> Self {
        Self::new(process_env())
    }
}

impl std::fmt::Debug for ResolverDispatcher {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ResolverDispatcher(..)")
    }
}

impl ResolverDispatcher {
    /// Creates a dispatcher that reads environment variables with `env_reader`
    #[inline]
    pub fn new(env_reader: EnvReader) -> Self {
        Self {
            env_reader,
            array: OnceLock::new(),
            factory: OnceLock::new(),
            decorator: OnceLock::new(),
            env: OnceLock::new(),
            object: OnceLock::new(),
            instance: OnceLock::new()
        }
    }

    /// Resolves a definition
    pub fn resolve(&self, container: &Container, definition: &Definition, parameters: &Parameters) -> Result<Service, Error> {
        #[cfg(feature = "tracing")]
        tracing::trace!("resolving {definition:?}");

        let resolution = Resolution { container, dispatcher: self, definition, parameters };
        match definition.kind() {
            // values and references resolve themselves
            DefinitionKind::Value(value) => value.resolve(container),
            DefinitionKind::Reference(reference) => reference.resolve(container),
            DefinitionKind::Array(array) => self.array().resolve(array, &resolution),
            DefinitionKind::Factory(factory) => self.factory().resolve(factory, &resolution),
            DefinitionKind::Decorator(decorator) => self.decorator().resolve(decorator, &resolution),
            DefinitionKind::EnvironmentVariable(env) => self.env().resolve(env, &resolution),
            DefinitionKind::Object(object) => self.object().resolve(object, &resolution),
            DefinitionKind::Instance(instance) => self.instance().resolve(instance, &resolution),
        }
    }

    /// Checks whether a definition can be resolved
    pub fn is_resolvable(&self, container: &Container, definition: &Definition, parameters: &Parameters) -> bool {
        let resolution = Resolution { container, dispatcher: self, definition, parameters };
        match definition.kind() {
            DefinitionKind::Value(value) => value.is_resolvable(container),
            DefinitionKind::Reference(reference) => reference.is_resolvable(container),
            DefinitionKind::Array(array) => self.array().is_resolvable(array, &resolution),
            DefinitionKind::Factory(factory) => self.factory().is_resolvable(factory, &resolution),
            DefinitionKind::Decorator(decorator) => self.decorator().is_resolvable(decorator, &resolution),
            DefinitionKind::EnvironmentVariable(env) => self.env().is_resolvable(env, &resolution),
            DefinitionKind::Object(object) => self.object().is_resolvable(object, &resolution),
            DefinitionKind::Instance(instance) => self.instance().is_resolvable(instance, &resolution),
        }
    }

    #[inline]
    fn array(&self) -> &ArrayResolver {
        self.array.get_or_init(|| ArrayResolver)
    }

    #[inline]
    fn factory(&self) -> &FactoryResolver {
        self.factory.get_or_init(|| FactoryResolver)
    }

    #[inline]
    fn decorator(&self) -> &DecoratorResolver {
        self.decorator.get_or_init(|| DecoratorResolver)
    }

    #[inline]
    fn env(&self) -> &EnvironmentVariableResolver {
        self.env.get_or_init(|| EnvironmentVariableResolver::new(self.env_reader.clone()))
    }

    #[inline]
    fn object(&self) -> &ObjectCreator {
        self.object.get_or_init(|| ObjectCreator)
    }

    #[inline]
    fn instance(&self) -> &InstanceInjector {
        self.instance.get_or_init(|| InstanceInjector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ContainerBuilder,
        definition::{DecoratorDefinition, FactoryDefinition},
        helpers::{create, env, get, value}
    };

    fn resolvable(dispatcher: &ResolverDispatcher, container: &Container, definition: impl Into<Definition>) -> bool {
        dispatcher.is_resolvable(container, &definition.into(), &Parameters::new())
    }

    #[test]
    fn it_checks_resolvability_without_side_effects() {
        let container = ContainerBuilder::new().build();
        container.set("target", value(1));
        let dispatcher = ResolverDispatcher::new(Arc::new(|_: &str| None::<String>));

        assert!(resolvable(&dispatcher, &container, value(1)));
        assert!(resolvable(&dispatcher, &container, get("target")));
        assert!(!resolvable(&dispatcher, &container, get("missing")));
        assert!(!resolvable(&dispatcher, &container, FactoryDefinition::default()));
        assert!(!resolvable(&dispatcher, &container, DecoratorDefinition::default()));
        assert!(!resolvable(&dispatcher, &container, env("HOME")));
        assert!(resolvable(&dispatcher, &container, env("HOME").or(value("/root"))));
        assert!(!resolvable(&dispatcher, &container, create()));
        assert!(resolvable(&dispatcher, &container, create().constructor(|_| Ok(()))));
    }

    #[test]
    fn it_resolves_self_resolving_definitions() {
        let container = ContainerBuilder::new().build();
        container.set("target", value(7));
        let dispatcher = ResolverDispatcher::default();

        let resolved = dispatcher
            .resolve(&container, &get("target").into(), &Parameters::new())
            .unwrap();

        assert_eq!(resolved.downcast_ref::<i32>(), Some(&7));
    }
}
