//! Metadata providers that complete object definitions

use super::DefinitionSource;
use crate::{
    Definition,
    TypeParameters,
    definition::ObjectDefinition,
    error::Error
};
use indexmap::IndexMap;
use std::sync::{PoisonError, RwLock};

/// Provides the construction metadata of a class
pub trait Autowiring: Send + Sync {
    /// Completes `existing`, or builds a definition from scratch when there is none
    ///
    /// Implementations must be idempotent. Fails [`Error::NotFound`]
    /// when nothing is known about the class and there is no existing definition.
    fn autowire(
        &self,
        name: &str,
        type_parameters: &TypeParameters,
        existing: Option<ObjectDefinition>
    ) -> Result<ObjectDefinition, Error>;
}

/// Autowiring is disabled: every request fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAutowiring;

impl Autowiring for NoAutowiring {
    #[inline]
    fn autowire(&self, name: &str, _: &TypeParameters, _: Option<ObjectDefinition>) -> Result<ObjectDefinition, Error> {
        Err(Error::invalid(format!(
            "Cannot autowire entry \"{name}\" because autowiring is disabled"
        )))
    }
}

impl DefinitionSource for NoAutowiring {
    #[inline]
    fn has_definition(&self, _: &str, _: &TypeParameters) -> bool {
        false
    }

    #[inline]
    fn get_definition(&self, _: &str, _: &TypeParameters) -> Result<Option<Definition>, Error> {
        Ok(None)
    }

    #[inline]
    fn definitions(&self) -> Vec<Definition> {
        Vec::new()
    }
}

/// An explicit registry of class names and how to construct them
///
/// # Example
/// ```
/// use hkt_container::{
///     ContainerBuilder,
///     definition::ObjectDefinition,
///     source::RegistryAutowiring,
/// };
///
/// struct Clock;
///
/// let registry = RegistryAutowiring::new()
///     .with(ObjectDefinition::new("Clock").with_constructor(|_| Ok(Clock)));
///
/// let container = ContainerBuilder::new()
///     .with_autowiring(registry)
///     .build();
///
/// assert!(container.has("Clock"));
/// assert!(container.resolve_shared::<Clock>("Clock").is_ok());
/// ```
#[derive(Default)]
pub struct RegistryAutowiring {
    classes: RwLock<IndexMap<String, ObjectDefinition>>
}

impl RegistryAutowiring {
    /// Creates an empty registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class and returns the registry
    #[inline]
    pub fn with(self, object: ObjectDefinition) -> Self {
        self.register(object);
        self
    }

    /// Registers a class, keyed by its class name
    pub fn register(&self, object: ObjectDefinition) {
        self.classes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(object.class_name().to_owned(), object);
    }

    /// Returns `true` if the class is registered
    #[inline]
    pub fn is_registered(&self, class_name: &str) -> bool {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(class_name)
    }
}

impl Autowiring for RegistryAutowiring {
    fn autowire(
        &self,
        name: &str,
        type_parameters: &TypeParameters,
        existing: Option<ObjectDefinition>
    ) -> Result<ObjectDefinition, Error> {
        let classes = self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let class_name = existing
            .as_ref()
            .map(ObjectDefinition::class_name)
            .filter(|class_name| !class_name.is_empty())
            .unwrap_or(name);

        match (classes.get(class_name), existing) {
            (Some(metadata), Some(mut existing)) => {
                existing.complete_constructor_injection(metadata);
                Ok(existing)
            },
            (Some(metadata), None) => Ok(metadata.clone()),
            (None, Some(existing)) => Ok(existing),
            (None, None) => Err(Error::not_found(name, type_parameters)),
        }
    }
}

impl DefinitionSource for RegistryAutowiring {
    #[inline]
    fn has_definition(&self, name: &str, _: &TypeParameters) -> bool {
        self.is_registered(name)
    }

    fn get_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Option<Definition>, Error> {
        if !self.is_registered(name) {
            return Ok(None);
        }
        let mut definition = Definition::from(self.autowire(name, type_parameters, None)?);
        definition.set_name(name);
        definition.set_type_parameters(type_parameters.clone());
        Ok(Some(definition))
    }

    fn definitions(&self) -> Vec<Definition> {
        self.classes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(class_name, object)| {
                let mut definition = Definition::from(object.clone());
                definition.set_name(class_name.as_str());
                definition
            })
            .collect()
    }
}
