//! Factory and decorator definitions

use super::{Definition, replace_nested};
use crate::{Container, FactoryContext, Service, error::Error};
use indexmap::IndexMap;
use std::sync::Arc;

/// A type-erased factory callable
pub type FactoryFn = Arc<
    dyn Fn(&FactoryContext<'_>) -> Result<Service, Error>
    + Send
    + Sync
>;

/// A type-erased decorator callable, invoked with the previous value and the container
pub type DecoratorFn = Arc<
    dyn Fn(Service, &Container) -> Result<Service, Error>
    + Send
    + Sync
>;

/// Builds an entry by calling a factory
///
/// Factory parameters are nested definitions resolved right before
/// the call and exposed through [`FactoryContext::parameters`].
#[derive(Clone, Default)]
pub struct FactoryDefinition {
    callable: Option<FactoryFn>,
    parameters: IndexMap<String, Definition>
}

impl FactoryDefinition {
    #[inline]
    pub fn new(callable: FactoryFn) -> Self {
        Self {
            callable: Some(callable),
            parameters: IndexMap::new()
        }
    }

    #[inline]
    pub fn callable(&self) -> Option<&FactoryFn> {
        self.callable.as_ref()
    }

    /// Defines a parameter passed to the factory
    #[inline]
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Definition>) {
        self.parameters.insert(name.into(), value.into());
    }

    #[inline]
    pub fn parameters(&self) -> &IndexMap<String, Definition> {
        &self.parameters
    }

    pub(crate) fn replace_nested_definitions<F>(&mut self, replacer: &mut F) -> Result<(), Error>
    where
        F: FnMut(Definition) -> Result<Definition, Error>
    {
        self.parameters
            .values_mut()
            .try_for_each(|parameter| replace_nested(parameter, replacer))
    }
}

/// Decorates the previous definition of the same entry
#[derive(Clone, Default)]
pub struct DecoratorDefinition {
    callable: Option<DecoratorFn>,
    decorated: Option<Box<Definition>>
}

impl DecoratorDefinition {
    #[inline]
    pub fn new(callable: DecoratorFn) -> Self {
        Self {
            callable: Some(callable),
            decorated: None
        }
    }

    #[inline]
    pub fn callable(&self) -> Option<&DecoratorFn> {
        self.callable.as_ref()
    }

    /// Returns the decorated definition, if the source chain found one
    #[inline]
    pub fn decorated_definition(&self) -> Option<&Definition> {
        self.decorated.as_deref()
    }

    #[inline]
    pub(crate) fn set_decorated_definition(&mut self, definition: Definition) {
        self.decorated = Some(Box::new(definition));
    }
}
