//! Definition of a precomputed value

use super::SelfResolvingDefinition;
use crate::{Container, Service, error::Error};
use std::sync::Arc;

/// Wraps a value that is already built; it resolves to itself
#[derive(Clone)]
pub struct ValueDefinition {
    value: Service
}

impl ValueDefinition {
    /// Creates a value definition
    #[inline]
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self { value: Arc::new(value) }
    }

    /// Creates a value definition from an already type-erased value
    #[inline]
    pub fn from_service(value: Service) -> Self {
        Self { value }
    }

    #[inline]
    pub fn value(&self) -> &Service {
        &self.value
    }
}

impl SelfResolvingDefinition for ValueDefinition {
    #[inline]
    fn resolve(&self, _: &Container) -> Result<Service, Error> {
        Ok(self.value.clone())
    }

    #[inline]
    fn is_resolvable(&self, _: &Container) -> bool {
        true
    }
}
