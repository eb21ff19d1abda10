//! Reference to another container entry

use super::{SelfResolvingDefinition, entry_label};
use crate::{Container, Service, TypeParameters, error::Error};
use std::fmt::{Display, Formatter};

/// Points to another entry; resolving it is the same as getting the target
#[derive(Debug, Clone)]
pub struct Reference {
    target: String,
    type_parameters: TypeParameters
}

impl Reference {
    /// Creates a reference to a non-generic entry
    #[inline]
    pub fn new(target: impl Into<String>) -> Self {
        Self::generic(target, TypeParameters::empty())
    }

    /// Creates a reference to a generic instantiation of an entry
    #[inline]
    pub fn generic(target: impl Into<String>, type_parameters: TypeParameters) -> Self {
        Self { target: target.into(), type_parameters }
    }

    #[inline]
    pub fn target_name(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn target_type_parameters(&self) -> &TypeParameters {
        &self.type_parameters
    }
}

impl SelfResolvingDefinition for Reference {
    #[inline]
    fn resolve(&self, container: &Container) -> Result<Service, Error> {
        container.get_generic(&self.target, &self.type_parameters)
    }

    #[inline]
    fn is_resolvable(&self, container: &Container) -> bool {
        container.has_generic(&self.target, &self.type_parameters)
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "get({})", entry_label(&self.target, &self.type_parameters))
    }
}
