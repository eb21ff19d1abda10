//! Definition of an existing instance that needs injections

use super::{Definition, ObjectDefinition};
use crate::{Service, error::Error};
use std::fmt::{Display, Formatter};

/// An instance built outside of the container, plus the object
/// definition whose method injections are applied to it
#[derive(Clone)]
pub struct InstanceDefinition {
    instance: Service,
    object: ObjectDefinition
}

impl InstanceDefinition {
    #[inline]
    pub fn new(instance: Service, object: ObjectDefinition) -> Self {
        Self { instance, object }
    }

    #[inline]
    pub fn instance(&self) -> &Service {
        &self.instance
    }

    #[inline]
    pub fn object_definition(&self) -> &ObjectDefinition {
        &self.object
    }

    pub(crate) fn replace_nested_definitions<F>(&mut self, replacer: &mut F) -> Result<(), Error>
    where
        F: FnMut(Definition) -> Result<Definition, Error>
    {
        self.object.replace_nested_definitions(replacer)
    }
}

impl Display for InstanceDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance(class = {})", self.object.class_name())
    }
}
