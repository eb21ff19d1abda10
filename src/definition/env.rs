//! Definition of an environment variable

use super::{Definition, replace_nested};
use crate::error::Error;
use std::fmt::{Display, Formatter};

/// Reads an environment variable; a default value makes it optional
#[derive(Clone)]
pub struct EnvironmentVariableDefinition {
    variable_name: String,
    default: Option<Box<Definition>>
}

impl EnvironmentVariableDefinition {
    #[inline]
    pub fn new(variable_name: impl Into<String>) -> Self {
        Self {
            variable_name: variable_name.into(),
            default: None
        }
    }

    /// Sets the value used when the variable is not defined
    #[inline]
    pub fn with_default(mut self, default: impl Into<Definition>) -> Self {
        self.default = Some(Box::new(default.into()));
        self
    }

    #[inline]
    pub fn variable_name(&self) -> &str {
        &self.variable_name
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub fn default_value(&self) -> Option<&Definition> {
        self.default.as_deref()
    }

    pub(crate) fn replace_nested_definitions<F>(&mut self, replacer: &mut F) -> Result<(), Error>
    where
        F: FnMut(Definition) -> Result<Definition, Error>
    {
        match self.default.as_deref_mut() {
            Some(default) => replace_nested(default, replacer),
            None => Ok(())
        }
    }
}

impl Display for EnvironmentVariableDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.default {
            Some(default) => write!(f, "env({}, default = {default})", self.variable_name),
            None => write!(f, "env({})", self.variable_name),
        }
    }
}
