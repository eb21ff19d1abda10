//! Resolves environment variable definitions

use super::{DefinitionResolver, EnvReader, Resolution};
use crate::{
    Service,
    definition::EnvironmentVariableDefinition,
    error::Error
};
use std::sync::Arc;

/// Reads the variable as a `String`, or resolves its default value
pub struct EnvironmentVariableResolver {
    reader: EnvReader
}

impl EnvironmentVariableResolver {
    #[inline]
    pub fn new(reader: EnvReader) -> Self {
        Self { reader }
    }
}

impl DefinitionResolver<EnvironmentVariableDefinition> for EnvironmentVariableResolver {
    fn resolve(&self, env: &EnvironmentVariableDefinition, resolution: &Resolution<'_>) -> Result<Service, Error> {
        if let Some(value) = (self.reader)(env.variable_name()) {
            return Ok(Arc::new(value));
        }

        match env.default_value() {
            Some(default) => resolution.resolve_nested(default),
            None => Err(Error::invalid(format!(
                "The environment variable '{}' has not been defined",
                env.variable_name()
            )))
        }
    }

    #[inline]
    fn is_resolvable(&self, env: &EnvironmentVariableDefinition, _: &Resolution<'_>) -> bool {
        env.is_optional() || (self.reader)(env.variable_name()).is_some()
    }
}
