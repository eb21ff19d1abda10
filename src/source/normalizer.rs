//! Prepares definitions returned by a source for resolution

use super::Autowiring;
use crate::{
    Definition,
    DefinitionKind,
    TypeParameters,
    definition::ObjectDefinition,
    error::Error
};
use std::sync::Arc;

/// Binds definitions to the requested entry and completes object definitions
#[derive(Clone)]
pub struct DefinitionNormalizer {
    autowiring: Arc<dyn Autowiring>
}

impl DefinitionNormalizer {
    #[inline]
    pub fn new(autowiring: Arc<dyn Autowiring>) -> Self {
        Self { autowiring }
    }

    /// Normalizes a definition found for the entry `name`
    ///
    /// `wildcards` are the substrings captured by a wildcard key, if any.
    pub fn normalize_root_definition(
        &self,
        mut definition: Definition,
        name: &str,
        type_parameters: &TypeParameters,
        wildcards: &[String]
    ) -> Result<Definition, Error> {
        definition.set_name(name);
        definition.set_type_parameters(type_parameters.clone());

        if let DefinitionKind::Object(object) = definition.kind_mut() {
            object.replace_wildcards(wildcards);
            if object.class_name().is_empty() {
                object.set_class_name(name);
            }
            self.autowire(object, type_parameters)?;
        }

        definition.replace_nested_definitions(&mut |nested| self.normalize_nested_definition(nested))?;
        Ok(definition)
    }

    /// Normalizes a definition nested in another one
    pub fn normalize_nested_definition(&self, mut definition: Definition) -> Result<Definition, Error> {
        if let DefinitionKind::Object(object) = definition.kind_mut() {
            self.autowire(object, &TypeParameters::empty())?;
        }

        definition.replace_nested_definitions(&mut |nested| self.normalize_nested_definition(nested))?;
        Ok(definition)
    }

    fn autowire(&self, object: &mut ObjectDefinition, type_parameters: &TypeParameters) -> Result<(), Error> {
        if object.is_autowired() {
            let name = object.class_name().to_owned();
            *object = self.autowiring.autowire(&name, type_parameters, Some(object.clone()))?;
        }
        Ok(())
    }
}
