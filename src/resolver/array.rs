//! Resolves array definitions

use super::{DefinitionResolver, Resolution};
use crate::{
    Service,
    definition::{Array, ArrayDefinition},
    error::Error
};
use std::sync::Arc;

/// Resolves every item of an array, in order
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayResolver;

impl DefinitionResolver<ArrayDefinition> for ArrayResolver {
    fn resolve(&self, array: &ArrayDefinition, resolution: &Resolution<'_>) -> Result<Service, Error> {
        let values = array
            .values()
            .iter()
            .map(|(key, item)| Ok((key.clone(), resolution.resolve_nested(item)?)))
            .collect::<Result<Array, Error>>()?;
        Ok(Arc::new(values))
    }

    #[inline]
    fn is_resolvable(&self, _: &ArrayDefinition, _: &Resolution<'_>) -> bool {
        true
    }
}
