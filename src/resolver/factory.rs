//! Resolves factory definitions

use super::{DefinitionResolver, Resolution};
use crate::{
    FactoryContext,
    Service,
    definition::FactoryDefinition,
    error::Error
};

/// Calls the factory with its resolved parameters
///
/// Parameters passed to [`crate::Container::make`] take precedence
/// over the parameters defined on the factory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FactoryResolver;

impl DefinitionResolver<FactoryDefinition> for FactoryResolver {
    fn resolve(&self, factory: &FactoryDefinition, resolution: &Resolution<'_>) -> Result<Service, Error> {
        let callable = factory
            .callable()
            .ok_or_else(|| Error::invalid(format!(
                "Entry \"{}\" cannot be resolved: factory is not callable",
                resolution.label()
            )))?;

        let mut parameters = resolution.parameters().clone();
        for (name, definition) in factory.parameters() {
            if !parameters.contains_key(name) {
                parameters.insert(name.clone(), resolution.resolve_nested(definition)?);
            }
        }

        let entry = resolution.requested_entry();
        callable(&FactoryContext::new(resolution.container(), &entry, &parameters))
    }

    #[inline]
    fn is_resolvable(&self, factory: &FactoryDefinition, _: &Resolution<'_>) -> bool {
        factory.callable().is_some()
    }
}
