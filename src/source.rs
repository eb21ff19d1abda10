//! Definition sources and the chain that combines them

use crate::{Definition, TypeParameters, error::Error};

pub use self::{
    array::DefinitionArray,
    autowiring::{Autowiring, NoAutowiring, RegistryAutowiring},
    chain::SourceChain,
    normalizer::DefinitionNormalizer,
};

mod array;
mod autowiring;
mod chain;
mod normalizer;

/// A source of definitions
pub trait DefinitionSource: Send + Sync {
    /// Returns `true` if the source can provide a definition for the entry,
    /// wildcard keys included
    fn has_definition(&self, name: &str, type_parameters: &TypeParameters) -> bool;

    /// Returns `true` if the source has a definition registered under the exact entry name
    fn has_exact_definition(&self, name: &str, type_parameters: &TypeParameters) -> bool {
        self.has_definition(name, type_parameters)
    }

    /// Returns the definition of the entry, wildcard keys included
    fn get_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Option<Definition>, Error>;

    /// Returns the definition registered under the exact entry name and type parameters
    fn get_exact_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Option<Definition>, Error> {
        self.get_definition(name, type_parameters)
    }

    /// Returns the definition registered without type parameters,
    /// which serves every instantiation of the entry
    fn get_untyped_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Option<Definition>, Error> {
        if type_parameters.has_type_parameters() {
            self.get_exact_definition(name, &TypeParameters::empty())
        } else {
            Ok(None)
        }
    }

    /// Returns every definition of the source, wildcard keys excluded
    fn definitions(&self) -> Vec<Definition>;
}

/// A source definitions can be added to at runtime
pub trait MutableDefinitionSource: DefinitionSource {
    /// Adds or replaces a definition; it is keyed by its name and type parameters
    fn add_definition(&self, definition: Definition);
}
