//! In-memory definition source

use super::{Autowiring, DefinitionNormalizer, DefinitionSource, MutableDefinitionSource, NoAutowiring};
use crate::{
    Definition,
    TypeParameters,
    definition::EntryKey,
    error::Error
};
use indexmap::IndexMap;
use regex::Regex;
use std::sync::{Arc, PoisonError, RwLock};

const WILDCARD: char = '*';
const WILDCARD_PATTERN: &str = "([^:]+)";

/// A definition registered under a key that contains wildcards
struct WildcardDefinition {
    pattern: Regex,
    definition: Definition
}

/// Definitions held in memory, keyed by entry name and type parameters
///
/// A key may contain any number of `*` wildcards, each matching one or more
/// characters other than the `:` path separator; the captures replace the
/// `*` tokens of an object's class name in order. A definition registered
/// without type parameters serves every instantiation of its entry that has
/// no definition of its own.
pub struct DefinitionArray {
    definitions: RwLock<IndexMap<EntryKey, Definition>>,
    wildcards: RwLock<Option<Arc<[WildcardDefinition]>>>,
    normalizer: DefinitionNormalizer
}

impl Default for DefinitionArray {
    #[inline]
    fn default() -> Self {
        Self::new(Arc::new(NoAutowiring))
    }
}

impl DefinitionArray {
    /// Creates an empty source
    #[inline]
    pub fn new(autowiring: Arc<dyn Autowiring>) -> Self {
        Self {
            definitions: RwLock::new(IndexMap::new()),
            wildcards: RwLock::new(None),
            normalizer: DefinitionNormalizer::new(autowiring)
        }
    }

    /// Creates a source from named definitions
    pub fn with_definitions<I>(autowiring: Arc<dyn Autowiring>, definitions: I) -> Self
    where
        I: IntoIterator<Item = Definition>
    {
        let definitions = definitions
            .into_iter()
            .map(|definition| (definition.key(), definition))
            .collect();
        Self {
            definitions: RwLock::new(definitions),
            wildcards: RwLock::new(None),
            normalizer: DefinitionNormalizer::new(autowiring)
        }
    }

    fn find_exact(&self, name: &str, type_parameters: &TypeParameters) -> Option<Definition> {
        let definitions = self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        definitions
            .get(&EntryKey::new(name, type_parameters))
            .cloned()
    }

    fn find_wildcard(&self, name: &str) -> Option<(Definition, Vec<String>)> {
        self.wildcards()
            .iter()
            .find_map(|wildcard| {
                let captures = wildcard.pattern.captures(name)?;
                let captures = captures
                    .iter()
                    .skip(1)
                    .flatten()
                    .map(|capture| capture.as_str().to_owned())
                    .collect();
                Some((wildcard.definition.clone(), captures))
            })
    }

    fn wildcards(&self) -> Arc<[WildcardDefinition]> {
        if let Some(wildcards) = self.wildcards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref() {
            return wildcards.clone();
        }

        let mut cache = self.wildcards
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        cache
            .get_or_insert_with(|| self.compile_wildcards())
            .clone()
    }

    fn compile_wildcards(&self) -> Arc<[WildcardDefinition]> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(key, _)| key.name().contains(WILDCARD))
            .filter_map(|(key, definition)| {
                let pattern = compile_pattern(key.name())?;
                Some(WildcardDefinition { pattern, definition: definition.clone() })
            })
            .collect()
    }
}

/// Compiles `app::*Repository` into `^app::([^:]+)Repository$`
fn compile_pattern(key: &str) -> Option<Regex> {
    let pattern = key
        .split(WILDCARD)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(WILDCARD_PATTERN);
    Regex::new(&format!("^{pattern}$")).ok()
}

impl DefinitionSource for DefinitionArray {
    fn has_definition(&self, name: &str, type_parameters: &TypeParameters) -> bool {
        self.has_exact_definition(name, type_parameters)
            || self.has_exact_definition(name, &TypeParameters::empty())
            || self
            .wildcards()
            .iter()
            .any(|wildcard| wildcard.pattern.is_match(name))
    }

    fn has_exact_definition(&self, name: &str, type_parameters: &TypeParameters) -> bool {
        let definitions = self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        definitions.contains_key(&EntryKey::new(name, type_parameters))
    }

    fn get_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Option<Definition>, Error> {
        if let Some(definition) = self.get_exact_definition(name, type_parameters)? {
            return Ok(Some(definition));
        }
        if let Some(definition) = self.get_untyped_definition(name, type_parameters)? {
            return Ok(Some(definition));
        }
        self.find_wildcard(name)
            .map(|(definition, captures)| self.normalizer
                .normalize_root_definition(definition, name, type_parameters, &captures))
            .transpose()
    }

    fn get_exact_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Option<Definition>, Error> {
        self.find_exact(name, type_parameters)
            .map(|definition| self.normalizer
                .normalize_root_definition(definition, name, type_parameters, &[]))
            .transpose()
    }

    fn get_untyped_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Option<Definition>, Error> {
        if !type_parameters.has_type_parameters() {
            return Ok(None);
        }
        self.find_exact(name, &TypeParameters::empty())
            .map(|definition| self.normalizer
                .normalize_root_definition(definition, name, type_parameters, &[]))
            .transpose()
    }

    fn definitions(&self) -> Vec<Definition> {
        self.definitions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(key, _)| !key.name().contains(WILDCARD))
            .map(|(_, definition)| definition.clone())
            .collect()
    }
}

impl MutableDefinitionSource for DefinitionArray {
    fn add_definition(&self, definition: Definition) {
        let is_wildcard = definition.name().contains(WILDCARD);
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.key(), definition);
        if is_wildcard {
            *self.wildcards
                .write()
                .unwrap_or_else(PoisonError::into_inner) = None;
        }
    }
}
