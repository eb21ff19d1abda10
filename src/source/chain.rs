//! Ordered chain of definition sources

use super::{DefinitionArray, DefinitionSource, MutableDefinitionSource};
use crate::{
    Definition,
    TypeParameters,
    definition::EntryKey,
    error::Error
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Looks definitions up in an ordered list of sources
///
/// The mutable source always sits at index `0` and takes priority over
/// every other source. The exact `(name, type parameters)` pair is matched
/// across the whole chain first, then a definition without type parameters,
/// then wildcard keys.
pub struct SourceChain {
    mutable: Arc<dyn MutableDefinitionSource>,
    sources: Vec<Arc<dyn DefinitionSource>>
}

impl Default for SourceChain {
    #[inline]
    fn default() -> Self {
        Self::new(Arc::new(DefinitionArray::default()), Vec::new())
    }
}

impl SourceChain {
    /// Creates a chain; `sources` are given from the highest priority to the lowest
    #[inline]
    pub fn new(mutable: Arc<dyn MutableDefinitionSource>, sources: Vec<Arc<dyn DefinitionSource>>) -> Self {
        Self { mutable, sources }
    }

    /// Replaces the source runtime definitions are added to
    #[inline]
    pub fn set_mutable_definition_source(&mut self, mutable: Arc<dyn MutableDefinitionSource>) {
        self.mutable = mutable;
    }

    /// Number of sources, the mutable one included
    #[inline]
    pub fn len(&self) -> usize {
        self.sources.len() + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    fn source_at(&self, index: usize) -> Option<&dyn DefinitionSource> {
        match index {
            0 => Some(self.mutable.as_ref() as &dyn DefinitionSource),
            index => self.sources.get(index - 1).map(Arc::as_ref)
        }
    }

    /// Returns the definition of the entry
    pub fn get_definition(&self, name: &str, type_parameters: &TypeParameters) -> Result<Definition, Error> {
        self.find_definition(name, type_parameters, 0)?
            .ok_or_else(|| Error::not_found(name, type_parameters))
    }

    /// Looks the definition up in sources starting at `start_index`
    ///
    /// A definition that extends the previous one is composed with the
    /// definition found in the sources after the one it was found in.
    pub fn find_definition(
        &self,
        name: &str,
        type_parameters: &TypeParameters,
        start_index: usize
    ) -> Result<Option<Definition>, Error> {
        let found = self.find_in_sources(start_index, |source| source.get_exact_definition(name, type_parameters))?;
        let found = match found {
            Some(found) => Some(found),
            None => self.find_in_sources(start_index, |source| source.get_untyped_definition(name, type_parameters))?
        };
        let found = match found {
            Some(found) => Some(found),
            None => self.find_in_sources(start_index, |source| source.get_definition(name, type_parameters))?
        };

        let Some((index, mut definition)) = found else {
            return Ok(None);
        };

        definition.set_name(name);
        definition.set_type_parameters(type_parameters.clone());

        if definition.extends_previous()
            && let Some(previous) = self.find_definition(name, type_parameters, index + 1)? {
            definition.set_extended_definition(previous)?;
        }

        Ok(Some(definition))
    }

    fn find_in_sources<F>(&self, start_index: usize, mut lookup: F) -> Result<Option<(usize, Definition)>, Error>
    where
        F: FnMut(&dyn DefinitionSource) -> Result<Option<Definition>, Error>
    {
        for index in start_index..self.len() {
            if let Some(source) = self.source_at(index)
                && let Some(definition) = lookup(source)? {
                return Ok(Some((index, definition)));
            }
        }
        Ok(None)
    }

    /// Returns `true` if any source can provide a definition for the entry
    pub fn has_definition(&self, name: &str, type_parameters: &TypeParameters) -> bool {
        (0..self.len())
            .filter_map(|index| self.source_at(index))
            .any(|source| source.has_definition(name, type_parameters))
    }

    /// Returns the definitions of every source; for the same entry
    /// the source with the highest priority wins
    pub fn definitions(&self) -> Vec<Definition> {
        let mut definitions = IndexMap::<EntryKey, Definition>::new();
        for source in (0..self.len()).filter_map(|index| self.source_at(index)) {
            for definition in source.definitions() {
                definitions
                    .entry(definition.key())
                    .or_insert(definition);
            }
        }
        definitions.into_values().collect()
    }

    /// Adds a definition to the mutable source
    #[inline]
    pub fn add_definition(&self, definition: Definition) {
        self.mutable.add_definition(definition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Container,
        DefinitionKind,
        helpers::{add, array, decorate, get, value}
    };

    fn source(definitions: Vec<(&str, Definition)>) -> Arc<DefinitionArray> {
        let source = DefinitionArray::default();
        for (name, mut definition) in definitions {
            definition.set_name(name);
            source.add_definition(definition);
        }
        Arc::new(source)
    }

    fn chain(sources: Vec<Arc<DefinitionArray>>) -> SourceChain {
        let sources = sources
            .into_iter()
            .map(|source| source as Arc<dyn DefinitionSource>)
            .collect();
        SourceChain::new(Arc::new(DefinitionArray::default()), sources)
    }

    #[test]
    fn it_fails_not_found() {
        let chain = SourceChain::default();

        let err = chain
            .get_definition("missing", &TypeParameters::new(["User"]))
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(!chain.has_definition("missing", &TypeParameters::empty()));
    }

    #[test]
    fn it_gives_mutable_source_priority() {
        let chain = chain(vec![source(vec![("x", get("base").into())])]);
        let mut overlay = Definition::from(get("overlay"));
        overlay.set_name("x");
        chain.add_definition(overlay);

        let definition = chain.get_definition("x", &TypeParameters::empty()).unwrap();

        assert_eq!(definition.to_string(), "get(overlay)");
    }

    #[test]
    fn it_matches_exact_keys_before_wildcards() {
        let chain = chain(vec![
            source(vec![("Repo*", get("wildcard").into())]),
            source(vec![("RepoUser", get("exact").into())]),
        ]);

        let definition = chain.get_definition("RepoUser", &TypeParameters::empty()).unwrap();
        assert_eq!(definition.to_string(), "get(exact)");

        let definition = chain.get_definition("RepoOrder", &TypeParameters::empty()).unwrap();
        assert_eq!(definition.to_string(), "get(wildcard)");
        assert_eq!(definition.name(), "RepoOrder");
    }

    #[test]
    fn it_matches_exact_type_parameters_before_untyped_definitions() {
        let user = TypeParameters::new(["User"]);
        let chain = chain(vec![
            source(vec![("Repo", Definition::from(get("exact")).with_type_parameters(user.clone()))]),
        ]);
        let mut untyped = Definition::from(get("untyped"));
        untyped.set_name("Repo");
        chain.add_definition(untyped);

        let definition = chain.get_definition("Repo", &user).unwrap();
        assert_eq!(definition.to_string(), "get(exact)");

        let definition = chain.get_definition("Repo", &TypeParameters::new(["Order"])).unwrap();
        assert_eq!(definition.to_string(), "get(untyped)");
        assert_eq!(definition.type_parameters(), &TypeParameters::new(["Order"]));
    }

    #[test]
    fn it_extends_previous_definition_from_later_sources() {
        let chain = chain(vec![
            source(vec![("list", add().item(get("b")).into())]),
            source(vec![("list", array().item(get("a")).into())]),
        ]);

        let definition = chain.get_definition("list", &TypeParameters::empty()).unwrap();

        assert_eq!(definition.to_string(), "[0 => get(a), 1 => get(b)]");
    }

    #[test]
    fn it_attaches_decorated_definition() {
        let chain = chain(vec![
            source(vec![("x", decorate(|v: Arc<i32>, _: &Container| Ok(*v * 2)).into())]),
            source(vec![("x", value(1).into())]),
        ]);

        let definition = chain.get_definition("x", &TypeParameters::empty()).unwrap();

        let DefinitionKind::Decorator(decorator) = definition.kind() else {
            panic!("expected a decorator definition");
        };

        assert_eq!(decorator.decorated_definition().map(ToString::to_string), Some("Value".into()));
    }

    #[test]
    fn it_leaves_decorator_undecorated_without_predecessor() {
        let chain = chain(vec![
            source(vec![("x", decorate(|v: Arc<i32>, _: &Container| Ok(*v * 2)).into())]),
        ]);

        let definition = chain.get_definition("x", &TypeParameters::empty()).unwrap();

        let DefinitionKind::Decorator(decorator) = definition.kind() else {
            panic!("expected a decorator definition");
        };

        assert!(decorator.decorated_definition().is_none());
    }

    #[test]
    fn it_merges_definitions_with_highest_priority_first() {
        let chain = chain(vec![
            source(vec![("x", get("first").into()), ("y", get("y").into())]),
            source(vec![("x", get("second").into()), ("Repo*", get("wildcard").into())]),
        ]);

        let definitions: Vec<_> = chain
            .definitions()
            .iter()
            .map(|definition| format!("{} = {definition}", definition.name()))
            .collect();

        assert_eq!(definitions, vec!["x = get(first)", "y = get(y)"]);
    }
}
