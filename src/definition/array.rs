//! Definition of an array of values or nested definitions

use super::{Definition, replace_nested};
use crate::{Service, error::Error};
use indexmap::IndexMap;
use std::fmt::{Display, Formatter};

/// A resolved array
pub type Array = IndexMap<ArrayKey, Service>;

/// Key of an array item: a position or a name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Index(usize),
    Name(String),
}

impl From<usize> for ArrayKey {
    #[inline]
    fn from(index: usize) -> Self {
        ArrayKey::Index(index)
    }
}

impl From<&str> for ArrayKey {
    #[inline]
    fn from(name: &str) -> Self {
        ArrayKey::Name(name.into())
    }
}

impl From<String> for ArrayKey {
    #[inline]
    fn from(name: String) -> Self {
        ArrayKey::Name(name)
    }
}

impl Display for ArrayKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayKey::Index(index) => write!(f, "{index}"),
            ArrayKey::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// An ordered mapping of keys to nested definitions
///
/// An *extension* array adds its items to the previous array definition
/// of the same entry: positional items are appended, named items override.
#[derive(Clone, Default)]
pub struct ArrayDefinition {
    values: IndexMap<ArrayKey, Definition>,
    extension: bool
}

impl ArrayDefinition {
    /// Creates an empty array definition
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty array that extends the previous definition
    #[inline]
    pub fn extension() -> Self {
        Self { values: IndexMap::new(), extension: true }
    }

    #[inline]
    pub fn is_extension(&self) -> bool {
        self.extension
    }

    #[inline]
    pub fn values(&self) -> &IndexMap<ArrayKey, Definition> {
        &self.values
    }

    /// Appends a positional item
    pub fn push(&mut self, item: impl Into<Definition>) {
        let index = self.next_index();
        self.values.insert(ArrayKey::Index(index), item.into());
    }

    /// Inserts or replaces an item under `key`
    #[inline]
    pub fn insert(&mut self, key: impl Into<ArrayKey>, item: impl Into<Definition>) {
        self.values.insert(key.into(), item.into());
    }

    fn next_index(&self) -> usize {
        self.values
            .keys()
            .filter_map(|key| match key {
                ArrayKey::Index(index) => Some(index + 1),
                ArrayKey::Name(_) => None,
            })
            .max()
            .unwrap_or(0)
    }

    /// Merges the previous definition into this one: previous items come first,
    /// positional items of this array are renumbered after them
    pub(crate) fn extend_previous(&mut self, previous: ArrayDefinition) {
        let additions = std::mem::take(&mut self.values);
        for (key, item) in previous.values.into_iter().chain(additions) {
            match key {
                ArrayKey::Index(_) => self.push(item),
                key @ ArrayKey::Name(_) => {
                    self.values.insert(key, item);
                },
            }
        }
    }

    pub(crate) fn replace_nested_definitions<F>(&mut self, replacer: &mut F) -> Result<(), Error>
    where
        F: FnMut(Definition) -> Result<Definition, Error>
    {
        self.values
            .values_mut()
            .try_for_each(|item| replace_nested(item, replacer))
    }
}

impl Display for ArrayDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, (key, item)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key} => {item}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::get;

    #[test]
    fn it_appends_positional_items() {
        let mut array = ArrayDefinition::new();
        array.push(Definition::value(1));
        array.insert("name", Definition::value(2));
        array.push(Definition::value(3));

        let keys: Vec<_> = array.values().keys().cloned().collect();

        assert_eq!(keys, vec![ArrayKey::Index(0), ArrayKey::Name("name".into()), ArrayKey::Index(1)]);
    }

    #[test]
    fn it_extends_previous_array() {
        let mut previous = ArrayDefinition::new();
        previous.push(get("a"));
        previous.insert("mode", Definition::value("dev"));

        let mut extension = ArrayDefinition::extension();
        extension.push(get("b"));
        extension.insert("mode", Definition::value("prod"));

        extension.extend_previous(previous);

        let rendered: Vec<_> = extension.values()
            .iter()
            .map(|(key, item)| format!("{key} => {item}"))
            .collect();

        assert_eq!(rendered, vec!["0 => get(a)", "'mode' => Value", "1 => get(b)"]);
    }

    #[test]
    fn it_formats_items() {
        let mut array = ArrayDefinition::new();
        array.push(get("a"));
        array.insert("b", get("b"));

        assert_eq!(array.to_string(), "[0 => get(a), 'b' => get(b)]");
    }
}
