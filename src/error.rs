//! Describes dependency injection errors

use crate::TypeParameters;
use std::{
    error::Error as StdError,
    fmt::{Display, Formatter}
};

/// A boxed error raised by user-provided factories, decorators and constructors
pub type BoxError = Box<
    dyn StdError
    + Send
    + Sync
>;

#[derive(Debug)]
pub enum Error {
    /// No definition was located for the entry, including after wildcard matching
    NotFound {
        name: String,
        type_parameters: TypeParameters
    },
    /// A definition is malformed and cannot be resolved
    InvalidDefinition(String),
    /// An entry depends on itself; `chain` goes from the outermost entry to the repeated one
    CircularDependency {
        entry: String,
        chain: Vec<String>
    },
    /// The resolved value is not of the requested type
    TypeMismatch {
        name: String,
        expected: &'static str
    },
    /// An error raised by a user-provided callable
    Other(BoxError)
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotFound { name, type_parameters } => write!(
                f,
                "Container Error: no entry or class found for '{name}' and parameters '{type_parameters}'"
            ),
            Error::InvalidDefinition(msg) => write!(f, "Container Error: invalid definition: {msg}"),
            Error::CircularDependency { entry, chain } => write!(
                f,
                "Container Error: circular dependency detected while trying to resolve entry '{entry}': Dependencies: {}",
                chain.join(" -> ")
            ),
            Error::TypeMismatch { name, expected } => write!(
                f,
                "Container Error: entry '{name}' is not of type {expected}"
            ),
            Error::Other(err) => err.fmt(f)
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Other(err) => Some(err.as_ref()),
            _ => None
        }
    }
}

impl Error {
    /// Creates an error from any failure raised by user code
    #[inline]
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }

    #[inline]
    pub(crate) fn not_found(name: &str, type_parameters: &TypeParameters) -> Self {
        Self::NotFound {
            name: name.into(),
            type_parameters: type_parameters.clone()
        }
    }

    #[inline]
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidDefinition(msg.into())
    }

    /// Returns `true` if this is a [`Error::NotFound`] error
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_formats_circular_dependency_chain() {
        let err = Error::CircularDependency {
            entry: "a".into(),
            chain: vec!["a".into(), "b".into(), "a".into()]
        };

        assert_eq!(
            err.to_string(),
            "Container Error: circular dependency detected while trying to resolve entry 'a': Dependencies: a -> b -> a"
        );
    }

    #[test]
    fn it_formats_not_found_with_type_parameters() {
        let err = Error::not_found("Repo", &TypeParameters::new(["User", "Order"]));

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Container Error: no entry or class found for 'Repo' and parameters 'User,Order'"
        );
    }

    #[test]
    fn it_exposes_source_of_user_errors() {
        let err = Error::other("boom");

        assert_eq!(err.to_string(), "boom");
        assert!(err.source().is_some());
    }
}
