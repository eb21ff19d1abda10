//! A Dependency Injection container that resolves named entries,
//! including generic (higher-kinded) instantiations like `Repository<User>`.
//!
//! # Example
//! ```
//! use hkt_container::{ContainerBuilder, helpers::{factory, get, value}};
//!
//! let container = ContainerBuilder::new().build();
//!
//! container.set("greeting", value("hello"));
//! container.set("alias", get("greeting"));
//! container.set("shout", factory(|| "HELLO"));
//!
//! let greeting = container.resolve::<&str>("alias").unwrap();
//! assert_eq!(greeting, "hello");
//! ```

pub use crate::{
    container::{
        Container,
        ContainerBuilder,
        Entry,
        dc::Dc,
        factory::{FactoryContext, GenericFactory},
        from_container::FromContainer,
    },
    definition::{Definition, DefinitionKind, RequestedEntry, helpers},
    error::Error,
    type_parameters::{TypeParameter, TypeParameters},
};

use indexmap::IndexMap;
use std::{any::Any, sync::Arc};

pub mod container;
pub mod definition;
pub mod error;
pub mod resolver;
pub mod source;
pub mod type_parameters;

/// A shared, type-erased resolved value
pub type Service = Arc<
    dyn Any
    + Send
    + Sync
>;

/// Explicit named parameters passed to [`Container::make`]
pub type Parameters = IndexMap<String, Service>;

/// Returns the entry name used for a type `T` by [`Dc`] and autowiring
#[inline]
pub fn entry_name<T: ?Sized>() -> &'static str {
    std::any::type_name::<T>()
}
