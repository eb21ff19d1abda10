//! Extractors for fetching factory arguments from the DI container

use super::{Container, factory::FactoryContext};
use crate::{Parameters, RequestedEntry, TypeParameters, error::Error};

/// A trait that defines how to extract the `Self` from a factory call
pub trait FromContainer: Sized + Send + Sync {
    /// Extracts `Self` from the factory context
    fn from_container(ctx: &FactoryContext<'_>) -> Result<Self, Error>;
}

impl FromContainer for Container {
    #[inline]
    fn from_container(ctx: &FactoryContext<'_>) -> Result<Self, Error> {
        Ok(ctx.container().clone())
    }
}

impl FromContainer for RequestedEntry {
    #[inline]
    fn from_container(ctx: &FactoryContext<'_>) -> Result<Self, Error> {
        Ok(ctx.entry().clone())
    }
}

impl FromContainer for TypeParameters {
    #[inline]
    fn from_container(ctx: &FactoryContext<'_>) -> Result<Self, Error> {
        Ok(ctx.entry().type_parameters().clone())
    }
}

impl FromContainer for Parameters {
    #[inline]
    fn from_container(ctx: &FactoryContext<'_>) -> Result<Self, Error> {
        Ok(ctx.parameters().clone())
    }
}

impl FromContainer for () {
    #[inline]
    fn from_container(_: &FactoryContext<'_>) -> Result<Self, Error> {
        Ok(())
    }
}

macro_rules! define_generic_from_container {
    ($($T: ident),*) => {
        impl<$($T: FromContainer),+> FromContainer for ($($T,)+) {
            #[inline]
            #[allow(non_snake_case)]
            fn from_container(ctx: &FactoryContext<'_>) -> Result<Self, Error> {
                let tuple = (
                    $(
                    $T::from_container(ctx)?,
                    )*
                );
                Ok(tuple)
            }
        }
    }
}

define_generic_from_container! { T1 }
define_generic_from_container! { T1, T2 }
define_generic_from_container! { T1, T2, T3 }
define_generic_from_container! { T1, T2, T3, T4 }
define_generic_from_container! { T1, T2, T3, T4, T5 }
