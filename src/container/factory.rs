//! Generic factories for resolving entries

use super::{Container, from_container::FromContainer};
use crate::{
    Parameters,
    RequestedEntry,
    Service,
    definition::FactoryFn,
    error::Error
};
use std::sync::Arc;

/// What a factory is called with
pub struct FactoryContext<'a> {
    container: &'a Container,
    entry: &'a RequestedEntry,
    parameters: &'a Parameters
}

impl<'a> FactoryContext<'a> {
    #[inline]
    pub(crate) fn new(container: &'a Container, entry: &'a RequestedEntry, parameters: &'a Parameters) -> Self {
        Self { container, entry, parameters }
    }

    #[inline]
    pub fn container(&self) -> &'a Container {
        self.container
    }

    /// The entry the factory is called for
    #[inline]
    pub fn entry(&self) -> &'a RequestedEntry {
        self.entry
    }

    /// Resolved factory parameters and parameters passed to [`Container::make`]
    #[inline]
    pub fn parameters(&self) -> &'a Parameters {
        self.parameters
    }

    /// Returns the parameter `name` as a shared `T`
    pub fn parameter<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, Error> {
        self.parameters
            .get(name)
            .ok_or_else(|| Error::invalid(format!(
                "Entry \"{}\" cannot be resolved: parameter '{name}' is not defined",
                self.entry.name()
            )))?
            .clone()
            .downcast::<T>()
            .map_err(|_| Error::TypeMismatch {
                name: name.into(),
                expected: std::any::type_name::<T>()
            })
    }
}

/// A trait that describes a generic factory function
/// that can build entries of the DI container
pub trait GenericFactory<Args>: Send + Sync + 'static {
    /// A type of value that will be built
    type Output;

    /// Calls a generic function and returns either the built value or error
    fn call(&self, args: Args) -> Result<Self::Output, Error>;
}

impl<F, R> GenericFactory<()> for F
where
    F: Fn() -> R + Send + Sync + 'static
{
    type Output = R;

    #[inline]
    fn call(&self, _: ()) -> Result<Self::Output, Error> {
        Ok(self())
    }
}

macro_rules! define_generic_factory ({ $($param:ident)* } => {
    impl<F, R, $($param,)*> GenericFactory<($($param,)*)> for F
    where
        F: Fn($($param),*) -> Result<R, Error> + Send + Sync + 'static,
    {
        type Output = R;

        #[inline]
        #[allow(non_snake_case)]
        fn call(&self, ($($param,)*): ($($param,)*)) -> Result<Self::Output, Error> {
            (self)($($param,)*)
        }
    }
});

define_generic_factory! { T1 }
define_generic_factory! { T1 T2 }
define_generic_factory! { T1 T2 T3 }
define_generic_factory! { T1 T2 T3 T4 }
define_generic_factory! { T1 T2 T3 T4 T5 }

/// Erases a generic factory into a [`FactoryFn`]
#[inline]
pub(crate) fn make_factory_fn<F, Args>(factory: F) -> FactoryFn
where
    F: GenericFactory<Args>,
    F::Output: Send + Sync + 'static,
    Args: FromContainer
{
    Arc::new(move |ctx: &FactoryContext<'_>| -> Result<Service, Error> {
        let args = Args::from_container(ctx)?;
        factory.call(args).map(|value| Arc::new(value) as Service)
    })
}
