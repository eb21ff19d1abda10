//! Factory argument that resolves an entry by its type

use super::{factory::FactoryContext, from_container::FromContainer};
use crate::{entry_name, error::Error};
use std::{
    ops::{Deref, DerefMut},
    sync::Arc
};

/// `Dc` stands for Dependency Container. It wraps the value of the entry
/// registered under the type name of `T`
///
/// # Example
/// ```
/// use hkt_container::{ContainerBuilder, Dc, entry_name, helpers::{factory, value}};
///
/// #[derive(Clone)]
/// struct Config { port: u16 }
///
/// let container = ContainerBuilder::new().build();
/// container.set(entry_name::<Config>(), value(Config { port: 8080 }));
/// container.set("address", factory(|config: Dc<Config>| Ok(format!("0.0.0.0:{}", config.port))));
///
/// assert_eq!(container.resolve::<String>("address").unwrap(), "0.0.0.0:8080");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Dc<T>(Arc<T>);

impl<T> Deref for Dc<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Clone> DerefMut for Dc<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        Arc::make_mut(&mut self.0)
    }
}

impl<T> Dc<T> {
    /// Unwraps the inner [`Arc`]
    #[inline]
    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T: Clone> Dc<T> {
    /// Returns a clone of the inner `T` if it implements [`Clone`]
    #[inline]
    pub fn cloned(&self) -> T {
        self.0.as_ref().clone()
    }
}

impl<T: Send + Sync + 'static> FromContainer for Dc<T> {
    #[inline]
    fn from_container(ctx: &FactoryContext<'_>) -> Result<Self, Error> {
        ctx.container()
            .resolve_shared::<T>(entry_name::<T>())
            .map(Dc)
    }
}

#[cfg(test)]
mod tests {
    use super::Dc;
    use crate::{ContainerBuilder, entry_name, helpers::{factory, value}};
    use std::sync::{Arc, Mutex};

    type Cache = Arc<Mutex<Vec<i32>>>;

    #[test]
    fn it_shares_the_resolved_value() {
        let container = ContainerBuilder::new().build();
        container.set(entry_name::<Cache>(), value(Cache::default()));
        container.set("push", factory(|cache: Dc<Cache>| {
            cache.lock().unwrap().push(1);
            Ok(cache.into_inner())
        }));

        container.get("push").unwrap();

        let cache = container.resolve::<Cache>(entry_name::<Cache>()).unwrap();
        assert_eq!(*cache.lock().unwrap(), vec![1]);
    }

    #[test]
    fn it_clones_on_write() {
        let container = ContainerBuilder::new().build();
        container.set(entry_name::<Vec<i32>>(), value(vec![1]));
        container.set("copy", factory(|mut numbers: Dc<Vec<i32>>| {
            numbers.push(2);
            Ok(numbers.cloned())
        }));

        assert_eq!(container.resolve::<Vec<i32>>("copy").unwrap(), vec![1, 2]);
        assert_eq!(container.resolve::<Vec<i32>>(entry_name::<Vec<i32>>()).unwrap(), vec![1]);
    }
}
