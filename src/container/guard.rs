//! Tracks the entries being resolved on each thread

use crate::{Definition, definition::EntryKey, error::Error};
use dashmap::{DashMap, mapref::entry::Entry};
use std::thread::{self, ThreadId};

/// An entry being resolved
pub(super) struct InFlight {
    key: EntryKey,
    label: String
}

/// Marks an entry as being resolved on the current thread until dropped
pub(super) struct ResolutionGuard<'a> {
    resolving: &'a DashMap<ThreadId, Vec<InFlight>>,
    thread: ThreadId
}

impl<'a> ResolutionGuard<'a> {
    /// Pushes the definition on the stack of the current thread,
    /// or fails if it is already there
    pub(super) fn enter(
        resolving: &'a DashMap<ThreadId, Vec<InFlight>>,
        definition: &Definition
    ) -> Result<Self, Error> {
        let thread = thread::current().id();
        let key = definition.key();
        let label = definition.label();

        let mut stack = resolving.entry(thread).or_default();
        if stack.iter().any(|entry| entry.key == key) {
            let chain = stack
                .iter()
                .map(|entry| entry.label.clone())
                .chain(std::iter::once(label.clone()))
                .collect::<Vec<_>>();

            #[cfg(feature = "tracing")]
            tracing::debug!("circular dependency detected: {}", chain.join(" -> "));

            return Err(Error::CircularDependency { entry: label, chain });
        }

        stack.push(InFlight { key, label });
        Ok(Self { resolving, thread })
    }
}

impl Drop for ResolutionGuard<'_> {
    fn drop(&mut self) {
        if let Entry::Occupied(mut entry) = self.resolving.entry(self.thread) {
            entry.get_mut().pop();
            if entry.get().is_empty() {
                entry.remove();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::value;

    fn definition(name: &str) -> Definition {
        let mut definition = Definition::from(value(()));
        definition.set_name(name);
        definition
    }

    #[test]
    fn it_pops_on_drop() {
        let resolving = DashMap::new();

        {
            let _a = ResolutionGuard::enter(&resolving, &definition("a")).unwrap();
            let _b = ResolutionGuard::enter(&resolving, &definition("b")).unwrap();
            assert_eq!(resolving.get(&thread::current().id()).unwrap().len(), 2);
        }

        assert!(resolving.is_empty());
    }

    #[test]
    fn it_reports_the_whole_chain() {
        let resolving = DashMap::new();

        let _root = ResolutionGuard::enter(&resolving, &definition("root")).unwrap();
        let _a = ResolutionGuard::enter(&resolving, &definition("a")).unwrap();
        let _b = ResolutionGuard::enter(&resolving, &definition("b")).unwrap();

        let Err(Error::CircularDependency { entry, chain }) = ResolutionGuard::enter(&resolving, &definition("a")) else {
            panic!("expected a circular dependency");
        };

        assert_eq!(entry, "a");
        assert_eq!(chain, vec!["root", "a", "b", "a"]);
    }

    #[test]
    fn it_tracks_threads_independently() {
        let resolving = DashMap::new();
        let _a = ResolutionGuard::enter(&resolving, &definition("a")).unwrap();

        thread::scope(|scope| {
            scope.spawn(|| {
                let guard = ResolutionGuard::enter(&resolving, &definition("a"));
                assert!(guard.is_ok());
            });
        });

        assert_eq!(resolving.len(), 1);
    }
}
