//! Dependency Injection container and tools

use self::guard::{InFlight, ResolutionGuard};
use crate::{
    Definition,
    DefinitionKind,
    Parameters,
    Service,
    TypeParameters,
    definition::{EntryKey, InstanceDefinition, ValueDefinition, helpers::DefinitionHelper},
    entry_name,
    error::Error,
    resolver::{EnvReader, ResolverDispatcher, process_env},
    source::{Autowiring, DefinitionArray, DefinitionSource, NoAutowiring, SourceChain},
};
use dashmap::DashMap;
use std::{
    fmt::Debug,
    sync::{
        Arc,
        LazyLock,
        PoisonError,
        RwLock,
        atomic::{AtomicU64, Ordering}
    },
    thread::ThreadId
};

pub mod dc;
pub mod factory;
pub mod from_container;
mod guard;

static NO_TYPE_PARAMETERS: LazyLock<TypeParameters> = LazyLock::new(TypeParameters::empty);

/// Something that can be registered in the container
pub enum Entry {
    /// An already built value
    Value(Service),
    /// A definition
    Definition(Definition),
    /// A helper that is bound to the entry name when registered
    Helper(Box<dyn DefinitionHelper>)
}

impl Entry {
    /// Creates an entry of an already built value
    #[inline]
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        Self::Value(Arc::new(value))
    }

    fn into_definition(self, name: &str) -> Definition {
        let mut definition = match self {
            Entry::Value(value) => ValueDefinition::from_service(value).into(),
            Entry::Definition(definition) => definition,
            Entry::Helper(helper) => helper.into_definition(name),
        };
        definition.set_name(name);
        definition
    }
}

impl From<Definition> for Entry {
    #[inline]
    fn from(definition: Definition) -> Self {
        Self::Definition(definition)
    }
}

impl<H: DefinitionHelper + 'static> From<H> for Entry {
    #[inline]
    fn from(helper: H) -> Self {
        Self::Helper(Box::new(helper))
    }
}

enum PendingSource {
    Definitions(Vec<Definition>),
    Source(Arc<dyn DefinitionSource>)
}

/// Represents a DI container builder
///
/// Definition sources added later take priority over the ones added before.
/// The autowiring provider is always the last source of the chain.
pub struct ContainerBuilder {
    sources: Vec<PendingSource>,
    autowiring: Arc<dyn Autowiring>,
    autowiring_source: Arc<dyn DefinitionSource>,
    env_reader: EnvReader
}

impl Debug for ContainerBuilder {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ContainerBuilder(..)")
    }
}

impl Default for ContainerBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// Creates a new DI container builder without autowiring
    #[inline]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            autowiring: Arc::new(NoAutowiring),
            autowiring_source: Arc::new(NoAutowiring),
            env_reader: process_env()
        }
    }

    /// Adds named definitions as a new source
    ///
    /// # Example
    /// ```
    /// use hkt_container::{ContainerBuilder, Entry, helpers::get};
    ///
    /// let container = ContainerBuilder::new()
    ///     .add_definitions([
    ///         ("port", Entry::value(8080u16)),
    ///         ("http.port", get("port").into()),
    ///     ])
    ///     .build();
    ///
    /// assert_eq!(container.resolve::<u16>("http.port").unwrap(), 8080);
    /// ```
    pub fn add_definitions<I, N, E>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = (N, E)>,
        N: Into<String>,
        E: Into<Entry>
    {
        let definitions = definitions
            .into_iter()
            .map(|(name, entry)| {
                let name: String = name.into();
                let entry: Entry = entry.into();
                entry.into_definition(&name)
            })
            .collect();
        self.sources.push(PendingSource::Definitions(definitions));
        self
    }

    /// Adds a custom definition source
    #[inline]
    pub fn add_definition_source<S: DefinitionSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(PendingSource::Source(Arc::new(source)));
        self
    }

    /// Sets the autowiring provider; it is also the source of last resort
    #[inline]
    pub fn with_autowiring<A>(mut self, autowiring: A) -> Self
    where
        A: Autowiring + DefinitionSource + 'static
    {
        let autowiring = Arc::new(autowiring);
        self.autowiring = autowiring.clone();
        self.autowiring_source = autowiring;
        self
    }

    /// Disables autowiring
    #[inline]
    pub fn without_autowiring(self) -> Self {
        self.with_autowiring(NoAutowiring)
    }

    /// Sets the function environment variables are read with
    #[inline]
    pub fn with_env_reader<F>(mut self, reader: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static
    {
        self.env_reader = Arc::new(reader);
        self
    }

    /// Builds a DI container
    pub fn build(self) -> Container {
        let autowiring = self.autowiring;
        let mut sources = self.sources
            .into_iter()
            .rev()
            .map(|source| match source {
                PendingSource::Definitions(definitions) => {
                    Arc::new(DefinitionArray::with_definitions(autowiring.clone(), definitions)) as Arc<dyn DefinitionSource>
                },
                PendingSource::Source(source) => source,
            })
            .collect::<Vec<_>>();
        sources.push(self.autowiring_source);

        let mutable = Arc::new(DefinitionArray::new(autowiring.clone()));

        Container {
            inner: Arc::new(ContainerInner {
                source: SourceChain::new(mutable, sources),
                resolver: ResolverDispatcher::new(self.env_reader),
                resolved: DashMap::new(),
                fetched: DashMap::new(),
                resolving: DashMap::new(),
                registration: RwLock::new(()),
                generation: AtomicU64::new(0),
                autowiring
            })
        }
    }
}

struct ContainerInner {
    source: SourceChain,
    resolver: ResolverDispatcher,
    resolved: DashMap<EntryKey, Service>,
    fetched: DashMap<EntryKey, Arc<Definition>>,
    resolving: DashMap<ThreadId, Vec<InFlight>>,
    /// Held for writing while a registration updates the caches
    registration: RwLock<()>,
    /// Bumped on every registration; results computed under an older one are not cached
    generation: AtomicU64,
    autowiring: Arc<dyn Autowiring>
}

/// Represents a DI container
///
/// Cloning the container is cheap, every clone shares the same caches.
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>
}

impl Debug for Container {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Container(..)")
    }
}

impl Container {
    /// Returns the value of the entry, resolving it on first access
    #[inline]
    pub fn get(&self, name: &str) -> Result<Service, Error> {
        self.get_generic(name, &NO_TYPE_PARAMETERS)
    }

    /// Returns the value of a generic instantiation of the entry
    pub fn get_generic(&self, name: &str, type_parameters: &TypeParameters) -> Result<Service, Error> {
        let key = EntryKey::new(name, type_parameters);
        if let Some(service) = self.inner.resolved.get(&key) {
            #[cfg(feature = "tracing")]
            tracing::trace!("cache hit for {name}");
            return Ok(service.value().clone());
        }

        let generation = self.inner.generation.load(Ordering::Acquire);
        let definition = self.fetch_definition(name, type_parameters, key, generation)?;
        let service = self.resolve_definition(&definition, &Parameters::new())?;
        self.store_if_current(generation, || {
            self.inner.resolved.insert(definition.key(), service.clone());
        });
        Ok(service)
    }

    /// Resolves the entry as a shared `T`
    #[inline]
    pub fn resolve_shared<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, Error> {
        self.resolve_shared_generic(name, &NO_TYPE_PARAMETERS)
    }

    /// Resolves a generic instantiation of the entry as a shared `T`
    #[inline]
    pub fn resolve_shared_generic<T: Send + Sync + 'static>(
        &self,
        name: &str,
        type_parameters: &TypeParameters
    ) -> Result<Arc<T>, Error> {
        downcast(name, self.get_generic(name, type_parameters)?)
    }

    /// Resolves a clone of the entry
    #[inline]
    pub fn resolve<T: Send + Sync + Clone + 'static>(&self, name: &str) -> Result<T, Error> {
        self.resolve_generic(name, &NO_TYPE_PARAMETERS)
    }

    /// Resolves a clone of a generic instantiation of the entry
    #[inline]
    pub fn resolve_generic<T: Send + Sync + Clone + 'static>(
        &self,
        name: &str,
        type_parameters: &TypeParameters
    ) -> Result<T, Error> {
        self.resolve_shared_generic::<T>(name, type_parameters)
            .map(|value| value.as_ref().clone())
    }

    /// Returns `true` if the entry is resolved or can be looked up; never fails
    #[inline]
    pub fn has(&self, name: &str) -> bool {
        self.has_generic(name, &NO_TYPE_PARAMETERS)
    }

    /// Returns `true` if the generic instantiation is resolved or can be looked up
    #[inline]
    pub fn has_generic(&self, name: &str, type_parameters: &TypeParameters) -> bool {
        self.inner.resolved.contains_key(&EntryKey::new(name, type_parameters))
            || self.inner.source.has_definition(name, type_parameters)
    }

    /// Registers an entry
    ///
    /// Values are stored as resolved; any other definition is added
    /// on top of every definition source. A definition without type parameters
    /// replaces the cached values of every instantiation of the entry.
    ///
    /// Closures are registered through [`crate::helpers::factory`]:
    /// ```
    /// use hkt_container::{ContainerBuilder, helpers::factory};
    ///
    /// let container = ContainerBuilder::new().build();
    /// container.set("answer", factory(|| 42));
    ///
    /// assert_eq!(container.resolve::<i32>("answer").unwrap(), 42);
    /// ```
    #[inline]
    pub fn set(&self, name: &str, entry: impl Into<Entry>) {
        self.set_generic(name, &NO_TYPE_PARAMETERS, entry)
    }

    /// Registers a generic instantiation of an entry
    pub fn set_generic(&self, name: &str, type_parameters: &TypeParameters, entry: impl Into<Entry>) {
        let entry: Entry = entry.into();
        let mut definition = entry.into_definition(name);
        definition.set_type_parameters(type_parameters.clone());

        match definition.kind() {
            DefinitionKind::Value(value) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("setting value of {}", definition.label());

                let _registration = self.inner.registration
                    .write()
                    .unwrap_or_else(PoisonError::into_inner);
                self.inner.generation.fetch_add(1, Ordering::AcqRel);
                self.inner.resolved.insert(definition.key(), value.value().clone());
            },
            _ => self.set_definition(definition),
        }
    }

    /// Resolves a new value of the entry with explicit parameters; the result is never cached
    #[inline]
    pub fn make(&self, name: &str, parameters: Parameters) -> Result<Service, Error> {
        self.make_generic(name, &NO_TYPE_PARAMETERS, parameters)
    }

    /// Resolves a new value of a generic instantiation with explicit parameters
    pub fn make_generic(
        &self,
        name: &str,
        type_parameters: &TypeParameters,
        parameters: Parameters
    ) -> Result<Service, Error> {
        let generation = self.inner.generation.load(Ordering::Acquire);
        let key = EntryKey::new(name, type_parameters);
        let definition = self.fetch_definition(name, type_parameters, key, generation)?;
        self.resolve_definition(&definition, &parameters)
    }

    /// Calls the method injections registered for the type `T` on an existing instance
    ///
    /// The object definition is looked up under the entry name of `T`,
    /// or asked to the autowiring provider when there is none.
    pub fn inject_on<T: Send + Sync + 'static>(&self, instance: T) -> Result<Arc<T>, Error> {
        let name = entry_name::<T>();
        let object = match self.inner.source.get_definition(name, &NO_TYPE_PARAMETERS) {
            Ok(definition) => match definition.into_kind() {
                DefinitionKind::Object(object) => object,
                _ => return Err(Error::invalid(format!(
                    "Cannot inject on \"{name}\": its entry is not an object definition"
                )))
            },
            Err(err) if err.is_not_found() => self.inner.autowiring.autowire(name, &NO_TYPE_PARAMETERS, None)?,
            Err(err) => return Err(err),
        };

        let mut definition = Definition::from(InstanceDefinition::new(Arc::new(instance), object));
        definition.set_name(name);

        downcast(name, self.resolve_definition(&definition, &Parameters::new())?)
    }

    /// Returns every definition known by the sources
    #[inline]
    pub fn definitions(&self) -> Vec<Definition> {
        self.inner.source.definitions()
    }

    fn fetch_definition(
        &self,
        name: &str,
        type_parameters: &TypeParameters,
        key: EntryKey,
        generation: u64
    ) -> Result<Arc<Definition>, Error> {
        if let Some(definition) = self.inner.fetched.get(&key) {
            return Ok(definition.value().clone());
        }

        let definition = Arc::new(self.inner.source.get_definition(name, type_parameters)?);
        self.store_if_current(generation, || {
            self.inner.fetched.insert(key, definition.clone());
        });
        Ok(definition)
    }

    /// Runs `store` unless an entry was registered since `generation` was read
    fn store_if_current<F: FnOnce()>(&self, generation: u64, store: F) {
        let _registration = self.inner.registration
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if self.inner.generation.load(Ordering::Acquire) == generation {
            store();
        }
    }

    fn resolve_definition(&self, definition: &Definition, parameters: &Parameters) -> Result<Service, Error> {
        let _guard = ResolutionGuard::enter(&self.inner.resolving, definition)?;
        self.inner.resolver.resolve(self, definition, parameters)
    }

    fn set_definition(&self, definition: Definition) {
        let key = definition.key();

        #[cfg(feature = "tracing")]
        tracing::debug!("adding definition of {}: {definition}", definition.label());

        let untyped = !definition.type_parameters().has_type_parameters();
        let name = definition.name().to_owned();

        let _registration = self.inner.registration
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
        self.inner.source.add_definition(definition);
        if untyped {
            self.inner.resolved.retain(|resolved, _| resolved.name() != name);
        } else {
            self.inner.resolved.remove(&key);
        }
        self.inner.fetched.clear();
    }
}

#[inline]
fn downcast<T: Send + Sync + 'static>(name: &str, service: Service) -> Result<Arc<T>, Error> {
    service
        .downcast::<T>()
        .map_err(|_| Error::TypeMismatch {
            name: name.into(),
            expected: std::any::type_name::<T>()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{factory, get, value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn it_stores_values_as_resolved() {
        let container = ContainerBuilder::new().build();
        let shared = Arc::new(vec![1, 2, 3]);

        container.set("numbers", Entry::Value(shared.clone()));

        let first = container.get("numbers").unwrap();
        let second = container.get("numbers").unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(container.has("numbers"));
        assert!(container.definitions().is_empty());
    }

    #[test]
    fn it_caches_resolved_entries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let container = ContainerBuilder::new().build();

        container.set("counted", factory(move || counter.fetch_add(1, Ordering::SeqCst)));

        assert_eq!(container.resolve::<usize>("counted").unwrap(), 0);
        assert_eq!(container.resolve::<usize>("counted").unwrap(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn it_invalidates_cache_on_set() {
        let container = ContainerBuilder::new().build();

        container.set("x", factory(|| 1));
        assert_eq!(container.resolve::<i32>("x").unwrap(), 1);

        container.set("x", factory(|| 2));
        assert_eq!(container.resolve::<i32>("x").unwrap(), 2);
    }

    #[test]
    fn it_reports_type_mismatch() {
        let container = ContainerBuilder::new().build();
        container.set("x", value(1u8));

        let err = container.resolve::<String>("x").unwrap_err();

        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn it_detects_cycles() {
        let container = ContainerBuilder::new().build();
        container.set("a", get("b"));
        container.set("b", get("a"));

        let err = container.get("a").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Container Error: circular dependency detected while trying to resolve entry 'a': Dependencies: a -> b -> a"
        );
        assert!(container.inner.resolving.is_empty());
    }

    #[test]
    fn it_does_not_cache_made_values() {
        let container = ContainerBuilder::new().build();
        container.set("x", factory(|| String::from("made")));

        let first = container.make("x", Parameters::new()).unwrap();
        let second = container.make("x", Parameters::new()).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(!container.inner.resolved.contains_key(&EntryKey::new("x", &TypeParameters::empty())));
    }

    #[test]
    fn it_does_not_cache_values_resolved_before_a_registration() {
        let container = ContainerBuilder::new().build();
        container.set("x", factory(|c: Container| {
            c.set("x", factory(|| 2));
            Ok(1)
        }));

        assert_eq!(container.resolve::<i32>("x").unwrap(), 1);
        assert_eq!(container.resolve::<i32>("x").unwrap(), 2);
        assert!(container.inner.fetched.get(&EntryKey::new("x", &TypeParameters::empty())).is_some());
    }

    #[test]
    fn it_evicts_every_instantiation_of_an_untyped_entry() {
        let container = ContainerBuilder::new().build();
        let user = TypeParameters::new(["User"]);
        container.set("Repo", factory(|| 1));
        container.set_generic("Other", &user, factory(|| 3));

        assert_eq!(container.resolve_generic::<i32>("Repo", &user).unwrap(), 1);
        assert_eq!(container.resolve_generic::<i32>("Other", &user).unwrap(), 3);

        container.set("Repo", factory(|| 2));

        assert!(!container.inner.resolved.contains_key(&EntryKey::new("Repo", &user)));
        assert!(container.inner.resolved.contains_key(&EntryKey::new("Other", &user)));
    }

    #[test]
    fn it_gives_later_sources_priority() {
        let container = ContainerBuilder::new()
            .add_definitions([("x", value(1))])
            .add_definitions([("x", value(2))])
            .build();

        assert_eq!(container.resolve::<i32>("x").unwrap(), 2);
    }
}
