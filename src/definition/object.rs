//! Definition of an object built by a constructor

use super::{Definition, Reference, replace_nested};
use crate::{Service, TypeParameters, entry_name, error::Error};
use std::{
    fmt::{Display, Formatter},
    sync::Arc
};

const CONSTRUCTOR: &str = "new";

/// A type-erased constructor
pub type ConstructorFn = Arc<
    dyn Fn(Arguments) -> Result<Service, Error>
    + Send
    + Sync
>;

/// A type-erased method called on a built instance
pub type MethodFn = Arc<
    dyn Fn(&Service, Arguments) -> Result<(), Error>
    + Send
    + Sync
>;

/// Resolved arguments of a constructor or method call
pub struct Arguments {
    values: Vec<(String, Service)>,
    type_parameters: TypeParameters
}

impl Arguments {
    #[inline]
    pub(crate) fn new(values: Vec<(String, Service)>, type_parameters: TypeParameters) -> Self {
        Self { values, type_parameters }
    }

    /// Returns the argument at `index` as a shared pointer
    pub fn get<T: Send + Sync + 'static>(&self, index: usize) -> Result<Arc<T>, Error> {
        let (name, value) = self.values
            .get(index)
            .ok_or_else(|| Error::invalid(format!("no argument at position {index}")))?;
        Self::downcast(name, value)
    }

    /// Returns a clone of the argument at `index`
    #[inline]
    pub fn cloned<T: Send + Sync + Clone + 'static>(&self, index: usize) -> Result<T, Error> {
        self.get::<T>(index).map(|value| value.as_ref().clone())
    }

    /// Returns the argument named `name`
    pub fn by_name<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>, Error> {
        let (name, value) = self.values
            .iter()
            .find(|(arg, _)| arg == name)
            .ok_or_else(|| Error::invalid(format!("no argument named ${name}")))?;
        Self::downcast(name, value)
    }

    /// Type parameters of the entry being built
    #[inline]
    pub fn type_parameters(&self) -> &TypeParameters {
        &self.type_parameters
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    fn downcast<T: Send + Sync + 'static>(name: &str, value: &Service) -> Result<Arc<T>, Error> {
        value
            .clone()
            .downcast::<T>()
            .map_err(|_| Error::TypeMismatch {
                name: format!("${name}"),
                expected: std::any::type_name::<T>()
            })
    }
}

/// A named parameter of a constructor or method
///
/// A parameter without a value must be provided explicitly
/// when the entry is built with [`crate::Container::make`].
#[derive(Clone)]
pub struct ParameterInjection {
    name: String,
    value: Option<Definition>
}

impl ParameterInjection {
    /// A parameter without an injected value
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: None }
    }

    /// A parameter injected from a definition
    #[inline]
    pub fn with_value(name: impl Into<String>, value: impl Into<Definition>) -> Self {
        Self { name: name.into(), value: Some(value.into()) }
    }

    /// A parameter injected from another entry
    #[inline]
    pub fn reference(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::with_value(name, Reference::new(target))
    }

    /// A parameter injected from the entry registered for the type `T`
    #[inline]
    pub fn of_type<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::reference(name, entry_name::<T>())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> Option<&Definition> {
        self.value.as_ref()
    }
}

/// An injection through a constructor or a method
#[derive(Clone)]
pub struct MethodInjection {
    method_name: String,
    parameters: Vec<ParameterInjection>,
    call: Option<MethodFn>
}

impl MethodInjection {
    /// Creates a constructor injection
    #[inline]
    pub fn constructor(parameters: Vec<ParameterInjection>) -> Self {
        Self {
            method_name: CONSTRUCTOR.into(),
            parameters,
            call: None
        }
    }

    /// Creates a method injection
    #[inline]
    pub fn method(method_name: impl Into<String>, parameters: Vec<ParameterInjection>, call: MethodFn) -> Self {
        Self {
            method_name: method_name.into(),
            parameters,
            call: Some(call)
        }
    }

    #[inline]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    #[inline]
    pub fn parameters(&self) -> &[ParameterInjection] {
        &self.parameters
    }

    #[inline]
    pub(crate) fn call(&self) -> Option<&MethodFn> {
        self.call.as_ref()
    }

    /// Merges parameters position by position; in case of conflicts
    /// the current injection prevails
    pub fn merge(&mut self, other: &MethodInjection) {
        for (index, parameter) in other.parameters.iter().enumerate() {
            match self.parameters.get_mut(index) {
                Some(current) if current.value.is_none() => current.value.clone_from(&parameter.value),
                Some(_) => (),
                None => self.parameters.push(parameter.clone()),
            }
        }
    }

    fn replace_nested_definitions<F>(&mut self, replacer: &mut F) -> Result<(), Error>
    where
        F: FnMut(Definition) -> Result<Definition, Error>
    {
        self.parameters
            .iter_mut()
            .filter_map(|parameter| parameter.value.as_mut())
            .try_for_each(|value| replace_nested(value, replacer))
    }
}

/// Describes how to construct an object
///
/// An empty class name stands for the entry name. An autowired definition
/// is completed by the [`crate::source::Autowiring`] provider when it is looked up.
#[derive(Clone)]
pub struct ObjectDefinition {
    class_name: String,
    constructor: Option<ConstructorFn>,
    constructor_injection: MethodInjection,
    method_injections: Vec<MethodInjection>,
    autowired: bool
}

impl Default for ObjectDefinition {
    #[inline]
    fn default() -> Self {
        Self::new("")
    }
}

impl ObjectDefinition {
    #[inline]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            constructor: None,
            constructor_injection: MethodInjection::constructor(Vec::new()),
            method_injections: Vec::new(),
            autowired: false
        }
    }

    /// Creates a definition whose class name is the Rust type name of `T`
    #[inline]
    pub fn of<T: ?Sized>() -> Self {
        Self::new(entry_name::<T>())
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[inline]
    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    /// Sets the constructor
    pub fn with_constructor<R, F>(mut self, constructor: F) -> Self
    where
        R: Send + Sync + 'static,
        F: Fn(Arguments) -> Result<R, Error> + Send + Sync + 'static
    {
        self.constructor = Some(Arc::new(move |args| {
            constructor(args).map(|instance| Arc::new(instance) as Service)
        }));
        self
    }

    /// Adds a constructor parameter
    #[inline]
    pub fn with_parameter(mut self, parameter: ParameterInjection) -> Self {
        self.constructor_injection.parameters.push(parameter);
        self
    }

    /// Adds a method called on the instance once it is built
    pub fn with_method<T, F>(mut self, method_name: impl Into<String>, parameters: Vec<ParameterInjection>, method: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&T, Arguments) -> Result<(), Error> + Send + Sync + 'static
    {
        let method_name = method_name.into();
        let name = method_name.clone();
        let call: MethodFn = Arc::new(move |target: &Service, args| {
            let target = target
                .downcast_ref::<T>()
                .ok_or_else(|| Error::TypeMismatch {
                    name: name.clone(),
                    expected: std::any::type_name::<T>()
                })?;
            method(target, args)
        });
        self.method_injections.push(MethodInjection::method(method_name, parameters, call));
        self
    }

    /// Marks the definition to be completed by autowiring
    #[inline]
    pub fn autowired(mut self) -> Self {
        self.autowired = true;
        self
    }

    #[inline]
    pub fn is_autowired(&self) -> bool {
        self.autowired
    }

    #[inline]
    pub fn constructor(&self) -> Option<&ConstructorFn> {
        self.constructor.as_ref()
    }

    #[inline]
    pub fn constructor_injection(&self) -> &MethodInjection {
        &self.constructor_injection
    }

    #[inline]
    pub fn method_injections(&self) -> &[MethodInjection] {
        &self.method_injections
    }

    /// Returns `true` if the object can be constructed
    #[inline]
    pub fn is_instantiable(&self) -> bool {
        self.constructor.is_some()
    }

    /// Completes this definition with what the metadata provider knows about the class.
    /// Whatever is already defined here prevails.
    pub fn complete_constructor_injection(&mut self, metadata: &ObjectDefinition) {
        if self.constructor.is_none() {
            self.constructor.clone_from(&metadata.constructor);
        }
        self.constructor_injection.merge(&metadata.constructor_injection);
        for method in &metadata.method_injections {
            let defined = self.method_injections
                .iter()
                .any(|current| current.method_name == method.method_name);
            if !defined {
                self.method_injections.push(method.clone());
            }
        }
    }

    /// Replaces the `*` tokens of the class name, in order
    pub(crate) fn replace_wildcards(&mut self, replacements: &[String]) {
        for replacement in replacements {
            self.class_name = self.class_name.replacen('*', replacement, 1);
        }
    }

    pub(crate) fn replace_nested_definitions<F>(&mut self, replacer: &mut F) -> Result<(), Error>
    where
        F: FnMut(Definition) -> Result<Definition, Error>
    {
        self.constructor_injection.replace_nested_definitions(replacer)?;
        self.method_injections
            .iter_mut()
            .try_for_each(|method| method.replace_nested_definitions(replacer))
    }
}

impl std::fmt::Debug for ObjectDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for ObjectDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object(class = {})", self.class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_merges_parameters_keeping_current_values() {
        let mut current = MethodInjection::constructor(vec![
            ParameterInjection::with_value("a", Definition::value(1)),
            ParameterInjection::new("b"),
        ]);
        let autowired = MethodInjection::constructor(vec![
            ParameterInjection::reference("a", "other_a"),
            ParameterInjection::reference("b", "other_b"),
            ParameterInjection::reference("c", "other_c"),
        ]);

        current.merge(&autowired);

        let rendered: Vec<_> = current.parameters()
            .iter()
            .map(|p| format!("{}={}", p.name(), p.value().map(ToString::to_string).unwrap_or_default()))
            .collect();

        assert_eq!(rendered, vec!["a=Value", "b=get(other_b)", "c=get(other_c)"]);
    }

    #[test]
    fn it_replaces_wildcards_in_order() {
        let mut object = ObjectDefinition::new("app::*::*Repository");

        object.replace_wildcards(&["db".into(), "User".into()]);

        assert_eq!(object.class_name(), "app::db::UserRepository");
    }

    #[test]
    fn it_completes_from_metadata() {
        let metadata = ObjectDefinition::new("Mailer")
            .with_constructor(|_| Ok(1u8))
            .with_parameter(ParameterInjection::reference("transport", "smtp"));

        let mut object = ObjectDefinition::new("Mailer").autowired();
        assert!(!object.is_instantiable());

        object.complete_constructor_injection(&metadata);
        object.complete_constructor_injection(&metadata);

        assert!(object.is_instantiable());
        assert_eq!(object.constructor_injection().parameters().len(), 1);
    }

    #[test]
    fn it_reports_argument_type_mismatch() {
        let args = Arguments::new(
            vec![("port".into(), Arc::new(8080u16) as Service)],
            TypeParameters::empty()
        );

        assert_eq!(*args.get::<u16>(0).unwrap(), 8080);
        assert_eq!(*args.by_name::<u16>("port").unwrap(), 8080);
        assert!(matches!(args.get::<String>(0), Err(Error::TypeMismatch { .. })));
        assert!(matches!(args.get::<u16>(1), Err(Error::InvalidDefinition(_))));
    }
}
