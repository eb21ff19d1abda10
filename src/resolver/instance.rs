//! Injects dependencies into existing instances

use super::{DefinitionResolver, Resolution, object::inject_methods};
use crate::{
    Service,
    definition::InstanceDefinition,
    error::Error
};

/// Calls the method injections on an instance built outside of the container
#[derive(Debug, Default, Clone, Copy)]
pub struct InstanceInjector;

impl DefinitionResolver<InstanceDefinition> for InstanceInjector {
    fn resolve(&self, instance: &InstanceDefinition, resolution: &Resolution<'_>) -> Result<Service, Error> {
        inject_methods(instance.instance(), instance.object_definition(), resolution)?;
        Ok(instance.instance().clone())
    }

    #[inline]
    fn is_resolvable(&self, _: &InstanceDefinition, _: &Resolution<'_>) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ContainerBuilder,
        definition::{Arguments, ObjectDefinition, ParameterInjection},
        entry_name,
        helpers::{create, value},
        source::RegistryAutowiring
    };
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct Greeter {
        greetings: Mutex<Vec<String>>
    }

    fn greet(greeter: &Greeter, args: Arguments) -> Result<(), crate::Error> {
        let who = args.cloned::<&str>(0)?;
        greeter.greetings.lock().unwrap().push(format!("hello, {who}"));
        Ok(())
    }

    #[test]
    fn it_injects_on_registered_definition() {
        let container = ContainerBuilder::new().build();
        container.set(entry_name::<Greeter>(), create()
            .method("greet", vec![ParameterInjection::with_value("who", value("world"))], greet));

        let greeter = container.inject_on(Greeter::default()).unwrap();

        assert_eq!(*greeter.greetings.lock().unwrap(), vec!["hello, world"]);
    }

    #[test]
    fn it_injects_on_autowired_definition() {
        let registry = RegistryAutowiring::new().with(ObjectDefinition::of::<Greeter>()
            .with_method("greet", vec![ParameterInjection::with_value("who", value("registry"))], greet));
        let container = ContainerBuilder::new()
            .with_autowiring(registry)
            .build();

        let greeter = container.inject_on(Greeter::default()).unwrap();

        assert_eq!(*greeter.greetings.lock().unwrap(), vec!["hello, registry"]);
    }

    #[test]
    fn it_fails_without_definition() {
        let container = ContainerBuilder::new().build();

        let err = container.inject_on(Greeter::default()).unwrap_err();

        assert!(matches!(err, crate::Error::InvalidDefinition(_)));
    }
}
