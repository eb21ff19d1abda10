//! Creates objects from their definitions

use super::{DefinitionResolver, Resolution};
use crate::{
    Parameters,
    Service,
    definition::{Arguments, MethodInjection, ObjectDefinition},
    error::Error
};

/// Builds an object with its constructor, then calls its method injections
///
/// A constructor parameter takes the value passed to [`crate::Container::make`]
/// under its name first, then its injected definition.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObjectCreator;

impl DefinitionResolver<ObjectDefinition> for ObjectCreator {
    fn resolve(&self, object: &ObjectDefinition, resolution: &Resolution<'_>) -> Result<Service, Error> {
        let constructor = object
            .constructor()
            .ok_or_else(|| Error::invalid(format!(
                "Entry \"{}\" cannot be resolved: the class {} is not instantiable",
                entry_label(object, resolution),
                object.class_name()
            )))?;

        let arguments = resolve_arguments(
            object,
            object.constructor_injection(),
            Some(resolution.parameters()),
            resolution
        )?;
        let instance = constructor(arguments)?;

        inject_methods(&instance, object, resolution)?;
        Ok(instance)
    }

    #[inline]
    fn is_resolvable(&self, object: &ObjectDefinition, _: &Resolution<'_>) -> bool {
        object.is_instantiable()
    }
}

/// Calls every method injection of `object` on `instance`
pub(super) fn inject_methods(instance: &Service, object: &ObjectDefinition, resolution: &Resolution<'_>) -> Result<(), Error> {
    for method in object.method_injections() {
        let arguments = resolve_arguments(object, method, None, resolution)?;
        if let Some(call) = method.call() {
            call(instance, arguments)?;
        }
    }
    Ok(())
}

fn resolve_arguments(
    object: &ObjectDefinition,
    method: &MethodInjection,
    provided: Option<&Parameters>,
    resolution: &Resolution<'_>
) -> Result<Arguments, Error> {
    let values = method
        .parameters()
        .iter()
        .map(|parameter| {
            let value = match (provided.and_then(|p| p.get(parameter.name())), parameter.value()) {
                (Some(value), _) => value.clone(),
                (None, Some(definition)) => resolution.resolve_nested(definition)?,
                (None, None) => return Err(Error::invalid(format!(
                    "Entry \"{}\" cannot be resolved: Parameter ${} of {}::{}() has no value defined or guessable",
                    entry_label(object, resolution),
                    parameter.name(),
                    object.class_name(),
                    method.method_name()
                )))
            };
            Ok((parameter.name().to_owned(), value))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(Arguments::new(values, resolution.type_parameters().clone()))
}

#[inline]
fn entry_label(object: &ObjectDefinition, resolution: &Resolution<'_>) -> String {
    match resolution.name() {
        "" => object.class_name().to_owned(),
        _ => resolution.label()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ContainerBuilder,
        Parameters,
        Service,
        definition::{Arguments, ParameterInjection},
        helpers::{create, get, value}
    };
    use std::sync::{Arc, Mutex};

    struct Mailer {
        transport: String
    }

    #[derive(Default)]
    struct EventLog {
        listeners: Mutex<Vec<String>>
    }

    #[test]
    fn it_injects_constructor_parameters() {
        let container = ContainerBuilder::new().build();
        container.set("transport", value(String::from("smtp")));
        container.set("mailer", create()
            .constructor(|args: Arguments| Ok(Mailer { transport: args.cloned::<String>(0)? }))
            .parameter("transport", get("transport")));

        let mailer = container.resolve_shared::<Mailer>("mailer").unwrap();

        assert_eq!(mailer.transport, "smtp");
    }

    #[test]
    fn it_calls_method_injections() {
        let container = ContainerBuilder::new().build();
        container.set("log", create()
            .constructor(|_| Ok(EventLog::default()))
            .method(
                "add_listener",
                vec![ParameterInjection::with_value("name", value("audit"))],
                |log: &EventLog, args: Arguments| {
                    log.listeners.lock().unwrap().push(args.cloned::<&str>(0)?.to_owned());
                    Ok(())
                }
            ));

        let log = container.resolve_shared::<EventLog>("log").unwrap();

        assert_eq!(*log.listeners.lock().unwrap(), vec!["audit"]);
    }

    #[test]
    fn it_fails_on_missing_parameter() {
        let container = ContainerBuilder::new().build();
        container.set("mailer", create()
            .constructor(|args: Arguments| Ok(Mailer { transport: args.cloned::<String>(0)? }))
            .required("transport"));

        let err = container.get("mailer").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Container Error: invalid definition: Entry \"mailer\" cannot be resolved: \
            Parameter $transport of mailer::new() has no value defined or guessable"
        );
    }

    #[test]
    fn it_takes_explicit_parameters_first() {
        let container = ContainerBuilder::new().build();
        container.set("mailer", create()
            .constructor(|args: Arguments| Ok(Mailer { transport: args.cloned::<String>(0)? }))
            .required("transport"));

        let mut parameters = Parameters::new();
        parameters.insert("transport".into(), Arc::new(String::from("sendmail")) as Service);

        let mailer = container
            .make("mailer", parameters)
            .unwrap()
            .downcast::<Mailer>()
            .unwrap();

        assert_eq!(mailer.transport, "sendmail");
    }

    #[test]
    fn it_fails_when_not_instantiable() {
        let container = ContainerBuilder::new().build();
        container.set("mailer", create().class("app::Mailer"));

        let err = container.get("mailer").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Container Error: invalid definition: Entry \"mailer\" cannot be resolved: the class app::Mailer is not instantiable"
        );
    }
}
