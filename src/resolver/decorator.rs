//! Resolves decorator definitions

use super::{DefinitionResolver, Resolution};
use crate::{
    Service,
    definition::DecoratorDefinition,
    error::Error
};

/// Resolves the decorated definition, then hands its value to the decorator
#[derive(Debug, Default, Clone, Copy)]
pub struct DecoratorResolver;

impl DefinitionResolver<DecoratorDefinition> for DecoratorResolver {
    fn resolve(&self, decorator: &DecoratorDefinition, resolution: &Resolution<'_>) -> Result<Service, Error> {
        let callable = decorator
            .callable()
            .ok_or_else(|| Error::invalid(format!(
                "The decorator \"{}\" is not callable",
                resolution.label()
            )))?;

        let decorated = decorator
            .decorated_definition()
            .ok_or_else(|| match resolution.name() {
                "" => Error::invalid("Decorators cannot be nested in another definition"),
                name => Error::invalid(format!(
                    "Entry \"{name}\" decorates nothing: no previous definition with the same name was found"
                ))
            })?;

        let previous = resolution
            .dispatcher()
            .resolve(resolution.container(), decorated, resolution.parameters())?;

        callable(previous, resolution.container())
    }

    #[inline]
    fn is_resolvable(&self, decorator: &DecoratorDefinition, _: &Resolution<'_>) -> bool {
        decorator.callable().is_some()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Container,
        ContainerBuilder,
        Definition,
        definition::DecoratorDefinition,
        helpers::{array, decorate, factory}
    };
    use std::sync::Arc;

    #[test]
    fn it_decorates_previous_definition() {
        let container = ContainerBuilder::new()
            .add_definitions([("x", factory(|| 2))])
            .add_definitions([("x", decorate(|x: Arc<i32>, _: &Container| Ok(*x * 10)))])
            .build();

        assert_eq!(container.resolve::<i32>("x").unwrap(), 20);
    }

    #[test]
    fn it_fails_when_decorating_nothing() {
        let container = ContainerBuilder::new().build();
        container.set("x", decorate(|x: Arc<i32>, _: &Container| Ok(*x)));

        let err = container.get("x").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Container Error: invalid definition: Entry \"x\" decorates nothing: no previous definition with the same name was found"
        );
    }

    #[test]
    fn it_fails_when_nested() {
        let container = ContainerBuilder::new().build();
        container.set("list", array().item(decorate(|x: Arc<i32>, _: &Container| Ok(*x))));

        let err = container.get("list").unwrap_err();

        assert_eq!(
            err.to_string(),
            "Container Error: invalid definition: Decorators cannot be nested in another definition"
        );
    }

    #[test]
    fn it_fails_without_callable() {
        let container = ContainerBuilder::new()
            .add_definitions([("x", factory(|| 2))])
            .build();
        container.set("x", Definition::from(DecoratorDefinition::default()));

        let err = container.get("x").unwrap_err();

        assert_eq!(err.to_string(), "Container Error: invalid definition: The decorator \"x\" is not callable");
    }
}
