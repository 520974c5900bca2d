use crate::{
    container::DiContainer,
    dependency_graph::{DependencyGraph, DependencyGraphErrors},
    errors::ProvideError,
    factories::{Dependencies, Producer},
    registry::{Binding, Registry},
    types::Injectable,
};

/// Collects producers and instances, then checks the dependency graph before
/// handing out the container.
///
/// Building does not construct anything - producers still run on first use.
#[derive(Default)]
pub struct DiBuilder {
    registry: Registry,
}

impl DiBuilder {
    pub fn new() -> Self {
        DiBuilder {
            registry: Registry::default(),
        }
    }

    pub fn provide<Args, P>(mut self, producer: P) -> Result<Self, ProvideError>
    where
        Args: Dependencies + 'static,
        P: Producer<Args>,
    {
        self.registry.insert(Binding::producer::<Args, P>(producer)?)?;
        Ok(self)
    }

    pub fn add_instance<T: Injectable>(mut self, instance: T) -> Result<Self, ProvideError> {
        self.registry.insert(Binding::instance(instance))?;
        Ok(self)
    }

    /// The dependency graph of everything registered so far
    pub fn graph(&self) -> DependencyGraph {
        DependencyGraph::from_bindings(self.registry.bindings())
    }

    /// Returns the container if no dependency is missing and no cycle exists
    pub fn build(self) -> Result<DiContainer, DependencyGraphErrors> {
        self.graph().check()?;
        Ok(DiContainer::from_registry(self.registry))
    }
}
