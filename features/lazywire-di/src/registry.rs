use std::{
    any::{type_name, TypeId},
    collections::HashMap,
    sync::Arc,
};

use crate::{
    errors::ProvideError,
    factories::{Dependencies, DynProducer, Outputs, Producer, ProducerFn},
    types::{DependencyInfo, Injectable, Instance, TypeInfo},
    validation,
};

/// Construction state of a Binding
///
/// `Unconstructed -> Constructing -> Constructed` on success,
/// `Constructing -> Unconstructed` when construction fails.
pub(crate) enum BindingState {
    Unconstructed(Arc<dyn DynProducer>),
    Constructing(Arc<dyn DynProducer>),
    /// Terminal - the memoized instance handed to every consumer
    Constructed(Instance),
}

impl BindingState {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            BindingState::Unconstructed(_) => "unconstructed",
            BindingState::Constructing(_) => "constructing",
            BindingState::Constructed(_) => "constructed",
        }
    }
}

/// Registry entry of a single type
pub(crate) struct Binding {
    pub(crate) info: TypeInfo,
    pub(crate) dependencies: Vec<DependencyInfo>,
    pub(crate) state: BindingState,
}

impl Binding {
    /// Validates the producer's declared outputs and binds it to its first output type
    pub(crate) fn producer<Args, P>(producer: P) -> Result<Binding, ProvideError>
    where
        Args: Dependencies + 'static,
        P: Producer<Args>,
    {
        let supplies = validation::producer_key(&P::Output::declared()).map_err(|violation| {
            ProvideError::InvalidProducerShape {
                producer: type_name::<P>(),
                violation,
            }
        })?;

        let producer = ProducerFn::<P, Args>::new(producer, supplies);
        Ok(Binding {
            info: supplies,
            dependencies: producer.dependencies(),
            state: BindingState::Unconstructed(producer),
        })
    }

    pub(crate) fn instance<T: Injectable>(instance: T) -> Binding {
        Binding {
            info: TypeInfo::of::<T>(),
            dependencies: vec![],
            state: BindingState::Constructed(Instance::new(instance)),
        }
    }
}

/// All Bindings of a container, at most one per type
#[derive(Default)]
pub(crate) struct Registry {
    bindings: HashMap<TypeId, Binding>,
}

impl Registry {
    pub(crate) fn insert(&mut self, binding: Binding) -> Result<(), ProvideError> {
        let info = binding.info;
        if self.bindings.contains_key(&info.type_id) {
            return Err(ProvideError::DuplicateProvider(info));
        }

        match &binding.state {
            BindingState::Constructed(_) => {
                tracing::debug!("Registered instance of {}", info.type_name)
            }
            _ => tracing::debug!("Registered producer for {}", info.type_name),
        }
        self.bindings.insert(info.type_id, binding);
        Ok(())
    }

    pub(crate) fn get_mut(&mut self, info: TypeInfo) -> Option<&mut Binding> {
        self.bindings.get_mut(&info.type_id)
    }

    pub(crate) fn contains(&self, info: TypeInfo) -> bool {
        self.bindings.contains_key(&info.type_id)
    }

    pub(crate) fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Reverts Bindings whose construction was interrupted by a panic
    pub(crate) fn reset_interrupted(&mut self) {
        for binding in self.bindings.values_mut() {
            if let BindingState::Constructing(producer) = &binding.state {
                tracing::debug!(
                    "Construction of {} was interrupted - resetting binding",
                    binding.info.type_name
                );
                binding.state = BindingState::Unconstructed(producer.clone());
            }
        }
    }
}
