use crate::{
    container::DiContainer,
    errors::ResolveError,
    registry::{BindingState, Registry},
    resolver::Resolver,
    types::{Instance, TypeInfo},
};

/// DI Handle for resolving dependencies while the container is locked.
///
/// A handle only lives for a single resolution call. It is handed to every
/// [`Resolver`] so parameters can require their keys from the registry.
pub struct DiHandle<'a> {
    registry: &'a mut Registry,
    container: &'a DiContainer,
    /// Types currently under construction, outermost first
    chain: Vec<TypeInfo>,
}

impl<'a> DiHandle<'a> {
    pub(crate) fn new(registry: &'a mut Registry, container: &'a DiContainer) -> Self {
        DiHandle {
            registry,
            container,
            chain: Vec::new(),
        }
    }

    /// Resolves a parameter type
    pub fn resolve<T: Resolver>(&mut self) -> Result<T, ResolveError> {
        T::resolve(self)
    }

    /// Returns the instance bound to `info`, constructing it and its dependencies on first use
    pub fn require(&mut self, info: TypeInfo) -> Result<Instance, ResolveError> {
        let Some(binding) = self.registry.get_mut(info) else {
            tracing::debug!("No producer registered for {}", info.type_name);
            return Err(ResolveError::ProviderNotFound {
                dependency: info,
                chain: self.chain.clone(),
            });
        };

        let producer = match &binding.state {
            BindingState::Constructed(instance) => {
                tracing::trace!("Reusing constructed instance of {}", info.type_name);
                return Ok(instance.clone());
            }
            BindingState::Constructing(_) => {
                let mut chain = self.chain.clone();
                chain.push(info);
                tracing::debug!("Detected cyclic dependency for {}", info.type_name);
                return Err(ResolveError::CyclicDependency {
                    dependency: info,
                    chain,
                });
            }
            BindingState::Unconstructed(producer) => producer.clone(),
        };

        tracing::debug!("Constructing {}", info.type_name);
        binding.state = BindingState::Constructing(producer.clone());

        self.chain.push(info);
        let result = producer.construct(self);
        self.chain.pop();

        // Bindings are never removed
        let Some(binding) = self.registry.get_mut(info) else {
            return result;
        };

        match result {
            Ok(instance) => {
                tracing::debug!("Constructed instance of {}", info.type_name);
                binding.state = BindingState::Constructed(instance.clone());
                Ok(instance)
            }
            Err(err) => {
                tracing::debug!("Construction of {} failed: {}", info.type_name, err);
                binding.state = BindingState::Unconstructed(producer);
                Err(err)
            }
        }
    }

    /// Whether a producer or instance is registered for `info`
    pub fn is_bound(&self, info: TypeInfo) -> bool {
        self.registry.contains(info)
    }

    /// Types currently under construction, outermost first
    pub fn chain(&self) -> &[TypeInfo] {
        &self.chain
    }

    /// The container this handle resolves from
    pub fn container(&self) -> &DiContainer {
        self.container
    }
}
