use std::{
    any::type_name,
    cell::RefCell,
    fmt::Debug,
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use crate::{
    dependency_graph::DependencyGraph,
    errors::{ProvideError, ResolveError},
    factories::{Consumer, Dependencies, Outputs, Producer},
    registry::{Binding, Registry},
    resolution::DiHandle,
    types::{Injectable, TypeInfo},
    validation,
};

thread_local! {
    /// Containers the current thread holds the registry lock of
    static LOCKED_CONTAINERS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Container holding all registered producers and their constructed instances
///
/// Cloning is cheap, all clones share the same registry.
#[derive(Clone)]
pub struct DiContainer(Arc<DiContainerInner>);
pub(crate) struct DiContainerInner {
    registry: Mutex<Registry>,
}
impl Debug for DiContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("DiContainer");
        match self.lock() {
            Some(registry) => {
                for binding in registry.bindings() {
                    map.field(binding.info.type_name, &binding.state.name());
                }
            }
            None => {
                map.field("registry", &"<locked by current resolution>");
            }
        }
        map.finish()
    }
}
impl Default for DiContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl DiContainer {
    /// Creates an empty container
    pub fn new() -> Self {
        Self::from_registry(Registry::default())
    }

    pub(crate) fn from_registry(registry: Registry) -> Self {
        Self(Arc::new(DiContainerInner {
            registry: Mutex::new(registry),
        }))
    }

    /// Registers a producer for the type of its first declared output.
    ///
    /// The producer is not invoked here. It runs the first time its type is required,
    /// and at most once successfully for the lifetime of the container.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use lazywire_di::DiContainer;
    ///
    /// struct LibName(&'static str);
    /// struct Library { name: Arc<LibName> }
    ///
    /// let container = DiContainer::new();
    /// container.provide(|| (LibName("lazywire"),)).unwrap();
    /// container.provide(|name: Arc<LibName>| (Library { name },)).unwrap();
    ///
    /// container.resolve(|lib: Arc<Library>| assert_eq!(lib.name.0, "lazywire")).unwrap();
    /// ```
    pub fn provide<Args, P>(&self, producer: P) -> Result<(), ProvideError>
    where
        Args: Dependencies + 'static,
        P: Producer<Args>,
    {
        self.insert(Binding::producer::<Args, P>(producer)?)
    }

    /// Registers an already constructed value
    pub fn provide_instance<T: Injectable>(&self, instance: T) -> Result<(), ProvideError> {
        self.insert(Binding::instance(instance))
    }

    /// Resolves every declared input of `consumer` and invokes it.
    ///
    /// The consumer may return nothing or a `Result<(), E>`. An error it returns is
    /// handed back as [`ResolveError::ConsumerFailed`]. The consumer only runs once
    /// all of its inputs were resolved.
    pub fn resolve<Args, C>(&self, consumer: C) -> Result<(), ResolveError>
    where
        Args: Dependencies,
        C: Consumer<Args>,
    {
        let consumer_name = type_name::<C>();
        validation::consumer_shape(&C::Output::declared()).map_err(|violation| {
            ResolveError::InvalidConsumerShape {
                consumer: consumer_name,
                violation,
            }
        })?;

        // The lock is released before the consumer runs
        let args = self.with_handle(|handle| Args::resolve(handle))?;

        match consumer.consume(args).into_parts() {
            Ok(_) => Ok(()),
            Err(error) => {
                tracing::debug!("Consumer {} failed: {}", consumer_name, error);
                Err(ResolveError::ConsumerFailed(Arc::new(error)))
            }
        }
    }

    /// Attempts to get the instance of the requested type, constructing it if needed
    pub fn require<T: Injectable>(&self) -> Result<Arc<T>, ResolveError> {
        self.with_handle(|handle| handle.resolve::<Arc<T>>())
    }

    /// Whether a producer or instance is registered for `T`
    ///
    /// Fails with [`ResolveError::Reentrant`] when called from one of the container's own producers.
    pub fn contains<T: 'static>(&self) -> Result<bool, ResolveError> {
        let registry = self.lock().ok_or(ResolveError::Reentrant)?;
        Ok(registry.contains(TypeInfo::of::<T>()))
    }

    /// Snapshot of the registered types and their declared dependencies
    ///
    /// Fails with [`ResolveError::Reentrant`] when called from one of the container's own producers.
    pub fn graph(&self) -> Result<DependencyGraph, ResolveError> {
        let registry = self.lock().ok_or(ResolveError::Reentrant)?;
        Ok(DependencyGraph::from_bindings(registry.bindings()))
    }

    pub(crate) fn downgrade(&self) -> Weak<DiContainerInner> {
        Arc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(weak: &Weak<DiContainerInner>) -> Option<DiContainer> {
        weak.upgrade().map(DiContainer)
    }

    fn insert(&self, binding: Binding) -> Result<(), ProvideError> {
        let _guard = LockMarker::acquire(self).ok_or(ProvideError::Reentrant)?;
        self.lock_registry().insert(binding)
    }

    /// Runs `f` with a resolution handle, holding the registry lock for its whole duration
    fn with_handle<T>(
        &self,
        f: impl FnOnce(&mut DiHandle<'_>) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        let _guard = LockMarker::acquire(self).ok_or(ResolveError::Reentrant)?;
        let mut registry = self.lock_registry();
        let mut handle = DiHandle::new(&mut registry, self);
        f(&mut handle)
    }

    /// Locks the registry unless the current thread already holds it
    fn lock(&self) -> Option<MutexGuard<'_, Registry>> {
        let _guard = LockMarker::acquire(self)?;
        Some(self.lock_registry())
    }

    fn lock_registry(&self) -> MutexGuard<'_, Registry> {
        match self.0.registry.lock() {
            Ok(registry) => registry,
            // A producer panicked mid construction
            Err(poisoned) => {
                let mut registry = poisoned.into_inner();
                registry.reset_interrupted();
                self.0.registry.clear_poison();
                registry
            }
        }
    }

    fn address(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

/// Marks the container as locked by the current thread until dropped
struct LockMarker {
    address: usize,
}
impl LockMarker {
    /// Returns `None` if the current thread already holds the container's lock
    fn acquire(container: &DiContainer) -> Option<Self> {
        let address = container.address();
        LOCKED_CONTAINERS.with(|locked| {
            let mut locked = locked.borrow_mut();
            if locked.contains(&address) {
                return None;
            }
            locked.push(address);
            Some(LockMarker { address })
        })
    }
}
impl Drop for LockMarker {
    fn drop(&mut self) {
        LOCKED_CONTAINERS.with(|locked| {
            let mut locked = locked.borrow_mut();
            if let Some(position) = locked.iter().rposition(|address| *address == self.address) {
                locked.swap_remove(position);
            }
        });
    }
}
