use std::{
    fmt::Debug,
    sync::{Arc, OnceLock, Weak},
};

use crate::{
    container::{DiContainer, DiContainerInner},
    errors::ResolveError,
    resolution::DiHandle,
    resolver::Resolver,
    types::{DependencyInfo, Injectable, TypeInfo},
};

/// Lazily resolved dependency
///
/// Injecting a `Lazy<T>` only checks that `T` has a producer. `T` itself is constructed
/// on the first call to [`Lazy::get`], which makes it possible to break dependency cycles.
///
/// `get` must not be called while the container is still resolving, i.e. from inside a
/// producer - doing so fails with [`ResolveError::Reentrant`].
/// The container is only weakly referenced, values holding a `Lazy` do not keep it alive.
pub struct Lazy<T: Injectable>(Arc<LazyInner<T>>);
struct LazyInner<T: Injectable> {
    container: Weak<DiContainerInner>,
    once: OnceLock<Arc<T>>,
}
impl<T: Injectable> Clone for Lazy<T> {
    fn clone(&self) -> Self {
        Lazy(self.0.clone())
    }
}
impl<T: Injectable + Debug> Debug for Lazy<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.once.get() {
            Some(instance) => f.debug_tuple("Lazy").field(instance).finish(),
            None => f.debug_tuple("Lazy").field(&"<unresolved>").finish(),
        }
    }
}
impl<T: Injectable> Resolver for Lazy<T> {
    fn resolve(handle: &mut DiHandle<'_>) -> Result<Self, ResolveError>
    where
        Self: Sized,
    {
        let info = TypeInfo::of::<T>();
        if !handle.is_bound(info) {
            return Err(ResolveError::ProviderNotFound {
                dependency: info,
                chain: handle.chain().to_vec(),
            });
        }

        Ok(Lazy(Arc::new(LazyInner {
            container: handle.container().downgrade(),
            once: OnceLock::new(),
        })))
    }

    fn dependency_info() -> DependencyInfo {
        DependencyInfo {
            type_info: TypeInfo::of::<T>(),
            optional: false,
            lazy: true,
        }
    }
}
impl<T: Injectable> Lazy<T> {
    /// Accesses the dependency, constructing it on first access
    pub fn get(&self) -> Result<Arc<T>, ResolveError> {
        if let Some(instance) = self.0.once.get() {
            return Ok(instance.clone());
        }

        let container =
            DiContainer::upgrade(&self.0.container).ok_or(ResolveError::ContainerDropped)?;
        let resolved = container.require::<T>()?;

        // Another clone may have won the race - both hold the same memoized instance
        Ok(self.0.once.get_or_init(|| resolved).clone())
    }

    /// Whether the dependency was already accessed through this handle
    pub fn is_resolved(&self) -> bool {
        self.0.once.get().is_some()
    }
}
