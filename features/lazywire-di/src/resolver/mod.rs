use crate::{errors::ResolveError, resolution::DiHandle, types::DependencyInfo};

pub mod arc;
pub mod lazy;

/// A parameter type which can be injected into producers and consumers
pub trait Resolver {
    /// Resolves the parameter from the handle's container
    fn resolve(handle: &mut DiHandle<'_>) -> Result<Self, ResolveError>
    where
        Self: Sized;

    /// Describes the key the parameter depends on
    fn dependency_info() -> DependencyInfo;
}
