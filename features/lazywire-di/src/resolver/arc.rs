use std::{any::type_name, sync::Arc};

use crate::{
    errors::ResolveError,
    resolution::DiHandle,
    resolver::Resolver,
    types::{DependencyInfo, Injectable, TypeInfo},
};

impl<T: Injectable> Resolver for Arc<T> {
    fn resolve(handle: &mut DiHandle<'_>) -> Result<Self, ResolveError> {
        let resolved = handle.require(TypeInfo::of::<T>())?;
        let downcasted = resolved
            .downcast::<T>()
            .map_err(|actual_type| ResolveError::DowncastFailed {
                required_type: type_name::<T>(),
                actual_type,
            })?;

        Ok(downcasted)
    }

    fn dependency_info() -> DependencyInfo {
        DependencyInfo::required::<T>()
    }
}

impl<Resolvable: Resolver> Resolver for Option<Resolvable> {
    fn resolve(handle: &mut DiHandle<'_>) -> Result<Self, ResolveError>
    where
        Self: Sized,
    {
        let wanted = Resolvable::dependency_info().type_info;
        let depth = handle.chain().len();
        match Resolvable::resolve(handle) {
            Ok(resolved) => Ok(Some(resolved)),
            // Only a missing producer for this very type is tolerated
            Err(ResolveError::ProviderNotFound { dependency, .. }) if dependency == wanted => {
                Ok(None)
            }
            // A value missing deeper down belongs to another producer's parameter
            Err(ResolveError::ValueMissing { chain, .. }) if chain.len() == depth => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn dependency_info() -> DependencyInfo {
        let original = Resolvable::dependency_info();
        DependencyInfo {
            optional: true,
            ..original
        }
    }
}
