use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, TypeInfo};

/// Why a declared output list was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeViolation {
    #[error("it declares no outputs")]
    NoOutputs,
    #[error("it declares {0} outputs")]
    TooManyOutputs(usize),
    #[error("its second output '{0}' is not the failure kind")]
    SecondOutputNotFailure(TypeInfo),
    #[error("its first output is the failure kind")]
    FailureAsValue,
    #[error("it returns a value of type '{0}'")]
    ReturnsValue(TypeInfo),
}

/// Errors when registering a producer
#[derive(Error, Debug, Clone)]
pub enum ProvideError {
    /// The producer's declared outputs can not key a Binding
    #[error("Invalid producer '{producer}': {violation}")]
    InvalidProducerShape {
        producer: &'static str,
        violation: ShapeViolation,
    },
    /// Another producer already supplies this type
    #[error("A producer for '{0}' is already registered")]
    DuplicateProvider(TypeInfo),
    /// Registration was attempted from inside a running resolution of the same container
    #[error("Container was accessed from inside one of its own producers")]
    Reentrant,
}

/// Errors while resolving a consumer or a single type
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    /// The consumer returns something other than nothing or a single failure
    #[error("Invalid consumer '{consumer}': {violation}")]
    InvalidConsumerShape {
        consumer: &'static str,
        violation: ShapeViolation,
    },
    /// A required type has no producer
    #[error("No producer registered for '{dependency}'")]
    ProviderNotFound {
        dependency: TypeInfo,
        /// Types under construction when the type was required, outermost first
        chain: Vec<TypeInfo>,
    },
    /// A resolver found no value to hand out for a registered type
    #[error("No value available for '{value}'")]
    ValueMissing {
        value: TypeInfo,
        /// Types under construction when the value was requested, outermost first
        chain: Vec<TypeInfo>,
    },
    /// The resolution chain re-entered a type which is still under construction
    #[error("Cyclic dependency detected for '{dependency}' through {chain:?} - Consider using `Lazy`")]
    CyclicDependency {
        dependency: TypeInfo,
        /// Types under construction, ending with the re-entered type
        chain: Vec<TypeInfo>,
    },
    /// A producer reported an error - displayed as is
    #[error("{error}")]
    ProducerFailed {
        product: TypeInfo,
        error: Arc<DynError>,
    },
    /// The consumer reported an error - displayed as is
    #[error("{0}")]
    ConsumerFailed(Arc<DynError>),
    /// A producer returned without any value to store
    #[error("Producer for '{0}' returned no value")]
    EmptyOutput(TypeInfo),

    #[error("Failed to downcast, required: '{required_type}' actual: '{actual_type}'")]
    DowncastFailed {
        required_type: &'static str,
        actual_type: &'static str,
    },
    /// Resolution was attempted from inside a running resolution of the same container
    #[error("Container was accessed from inside one of its own producers")]
    Reentrant,
    /// A `Lazy` dependency outlived its container
    #[error("Container was dropped before the lazy dependency was accessed")]
    ContainerDropped,
    /// A resolver failed for a reason of its own
    #[error("Error during injection: {0}")]
    Other(Arc<DynError>),
}

impl ResolveError {
    /// The error reported by a producer, the consumer or a resolver
    pub fn failure(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            ResolveError::ProducerFailed { error, .. }
            | ResolveError::ConsumerFailed(error)
            | ResolveError::Other(error) => Some(&***error),
            _ => None,
        }
    }
}
