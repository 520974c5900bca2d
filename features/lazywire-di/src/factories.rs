use std::{any::Any, marker::PhantomData, sync::Arc};

use crate::{
    errors::ResolveError,
    resolution::DiHandle,
    resolver::Resolver,
    types::{DependencyInfo, DynError, Failure, Injectable, Instance, TypeInfo},
};

/// Declared output list of a producer or consumer return type
///
/// Implemented for `()` (no outputs), tuples of up to four [`Injectable`] values
/// (one output per element) and `Result<T, E>` (`T` followed by a [`Failure`]).
pub trait Outputs: 'static {
    /// The declared output types, in order
    fn declared() -> Vec<TypeInfo>;

    /// Splits the returned values into the first ordinary output and a reported failure
    fn into_parts(self) -> Result<Option<Instance>, DynError>;
}

impl Outputs for () {
    fn declared() -> Vec<TypeInfo> {
        vec![]
    }

    fn into_parts(self) -> Result<Option<Instance>, DynError> {
        Ok(None)
    }
}

impl<T: Injectable, E: Into<DynError> + 'static> Outputs for Result<T, E> {
    fn declared() -> Vec<TypeInfo> {
        let value = TypeInfo::of::<T>();
        if value.is_unit() {
            vec![TypeInfo::of::<Failure>()]
        } else {
            vec![value, TypeInfo::of::<Failure>()]
        }
    }

    fn into_parts(self) -> Result<Option<Instance>, DynError> {
        match self {
            Ok(value) if TypeInfo::of::<T>().is_unit() => {
                drop(value);
                Ok(None)
            }
            Ok(value) => Ok(Some(Instance::new(value))),
            Err(error) => Err(error.into()),
        }
    }
}

/// Collects one declared output into the first value / first failure
#[derive(Default)]
struct OutputParts {
    value: Option<Instance>,
    failure: Failure,
}
impl OutputParts {
    fn push<T: Injectable>(&mut self, output: T) {
        if TypeInfo::of::<T>().is_failure() {
            let boxed: Box<dyn Any> = Box::new(output);
            if let Ok(failure) = boxed.downcast::<Failure>() {
                if self.failure.is_none() {
                    self.failure = *failure;
                }
            }
        } else if self.value.is_none() {
            self.value = Some(Instance::new(output));
        }
    }

    fn finish(self) -> Result<Option<Instance>, DynError> {
        match self.failure {
            Some(error) => Err(error),
            None => Ok(self.value),
        }
    }
}

macro_rules! impl_outputs {
    ($($out:ident),+) => {
        impl<$($out: Injectable),+> Outputs for ($($out,)+) {
            fn declared() -> Vec<TypeInfo> {
                vec![$(TypeInfo::of::<$out>()),+]
            }

            #[allow(non_snake_case)]
            fn into_parts(self) -> Result<Option<Instance>, DynError> {
                let ($($out,)+) = self;
                let mut parts = OutputParts::default();
                $(parts.push($out);)+
                parts.finish()
            }
        }
    };
}
impl_outputs!(O1);
impl_outputs!(O1, O2);
impl_outputs!(O1, O2, O3);
impl_outputs!(O1, O2, O3, O4);

/// Ordered list of declared inputs
pub trait Dependencies: Sized {
    /// Returns the declared inputs, in order
    fn infos() -> Vec<DependencyInfo>;

    /// Resolves every input left to right, aborting on the first failure
    fn resolve(handle: &mut DiHandle<'_>) -> Result<Self, ResolveError>;
}

/// A callable which manufactures the value of its first declared output
///
/// Implemented for any `Fn` of up to eight [`Resolver`] arguments returning [`Outputs`].
pub trait Producer<Args: Dependencies>: Send + Sync + 'static {
    type Output: Outputs;

    fn produce(&self, args: Args) -> Self::Output;
}

/// A callable whose declared inputs are satisfied from the container
///
/// Implemented for any `FnOnce` of up to eight [`Resolver`] arguments returning [`Outputs`].
pub trait Consumer<Args: Dependencies> {
    type Output: Outputs;

    fn consume(self, args: Args) -> Self::Output;
}

macro_rules! impl_callables {
    ($($arg:ident),*) => {
        impl<$($arg: Resolver),*> Dependencies for ($($arg,)*) {
            fn infos() -> Vec<DependencyInfo> {
                vec![$($arg::dependency_info()),*]
            }

            #[allow(unused_variables)]
            fn resolve(handle: &mut DiHandle<'_>) -> Result<Self, ResolveError> {
                Ok(($($arg::resolve(handle)?,)*))
            }
        }

        impl<Fun, Out, $($arg),*> Producer<($($arg,)*)> for Fun
        where
            Fun: Fn($($arg),*) -> Out + Send + Sync + 'static,
            Out: Outputs,
            $($arg: Resolver,)*
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn produce(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                self($($arg),*)
            }
        }

        impl<Fun, Out, $($arg),*> Consumer<($($arg,)*)> for Fun
        where
            Fun: FnOnce($($arg),*) -> Out,
            Out: Outputs,
            $($arg: Resolver,)*
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn consume(self, ($($arg,)*): ($($arg,)*)) -> Out {
                self($($arg),*)
            }
        }
    };
}
impl_callables!();
impl_callables!(A1);
impl_callables!(A1, A2);
impl_callables!(A1, A2, A3);
impl_callables!(A1, A2, A3, A4);
impl_callables!(A1, A2, A3, A4, A5);
impl_callables!(A1, A2, A3, A4, A5, A6);
impl_callables!(A1, A2, A3, A4, A5, A6, A7);
impl_callables!(A1, A2, A3, A4, A5, A6, A7, A8);

/// Wrapper Trait for producers, constructing instances of Any
pub(crate) trait DynProducer: Send + Sync {
    /// Returns the declared inputs of the producer
    fn dependencies(&self) -> Vec<DependencyInfo>;

    /// Resolves all inputs and invokes the producer
    fn construct(&self, handle: &mut DiHandle<'_>) -> Result<Instance, ResolveError>;
}

/// Type erased [`Producer`] together with the key it supplies
pub(crate) struct ProducerFn<P, Args> {
    producer: P,
    supplies: TypeInfo,
    _args: PhantomData<fn(Args)>,
}
impl<P, Args> ProducerFn<P, Args>
where
    P: Producer<Args>,
    Args: Dependencies + 'static,
{
    pub(crate) fn new(producer: P, supplies: TypeInfo) -> Arc<dyn DynProducer> {
        Arc::new(ProducerFn {
            producer,
            supplies,
            _args: PhantomData,
        })
    }
}
impl<P, Args> DynProducer for ProducerFn<P, Args>
where
    P: Producer<Args>,
    Args: Dependencies + 'static,
{
    fn dependencies(&self) -> Vec<DependencyInfo> {
        Args::infos()
    }

    fn construct(&self, handle: &mut DiHandle<'_>) -> Result<Instance, ResolveError> {
        let args = Args::resolve(handle)?;

        match self.producer.produce(args).into_parts() {
            Ok(Some(instance)) => Ok(instance),
            Ok(None) => Err(ResolveError::EmptyOutput(self.supplies)),
            Err(error) => Err(ResolveError::ProducerFailed {
                product: self.supplies,
                error: Arc::new(error),
            }),
        }
    }
}
