use std::{
    any::{Any, TypeId},
    sync::Arc,
};

/// Boxed error reported by producers and consumers
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// The designated failure kind of a declared output list.
///
/// `None` means the call succeeded, `Some(err)` is a non-empty error.
pub type Failure = Option<DynError>;

/// Values are shared between every consumer of a key, possibly across threads,
/// so anything injectable needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Constructed value of a Binding
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: Arc<dyn Any + Send + Sync + 'static>,
}

impl Instance {
    pub(crate) fn new<ExistingInstance: Injectable>(instance: ExistingInstance) -> Self {
        Instance {
            info: TypeInfo::of::<ExistingInstance>(),
            instance: Arc::new(instance),
        }
    }

    /// Returns the shared value, or the name of the actual type on mismatch
    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

/// Information about a declared input of a producer or consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyInfo {
    /// The required Type
    pub type_info: TypeInfo,
    /// If a missing producer is tolerated
    pub optional: bool,
    /// If the Dependency is only constructed on first access
    pub lazy: bool,
}

impl DependencyInfo {
    pub fn required<T: 'static + ?Sized>() -> Self {
        DependencyInfo {
            type_info: TypeInfo::of::<T>(),
            optional: false,
            lazy: false,
        }
    }
}

/// Type Name and Type Id - the key of every Binding
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Whether this type is the designated failure kind ([`Failure`])
    pub fn is_failure(&self) -> bool {
        self.type_id == TypeId::of::<Failure>()
    }

    pub(crate) fn is_unit(&self) -> bool {
        self.type_id == TypeId::of::<()>()
    }
}
