mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use lazywire_di::{DiBuilder, DiContainer, Lazy, ResolveError, TypeInfo};

struct Parent {
    child: Lazy<Child>,
}
struct Child {
    parent: Arc<Parent>,
}

fn cyclic_container() -> DiContainer {
    let container = DiContainer::new();
    container
        .provide(|child: Lazy<Child>| (Parent { child },))
        .unwrap();
    container
        .provide(|parent: Arc<Parent>| (Child { parent },))
        .unwrap();
    container
}

#[test]
fn lazy_breaks_dependency_cycle() {
    common::init_tracing();
    let container = cyclic_container();

    let parent = container.require::<Parent>().unwrap();
    assert!(!parent.child.is_resolved());

    let child = parent.child.get().unwrap();
    assert!(parent.child.is_resolved());
    assert!(Arc::ptr_eq(&child.parent, &parent));
    assert!(Arc::ptr_eq(&child, &container.require::<Child>().unwrap()));
}

#[test]
fn lazy_edges_are_not_reported_as_cycles() {
    let graph = cyclic_container().graph().unwrap();
    assert!(graph.check().is_ok());

    let parent_deps = graph.dependencies_of(TypeInfo::of::<Parent>()).unwrap();
    assert_eq!(parent_deps.len(), 1);
    assert!(parent_deps[0].lazy);
}

#[test]
fn lazy_defers_construction_until_get() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);
    struct Heavy;
    struct Holder(Lazy<Heavy>);

    let container = DiBuilder::new()
        .provide(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            (Heavy,)
        })
        .unwrap()
        .provide(|heavy: Lazy<Heavy>| (Holder(heavy),))
        .unwrap()
        .build()
        .unwrap();

    let holder = container.require::<Holder>().unwrap();
    assert_eq!(CALLS.load(Ordering::SeqCst), 0);

    let clone = holder.0.clone();
    let first = holder.0.get().unwrap();
    let second = clone.get().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn lazy_without_provider_fails_at_injection() {
    struct Unregistered;

    let container = DiContainer::new();
    let err = container
        .resolve(|_: Lazy<Unregistered>| {})
        .unwrap_err();
    let ResolveError::ProviderNotFound { dependency, chain } = &err else {
        panic!("expected provider not found, got {err:?}");
    };
    assert_eq!(*dependency, TypeInfo::of::<Unregistered>());
    assert!(chain.is_empty());
}

#[test]
fn optional_lazy_is_none_without_provider() {
    struct Unregistered;

    let container = DiContainer::new();
    container
        .resolve(|lazy: Option<Lazy<Unregistered>>| assert!(lazy.is_none()))
        .unwrap();
}

#[test]
fn lazy_get_inside_producer_is_reentrant() {
    #[derive(Debug)]
    struct Eager;
    #[derive(Debug)]
    struct Wanted;

    let container = DiContainer::new();
    container.provide(|| (Wanted,)).unwrap();
    container
        .provide(|wanted: Lazy<Wanted>| {
            wanted.get()?;
            Ok::<_, ResolveError>(Eager)
        })
        .unwrap();

    let err = container.require::<Eager>().unwrap_err();
    let reported = err
        .failure()
        .and_then(|failure| failure.downcast_ref::<ResolveError>());
    assert!(matches!(reported, Some(ResolveError::Reentrant)));
}

#[test]
fn lazy_outliving_container_reports_drop() {
    struct Value;

    let container = DiContainer::new();
    container.provide(|| (Value,)).unwrap();

    let mut escaped = None;
    container
        .resolve(|lazy: Lazy<Value>| escaped = Some(lazy))
        .unwrap();
    drop(container);

    let lazy = escaped.unwrap();
    assert!(matches!(lazy.get(), Err(ResolveError::ContainerDropped)));
}
