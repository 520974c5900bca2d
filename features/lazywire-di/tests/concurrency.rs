mod common;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Barrier,
    },
    thread,
    time::Duration,
};

use lazywire_di::{DiContainer, ProvideError, ResolveError};

#[derive(Debug)]
struct Expensive(usize);

#[test]
fn concurrent_resolutions_construct_once() {
    common::init_tracing();
    const THREADS: usize = 8;

    let calls = Arc::new(AtomicUsize::new(0));
    let container = DiContainer::new();
    let producer_calls = calls.clone();
    container
        .provide(move || {
            let call = producer_calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            (Expensive(call),)
        })
        .unwrap();

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container.require::<Expensive>().unwrap()
            })
        })
        .collect();

    let instances: Vec<Arc<Expensive>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(instances.iter().all(|i| Arc::ptr_eq(i, &instances[0])));
    assert_eq!(instances[0].0, 0);
}

#[test]
fn consumer_may_use_the_container_again() {
    let container = DiContainer::new();
    container.provide(|| (Expensive(1),)).unwrap();

    let inner = container.clone();
    container
        .resolve(move |outer: Arc<Expensive>| {
            let again = inner.require::<Expensive>().unwrap();
            assert!(Arc::ptr_eq(&outer, &again));
            inner.provide(|| (42u8,)).unwrap();
        })
        .unwrap();

    assert_eq!(*container.require::<u8>().unwrap(), 42);
}

#[test]
fn producer_reentering_its_container_is_reported() {
    #[derive(Debug)]
    struct Outer;

    let container = DiContainer::new();
    container.provide(|| (Expensive(1),)).unwrap();
    let inner = container.clone();
    container
        .provide(move || {
            inner.require::<Expensive>()?;
            Ok::<_, ResolveError>(Outer)
        })
        .unwrap();

    let err = container.require::<Outer>().unwrap_err();
    let reported = err
        .failure()
        .and_then(|failure| failure.downcast_ref::<ResolveError>());
    assert!(matches!(reported, Some(ResolveError::Reentrant)));

    // The container is still usable afterwards
    assert_eq!(container.require::<Expensive>().unwrap().0, 1);
}

#[test]
fn producer_registering_into_its_container_is_reported() {
    #[derive(Debug)]
    struct Registrar;

    let container = DiContainer::new();
    let inner = container.clone();
    container
        .provide(move || {
            inner.provide(|| (7u16,))?;
            Ok::<_, ProvideError>(Registrar)
        })
        .unwrap();

    let err = container.require::<Registrar>().unwrap_err();
    let reported = err
        .failure()
        .and_then(|failure| failure.downcast_ref::<ProvideError>());
    assert!(matches!(reported, Some(ProvideError::Reentrant)));
    assert!(!container.contains::<u16>().unwrap());
}

#[test]
fn panicking_producer_leaves_container_usable() {
    let should_panic = Arc::new(AtomicBool::new(true));
    let container = DiContainer::new();
    let panic_flag = should_panic.clone();
    container
        .provide(move || {
            if panic_flag.swap(false, Ordering::SeqCst) {
                panic!("producer exploded");
            }
            (Expensive(2),)
        })
        .unwrap();

    let panicking = container.clone();
    let joined = thread::spawn(move || panicking.require::<Expensive>()).join();
    assert!(joined.is_err());

    // The interrupted binding is retried rather than reported as a cycle
    assert_eq!(container.require::<Expensive>().unwrap().0, 2);
}

#[test]
fn separate_containers_do_not_share_state() {
    let first = DiContainer::new();
    let second = DiContainer::new();
    first.provide(|| (Expensive(1),)).unwrap();
    second.provide(|| (Expensive(2),)).unwrap();

    // Resolving one container from inside a consumer of another is not re-entrant
    let other = second.clone();
    first
        .resolve(move |one: Arc<Expensive>| {
            assert_eq!(one.0, 1);
            assert_eq!(other.require::<Expensive>().unwrap().0, 2);
        })
        .unwrap();
}
