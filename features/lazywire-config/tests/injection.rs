mod common;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use lazywire_config::{Config, ConfigProvider};
use lazywire_di::{DiBuilder, DiContainer, ResolveError, TypeInfo};

#[derive(Debug, Clone, PartialEq)]
struct DatabaseConfig {
    url: String,
    pool_size: usize,
}
#[derive(Debug, Clone, PartialEq)]
struct FeatureFlags {
    tracing: bool,
}

struct Database {
    url: String,
    pool_size: usize,
}

fn configs(flags: Option<FeatureFlags>) -> ConfigProvider {
    let mut provider = ConfigProvider::new();
    provider
        .add_config(DatabaseConfig {
            url: "postgres://localhost/app".to_string(),
            pool_size: 4,
        })
        .unwrap()
        .maybe_add_config(flags)
        .unwrap();
    provider
}

#[test]
fn producer_receives_config() {
    common::init_tracing();
    let container = DiBuilder::new()
        .add_instance(configs(None))
        .unwrap()
        .provide(|config: Config<DatabaseConfig>| {
            (Database {
                url: config.url.clone(),
                pool_size: config.pool_size,
            },)
        })
        .unwrap()
        .build()
        .unwrap();

    let db = container.require::<Database>().unwrap();
    assert_eq!(db.url, "postgres://localhost/app");
    assert_eq!(db.pool_size, 4);
}

#[test]
fn configs_are_shared_not_copied() {
    let container = DiContainer::new();
    container.provide_instance(configs(None)).unwrap();

    let provider = container.require::<ConfigProvider>().unwrap();
    let registered = provider.get_config::<DatabaseConfig>().unwrap();
    container
        .resolve(|config: Config<DatabaseConfig>| {
            assert!(Arc::ptr_eq(&config.inner(), &registered));
        })
        .unwrap();
}

#[test]
fn missing_config_fails_producer_resolution() {
    let calls = Arc::new(AtomicUsize::new(0));
    let container = DiContainer::new();
    container.provide_instance(configs(None)).unwrap();
    let producer_calls = calls.clone();
    container
        .provide(move |flags: Config<FeatureFlags>| {
            producer_calls.fetch_add(1, Ordering::SeqCst);
            (flags.tracing,)
        })
        .unwrap();

    let err = container.require::<bool>().unwrap_err();
    let ResolveError::ValueMissing { value, chain } = &err else {
        panic!("expected missing config, got {err:?}");
    };
    assert_eq!(*value, TypeInfo::of::<FeatureFlags>());
    assert_eq!(chain, &vec![TypeInfo::of::<bool>()]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Optional injection of the product does not hide the missing config
    let err = container
        .resolve(|_: Option<Arc<bool>>| {})
        .unwrap_err();
    assert!(matches!(err, ResolveError::ValueMissing { .. }));
}

#[test]
fn optional_config_entry_absent() {
    let container = DiContainer::new();
    container.provide_instance(configs(None)).unwrap();

    let mut consumed = false;
    container
        .resolve(|flags: Option<Config<FeatureFlags>>, db: Config<DatabaseConfig>| {
            assert!(flags.is_none());
            assert_eq!(db.pool_size, 4);
            consumed = true;
        })
        .unwrap();
    assert!(consumed);
}

#[test]
fn optional_config_entry_present() {
    let container = DiContainer::new();
    container
        .provide_instance(configs(Some(FeatureFlags { tracing: true })))
        .unwrap();

    container
        .resolve(|flags: Option<Config<FeatureFlags>>| {
            assert_eq!(flags.map(|f| f.tracing), Some(true));
        })
        .unwrap();
}

#[test]
fn graph_requires_the_provider() {
    let errors = DiBuilder::new()
        .provide(|config: Config<DatabaseConfig>| (config.pool_size,))
        .unwrap()
        .build()
        .unwrap_err();

    assert_eq!(errors.errors.len(), 1);
    assert!(errors.to_string().contains("ConfigProvider"));
}
