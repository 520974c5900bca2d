use tracing_subscriber::EnvFilter;

/// Surfaces container logs in test output, e.g. `RUST_LOG=lazywire_di=trace,lazywire_config=debug`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
