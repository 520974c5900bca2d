use std::{fmt::Debug, ops::Deref, sync::Arc};

use lazywire_di::{DependencyInfo, DiHandle, ResolveError, Resolver, TypeInfo};

use crate::provider::ConfigProvider;

/// A wrapper type to allow for config injections
///
/// Resolves `T` from the [`ConfigProvider`] registered in the container, so configs
/// can be declared as producer or consumer parameters. A config which was never added
/// fails with [`ResolveError::ValueMissing`], or resolves to `None` as `Option<Config<T>>`.
///
/// # Example
/// ```rust
/// use std::sync::Arc;
/// use lazywire_config::{config::Config, provider::ConfigProvider};
/// use lazywire_di::DiContainer;
///
/// struct HttpConfig {
///     port: u16,
/// }
/// struct Server {
///     port: u16,
/// }
///
/// let mut configs = ConfigProvider::new();
/// configs.add_config(HttpConfig { port: 8080 }).unwrap();
///
/// let container = DiContainer::new();
/// container.provide_instance(configs).unwrap();
/// container
///     .provide(|config: Config<HttpConfig>| (Server { port: config.port },))
///     .unwrap();
///
/// container.resolve(|server: Arc<Server>| assert_eq!(server.port, 8080)).unwrap();
/// ```
pub struct Config<T> {
    inner: Arc<T>,
}
impl<T> Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Config {
            inner: self.inner.clone(),
        }
    }
}
impl<T: Debug> Debug for Config<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Config").field(&self.inner).finish()
    }
}
impl<T> Config<T> {
    pub fn inner(&self) -> Arc<T> {
        self.inner.clone()
    }

    pub fn into_inner(self) -> Arc<T> {
        self.inner
    }
}

impl<T: Send + Sync + 'static> Resolver for Config<T> {
    fn resolve(handle: &mut DiHandle<'_>) -> Result<Self, ResolveError>
    where
        Self: Sized,
    {
        let config_provider = handle.resolve::<Arc<ConfigProvider>>()?;

        let inner = config_provider.get_config::<T>().map_err(|e| {
            tracing::debug!("Config injection failed: {}", e);
            ResolveError::ValueMissing {
                value: TypeInfo::of::<T>(),
                chain: handle.chain().to_vec(),
            }
        })?;

        Ok(Config { inner })
    }

    // The graph sees the provider, individual entries are only known at resolution time
    fn dependency_info() -> DependencyInfo {
        DependencyInfo::required::<ConfigProvider>()
    }
}
