use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use lazywire_di::TypeInfo;

use crate::errors::ConfigError;

/// A registry holding at most one config value per type.
///
/// Register it into a container with `provide_instance` to make its entries
/// injectable as [`Config<T>`](crate::config::Config).
#[derive(Default)]
pub struct ConfigProvider {
    configs: HashMap<TypeId, (TypeInfo, Arc<dyn Any + Send + Sync + 'static>)>,
}
impl Debug for ConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set()
            .entries(self.configs.values().map(|(info, _)| info.type_name))
            .finish()
    }
}

impl ConfigProvider {
    /// Creates an empty provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves the config of type `T`.
    ///
    /// Fails with [`ConfigError::Missing`] if no such config was added.
    pub fn get_config<T: Send + Sync + 'static>(&self) -> Result<Arc<T>, ConfigError> {
        let info = TypeInfo::of::<T>();

        self.configs
            .get(&info.type_id)
            .and_then(|(_, entry)| entry.clone().downcast().ok())
            .ok_or(ConfigError::Missing(info))
    }

    /// Adds a config to the registry.
    ///
    /// Fails with [`ConfigError::AlreadyRegistered`] if a config of the same type exists,
    /// the existing config is kept.
    pub fn add_config<T: Send + Sync + 'static>(
        &mut self,
        config: T,
    ) -> Result<&mut Self, ConfigError> {
        let info = TypeInfo::of::<T>();

        if self.configs.contains_key(&info.type_id) {
            return Err(ConfigError::AlreadyRegistered(info));
        }

        self.configs.insert(info.type_id, (info, Arc::new(config)));
        tracing::debug!("Added config {}", info.type_name);
        Ok(self)
    }

    /// Adds the config if there is one.
    ///
    /// `None` leaves the registry untouched and returns `Ok(self)` for chaining.
    pub fn maybe_add_config<T: Send + Sync + 'static>(
        &mut self,
        config: Option<T>,
    ) -> Result<&mut Self, ConfigError> {
        match config {
            Some(c) => self.add_config(c),
            None => Ok(self),
        }
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.configs.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
