//! Lazywire Config provides a registry of typed configs that can be injected through
//! a lazywire-di container.
//!
//! Lazywire Config is split into two major parts:
//! 1. ConfigProvider: Used to create the registry of all configs
//! 2. Config<T>: A wrapper type to be able to resolve and retrieve configs
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use lazywire_config::{config::Config, provider::ConfigProvider};
//! use lazywire_di::DiContainer;
//!
//! struct AppConfig {
//!     host: String,
//!     port: u16,
//! }
//! struct Listener {
//!     address: String,
//! }
//!
//! let mut configs = ConfigProvider::default();
//! configs
//!     .add_config(AppConfig {
//!         host: "localhost".to_string(),
//!         port: 8080,
//!     })
//!     .unwrap();
//!
//! let container = DiContainer::new();
//! container.provide_instance(configs).unwrap();
//! container
//!     .provide(|app: Config<AppConfig>| {
//!         (Listener {
//!             address: format!("{}:{}", app.host, app.port),
//!         },)
//!     })
//!     .unwrap();
//!
//! container
//!     .resolve(|listener: Arc<Listener>| assert_eq!(listener.address, "localhost:8080"))
//!     .unwrap();
//! ```
//!
//! Lazywire Config consists of the following components:
//!
//! 1. Config - for injecting a registered config
//! 2. Provider - for creating a registry of configs, adding and retrieving configs
//! 3. Errors - for config errors

pub mod config;
pub mod errors;
pub mod provider;

pub use config::Config;
pub use errors::ConfigError;
pub use provider::ConfigProvider;
