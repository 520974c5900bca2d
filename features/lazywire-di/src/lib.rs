//! Lazywire DI is a type-keyed dependency injection container.
//!
//! Producers are plain functions or closures. The type of their first output is the key
//! they are registered under, their arguments are the dependencies they need.
//! Nothing is built at registration time: when a consumer is resolved, the container
//! walks the dependency graph depth first, constructs what is missing and memoizes every
//! constructed value for the lifetime of the container.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use lazywire_di::{DiContainer, DynError};
//!
//! struct DatabaseUrl(String);
//! struct Database {
//!     url: Arc<DatabaseUrl>,
//! }
//!
//! let container = DiContainer::new();
//! container
//!     .provide(|| (DatabaseUrl("postgres://localhost".to_string()),))
//!     .unwrap();
//! container
//!     .provide(|url: Arc<DatabaseUrl>| Ok::<_, DynError>(Database { url }))
//!     .unwrap();
//!
//! container
//!     .resolve(|db: Arc<Database>| {
//!         assert_eq!(db.url.0, "postgres://localhost");
//!     })
//!     .unwrap();
//! ```
//!
//! Lazywire DI consists of the following components:
//!
//! 1. Container - registration, resolution and the registry lock
//! 2. Resolution - the lazy, memoized construction algorithm with cycle detection
//! 3. Factories - the declared inputs and outputs of producers and consumers
//! 4. Resolver - parameter types which can be injected (`Arc<T>`, `Option<_>`, `Lazy<T>`)
//! 5. Dependency Graph - static checks for missing and circular dependencies
//! 6. Errors - registration and resolution errors

pub mod builder;
pub mod container;
pub mod dependency_graph;
pub mod errors;
pub mod factories;
mod registry;
pub mod resolution;
pub mod resolver;
pub mod types;
mod validation;

pub use builder::DiBuilder;
pub use container::DiContainer;
pub use dependency_graph::{DependencyGraph, DependencyGraphError, DependencyGraphErrors};
pub use errors::{ProvideError, ResolveError, ShapeViolation};
pub use factories::{Consumer, Dependencies, Outputs, Producer};
pub use resolution::DiHandle;
pub use resolver::{lazy::Lazy, Resolver};
pub use types::{DependencyInfo, DynError, Failure, Injectable, Instance, TypeInfo};
