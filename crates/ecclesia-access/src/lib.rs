//! Ecclesia access engine.
//!
//! # Purpose
//! Resolves role/permission decisions for the rest of the application:
//! storage seams for role matrices and user overrides, a read-through cache
//! with explicit invalidation, the engine that combines them, and the guard
//! consumed by route guards and conditional rendering.
//!
//! # Notes
//! Module boundaries mirror the data flow: guard → engine → cache → store.
pub mod cache;
pub mod config;
pub mod engine;
pub mod errors;
pub mod guard;
pub mod observability;
pub mod store;

pub use cache::PermissionCache;
pub use config::AccessConfig;
pub use engine::{PermissionEngine, UserPermissions};
pub use errors::{AccessError, AccessResult};
pub use guard::AccessGuard;
pub use store::{
    PermissionStore, RolePermissionStore, StoreError, StoreResult, UserOverrideStore,
    memory::InMemoryPermissionStore,
};
