//! Persistence seams for role matrices and user overrides.
//!
//! # Purpose
//! The engine never talks to a database directly. Hosted-document backends
//! implement these traits; [`memory::InMemoryPermissionStore`] is the
//! built-in backend used for tests, local development and seeding.
//!
//! # Contract
//! - Reads of an unknown role or user return an empty map, never an error.
//! - Saves are full replacements and must be atomic for readers: a
//!   concurrent read sees either the old set or the new one.
//! - A save that returns `Ok` is durable for the backend's definition of
//!   durable; the engine invalidates its cache only after that.
use async_trait::async_trait;
use ecclesia_authz::{PermissionMap, Role, UserId};
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait RolePermissionStore: Send + Sync {
    async fn get_role_defaults(&self, role: &Role) -> StoreResult<PermissionMap>;
    async fn save_role_defaults(&self, role: &Role, entries: PermissionMap) -> StoreResult<()>;
    async fn list_roles(&self) -> StoreResult<Vec<Role>>;
}

#[async_trait]
pub trait UserOverrideStore: Send + Sync {
    async fn get_overrides(&self, user_id: &UserId) -> StoreResult<PermissionMap>;
    async fn save_overrides(&self, user_id: &UserId, entries: PermissionMap) -> StoreResult<()>;
}

/// Everything the engine needs from one backend.
#[async_trait]
pub trait PermissionStore: RolePermissionStore + UserOverrideStore {
    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
