//! In-memory implementation of the permission store.
//!
//! # Purpose
//! Keeps role matrices and user overrides in `HashMap`s guarded by
//! `tokio::sync::RwLock`. It exists for:
//! - tests and local development (no external dependencies)
//! - seeding a fresh deployment before a durable backend takes over
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Each save swaps a whole map under the write lock, so readers never see
//!   a half-written matrix.
//! - Across processes there is no coordination; last write wins.
use super::{PermissionStore, RolePermissionStore, StoreResult, UserOverrideStore};
use async_trait::async_trait;
use ecclesia_authz::{PermissionMap, Role, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryPermissionStore {
    /// Role matrices keyed by normalized role name.
    role_defaults: Arc<RwLock<HashMap<Role, PermissionMap>>>,
    /// Sparse overrides keyed by user id. Users without overrides have no entry.
    overrides: Arc<RwLock<HashMap<UserId, PermissionMap>>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with role matrices.
    pub fn with_roles(roles: impl IntoIterator<Item = (Role, PermissionMap)>) -> Self {
        Self {
            role_defaults: Arc::new(RwLock::new(roles.into_iter().collect())),
            overrides: Arc::default(),
        }
    }
}

#[async_trait]
impl RolePermissionStore for InMemoryPermissionStore {
    async fn get_role_defaults(&self, role: &Role) -> StoreResult<PermissionMap> {
        Ok(self
            .role_defaults
            .read()
            .await
            .get(role)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_role_defaults(&self, role: &Role, entries: PermissionMap) -> StoreResult<()> {
        self.role_defaults
            .write()
            .await
            .insert(role.clone(), entries);
        Ok(())
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.role_defaults.read().await.keys().cloned().collect();
        roles.sort();
        Ok(roles)
    }
}

#[async_trait]
impl UserOverrideStore for InMemoryPermissionStore {
    async fn get_overrides(&self, user_id: &UserId) -> StoreResult<PermissionMap> {
        Ok(self
            .overrides
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_overrides(&self, user_id: &UserId, entries: PermissionMap) -> StoreResult<()> {
        let mut overrides = self.overrides.write().await;
        if entries.is_empty() {
            overrides.remove(user_id);
        } else {
            overrides.insert(user_id.clone(), entries);
        }
        Ok(())
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
