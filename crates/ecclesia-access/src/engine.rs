//! Permission engine: cached resolution plus the administrative save paths.
//!
//! # Purpose
//! Answers "may this user do this action in this module" by loading the
//! user's role matrix and overrides through [`PermissionCache`] and applying
//! the rules from `ecclesia_authz`.
//!
//! # Failure model
//! - Boolean entry points (`resolve*`) fail closed: a store error is logged
//!   and the answer is `false`.
//! - `try_*` entry points return the error instead.
//! - Saves surface store errors to the caller and only invalidate the cache
//!   once the store accepted the write.
use crate::cache::PermissionCache;
use crate::config::AccessConfig;
use crate::errors::AccessResult;
use crate::store::PermissionStore;
use ecclesia_authz::{
    Action, Module, PermissionKey, PermissionMap, Role, User, UserId, built_in_matrices,
    default_role_matrix,
};
use std::sync::Arc;

/// Role matrix and overrides for one user, loaded together.
#[derive(Debug, Clone)]
pub struct UserPermissions {
    pub role_defaults: Arc<PermissionMap>,
    pub overrides: Arc<PermissionMap>,
}

impl UserPermissions {
    pub fn resolve(&self, key: PermissionKey) -> bool {
        ecclesia_authz::resolve_effective(&self.role_defaults, &self.overrides, key)
    }

    pub fn resolve_all(&self, keys: &[PermissionKey]) -> bool {
        ecclesia_authz::resolve_all(&self.role_defaults, &self.overrides, keys)
    }

    pub fn resolve_any(&self, keys: &[PermissionKey]) -> bool {
        ecclesia_authz::resolve_any(&self.role_defaults, &self.overrides, keys)
    }

    pub fn effective_permissions(&self) -> Vec<PermissionKey> {
        ecclesia_authz::effective_permissions(&self.role_defaults, &self.overrides)
    }
}

#[derive(Clone)]
pub struct PermissionEngine {
    store: Arc<dyn PermissionStore>,
    cache: Arc<PermissionCache>,
}

impl PermissionEngine {
    pub fn new(store: Arc<dyn PermissionStore>, cache: Arc<PermissionCache>) -> Self {
        Self { store, cache }
    }

    /// Wire an engine from configuration, seeding built-in roles if asked.
    pub async fn from_config(
        store: Arc<dyn PermissionStore>,
        config: &AccessConfig,
    ) -> AccessResult<Self> {
        let cache = Arc::new(PermissionCache::with_enabled(config.cache_enabled));
        let engine = Self::new(store, cache);
        tracing::info!(
            backend = engine.store.backend_name(),
            durable = engine.store.is_durable(),
            cache_enabled = config.cache_enabled,
            "permission engine ready"
        );
        if config.seed_default_roles {
            engine.seed_default_roles(false).await?;
        }
        Ok(engine)
    }

    pub fn cache(&self) -> &PermissionCache {
        &self.cache
    }

    /// Load (or reuse) everything needed to decide for `user`.
    pub async fn load(&self, user: &User) -> AccessResult<UserPermissions> {
        let role_defaults = self
            .cache
            .role_defaults(&user.role, || self.store.get_role_defaults(&user.role))
            .await
            .inspect_err(|_| store_error("get_role_defaults"))?;
        let overrides = self
            .cache
            .user_overrides(&user.id, || self.store.get_overrides(&user.id))
            .await
            .inspect_err(|_| store_error("get_overrides"))?;
        Ok(UserPermissions {
            role_defaults,
            overrides,
        })
    }

    pub async fn try_resolve(&self, user: &User, module: Module, action: Action) -> AccessResult<bool> {
        let granted = self.load(user).await?.resolve(PermissionKey::new(module, action));
        tracing::debug!(
            user_id = %user.id,
            role = %user.role,
            %module,
            %action,
            granted,
            "permission resolved"
        );
        Ok(granted)
    }

    pub async fn resolve(&self, user: &User, module: Module, action: Action) -> bool {
        let result = self.try_resolve(user, module, action).await;
        fail_closed(user, result)
    }

    /// Resolve a pair given as raw strings. Names outside the catalog deny
    /// without touching the store.
    pub async fn resolve_str(&self, user: &User, module: &str, action: &str) -> bool {
        let key = match (module.parse::<Module>(), action.parse::<Action>()) {
            (Ok(module), Ok(action)) => PermissionKey::new(module, action),
            (Err(err), _) | (_, Err(err)) => {
                tracing::debug!(user_id = %user.id, error = %err, "unknown permission denied");
                return false;
            }
        };
        self.resolve(user, key.module, key.action).await
    }

    /// True only if every pair resolves true; an empty list is `true`.
    pub async fn resolve_all(&self, user: &User, keys: &[PermissionKey]) -> bool {
        if keys.is_empty() {
            return true;
        }
        let result = self.load(user).await.map(|perms| perms.resolve_all(keys));
        fail_closed(user, result)
    }

    /// True if at least one pair resolves true; an empty list is `false`.
    pub async fn resolve_any(&self, user: &User, keys: &[PermissionKey]) -> bool {
        if keys.is_empty() {
            return false;
        }
        let result = self.load(user).await.map(|perms| perms.resolve_any(keys));
        fail_closed(user, result)
    }

    /// Every catalog pair granted to `user`, in catalog order.
    pub async fn effective_permissions(&self, user: &User) -> AccessResult<Vec<PermissionKey>> {
        Ok(self.load(user).await?.effective_permissions())
    }

    pub async fn get_role_defaults(&self, role: &Role) -> AccessResult<Arc<PermissionMap>> {
        Ok(self
            .cache
            .role_defaults(role, || self.store.get_role_defaults(role))
            .await
            .inspect_err(|_| store_error("get_role_defaults"))?)
    }

    pub async fn get_overrides(&self, user_id: &UserId) -> AccessResult<Arc<PermissionMap>> {
        Ok(self
            .cache
            .user_overrides(user_id, || self.store.get_overrides(user_id))
            .await
            .inspect_err(|_| store_error("get_overrides"))?)
    }

    /// Replace a role's matrix. The role's cache entry is dropped before
    /// this returns, so the next resolution sees `entries`.
    pub async fn save_role_defaults(&self, role: &Role, entries: PermissionMap) -> AccessResult<()> {
        let granted = entries.granted().count();
        self.store
            .save_role_defaults(role, entries)
            .await
            .inspect_err(|_| store_error("save_role_defaults"))?;
        self.cache.invalidate_role(role);
        metrics::counter!("ecclesia_permission_saves_total", "kind" => "role").increment(1);
        tracing::info!(%role, granted, "role permissions saved");
        Ok(())
    }

    /// Replace a user's complete override set; an empty map removes all of
    /// them. Only this user's cache entry is dropped.
    pub async fn save_overrides(&self, user_id: &UserId, entries: PermissionMap) -> AccessResult<()> {
        let count = entries.len();
        self.store
            .save_overrides(user_id, entries)
            .await
            .inspect_err(|_| store_error("save_overrides"))?;
        self.cache.invalidate_user(user_id);
        metrics::counter!("ecclesia_permission_saves_total", "kind" => "user").increment(1);
        tracing::info!(%user_id, overrides = count, "user permission overrides saved");
        Ok(())
    }

    /// Write default matrices for the built-in roles. Roles that already
    /// have a stored matrix are left alone unless `overwrite` is set.
    /// Returns the roles that were written. Roles written before a failed
    /// save are already visible when the error is returned.
    pub async fn seed_default_roles(&self, overwrite: bool) -> AccessResult<Vec<Role>> {
        let existing = self
            .store
            .list_roles()
            .await
            .inspect_err(|_| store_error("list_roles"))?;
        let mut seeded = Vec::new();
        for (role, matrix) in built_in_matrices() {
            if !overwrite && existing.contains(&role) {
                continue;
            }
            self.store
                .save_role_defaults(&role, matrix)
                .await
                .inspect_err(|_| store_error("save_role_defaults"))?;
            self.cache.invalidate_role(&role);
            seeded.push(role);
        }
        self.cache.invalidate_all();
        tracing::info!(seeded = seeded.len(), overwrite, "built-in roles seeded");
        Ok(seeded)
    }

    /// Restore one role to its seeded matrix. Custom roles reset to empty.
    pub async fn reset_role(&self, role: &Role) -> AccessResult<()> {
        self.save_role_defaults(role, default_role_matrix(role)).await
    }

    pub fn invalidate_role(&self, role: &Role) {
        self.cache.invalidate_role(role);
    }

    pub fn invalidate_user(&self, user_id: &UserId) {
        self.cache.invalidate_user(user_id);
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub async fn health_check(&self) -> AccessResult<()> {
        Ok(self.store.health_check().await?)
    }
}

fn store_error(op: &'static str) {
    metrics::counter!("ecclesia_permission_store_errors_total", "op" => op).increment(1);
}

fn fail_closed(user: &User, result: AccessResult<bool>) -> bool {
    match result {
        Ok(granted) => granted,
        Err(err) => {
            tracing::warn!(
                user_id = %user.id,
                role = %user.role,
                error = %err,
                "permission check failed, denying"
            );
            false
        }
    }
}
