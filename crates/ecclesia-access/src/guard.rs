//! Access guard used by route guards and conditional rendering.
//!
//! # Purpose
//! Turns an [`AccessRequirement`] into a yes/no answer for the current user.
//! It never errors and never writes; a failed lookup is a denial.
use crate::config::AccessConfig;
use crate::engine::PermissionEngine;
use ecclesia_authz::{AccessRequirement, Role, User, manage_keys};

#[derive(Clone)]
pub struct AccessGuard {
    engine: PermissionEngine,
    admin_role: Role,
}

impl AccessGuard {
    pub fn new(engine: PermissionEngine) -> Self {
        Self {
            engine,
            admin_role: Role::admin(),
        }
    }

    pub fn from_config(engine: PermissionEngine, config: &AccessConfig) -> Self {
        Self::new(engine).with_admin_role(config.admin_role.clone())
    }

    /// Use a different role name for the admin bypass.
    pub fn with_admin_role(mut self, role: Role) -> Self {
        self.admin_role = role;
        self
    }

    pub fn admin_role(&self) -> &Role {
        &self.admin_role
    }

    pub fn engine(&self) -> &PermissionEngine {
        &self.engine
    }

    pub async fn can_access(&self, user: &User, requirement: &AccessRequirement) -> bool {
        let granted = match requirement {
            AccessRequirement::Permission(key) => {
                self.engine.resolve(user, key.module, key.action).await
            }
            AccessRequirement::All { keys } => self.engine.resolve_all(user, keys).await,
            AccessRequirement::Any { keys } => self.engine.resolve_any(user, keys).await,
            AccessRequirement::AnyManage => self.engine.resolve_any(user, &manage_keys()).await,
            AccessRequirement::AdminBypass(key) => {
                if user.role == self.admin_role {
                    tracing::debug!(user_id = %user.id, "admin bypass");
                    return true;
                }
                self.engine.resolve(user, key.module, key.action).await
            }
        };
        if !granted {
            tracing::debug!(user_id = %user.id, role = %user.role, ?requirement, "access denied");
        }
        granted
    }
}
