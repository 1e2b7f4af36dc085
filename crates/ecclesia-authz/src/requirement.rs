use crate::{Action, Module, PermissionKey};
use serde::{Deserialize, Serialize};

/// What a protected view needs before it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessRequirement {
    /// A single `(module, action)` pair.
    Permission(PermissionKey),
    /// Every listed pair. An empty list is satisfied.
    All { keys: Vec<PermissionKey> },
    /// At least one listed pair. An empty list is never satisfied.
    Any { keys: Vec<PermissionKey> },
    /// `Manage` on at least one module.
    AnyManage,
    /// Admins pass unconditionally; everyone else needs the pair.
    AdminBypass(PermissionKey),
}

impl AccessRequirement {
    pub fn permission(module: Module, action: Action) -> Self {
        Self::Permission(PermissionKey::new(module, action))
    }

    pub fn all<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PermissionKey>,
    {
        Self::All {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn any<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PermissionKey>,
    {
        Self::Any {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn admin_bypass(module: Module, action: Action) -> Self {
        Self::AdminBypass(PermissionKey::new(module, action))
    }
}

impl From<PermissionKey> for AccessRequirement {
    fn from(key: PermissionKey) -> Self {
        Self::Permission(key)
    }
}
