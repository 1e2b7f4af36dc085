//! Strongly typed identifiers for the principals the engine reasons about.
//!
//! # Purpose
//! Wraps role names and user ids so the two cannot be mixed up at call sites
//! and so role names compare after normalization.
//!
//! # Key invariants
//! - Role names are trimmed and lower-cased on construction; `"Admin "` and
//!   `"admin"` are the same role.
//! - User ids are preserved exactly.
//!
//! # Examples
//! ```rust
//! use ecclesia_authz::{Role, User};
//!
//! let user = User::new("u-42", "Secretary");
//! assert_eq!(user.role, Role::new("secretary"));
//! assert!(!user.role.is_admin());
//! ```
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

/// Role identifier.
///
/// Every user carries exactly one role. Built-in roles have constructors;
/// any other name is a custom role whose matrix starts empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Role(String);

impl Role {
    pub const ADMIN: &'static str = "admin";
    pub const SECRETARY: &'static str = "secretary";
    pub const PROFESSIONAL: &'static str = "professional";
    pub const LEADER: &'static str = "leader";
    pub const MEMBER: &'static str = "member";

    /// Roles seeded with a default matrix.
    pub const BUILT_IN: [&'static str; 5] = [
        Self::ADMIN,
        Self::SECRETARY,
        Self::PROFESSIONAL,
        Self::LEADER,
        Self::MEMBER,
    ];

    pub fn new(value: impl AsRef<str>) -> Self {
        Self(value.as_ref().trim().to_ascii_lowercase())
    }

    /// Construct a role, rejecting blank names.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidRole`] if the name is empty after trimming.
    pub fn parse(value: &str) -> AuthzResult<Self> {
        let role = Self::new(value);
        if role.0.is_empty() {
            return Err(AuthzError::InvalidRole(value.to_string()));
        }
        Ok(role)
    }

    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    pub fn secretary() -> Self {
        Self::new(Self::SECRETARY)
    }

    pub fn professional() -> Self {
        Self::new(Self::PROFESSIONAL)
    }

    pub fn leader() -> Self {
        Self::new(Self::LEADER)
    }

    pub fn member() -> Self {
        Self::new(Self::MEMBER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        self.0 == Self::ADMIN
    }

    pub fn is_built_in(&self) -> bool {
        Self::BUILT_IN.contains(&self.0.as_str())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// User identifier as issued by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The "current user" record handed over by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, role: impl AsRef<str>) -> Self {
        Self {
            id: UserId::new(id),
            role: Role::new(role),
        }
    }
}
