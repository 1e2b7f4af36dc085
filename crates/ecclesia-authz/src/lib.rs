//! Ecclesia permission primitives shared by the access engine and its callers.
//!
//! # Purpose
//! Defines the permission catalog (modules and actions), principal
//! identifiers, sparse permission maps, the effective-permission rules and the
//! default matrices used to seed built-in roles.
//!
//! # How it fits
//! `ecclesia-access` loads role matrices and user overrides from storage,
//! caches them, and calls the pure resolver functions in this crate. Route
//! guards describe what they need with [`AccessRequirement`].
//!
//! # Key invariants
//! - Deny-by-default: a pair without an explicit grant resolves to `false`.
//! - A user override beats the role default whether it grants or revokes.
//! - Permission strings follow the `module:action` pattern.
//!
//! # Examples
//! ```rust
//! use ecclesia_authz::{Action, Module, PermissionMap, resolve_effective};
//!
//! let defaults = PermissionMap::granting([(Module::Blog, Action::Edit)]);
//! let overrides = PermissionMap::new().with((Module::Blog, Action::Edit), false);
//! assert!(!resolve_effective(&defaults, &overrides, (Module::Blog, Action::Edit).into()));
//! ```
//!
//! # Common pitfalls
//! - `Manage` does not imply the other actions here. Check `Manage`
//!   explicitly where a screen treats it as a superset.

mod action;
mod errors;
mod module;
mod permission;
mod requirement;
mod resolver;
mod seed;
mod types;

pub use action::Action;
pub use errors::{AuthzError, AuthzResult};
pub use module::Module;
pub use permission::{PermissionEntry, PermissionKey, PermissionMap};
pub use requirement::AccessRequirement;
pub use resolver::{
    effective_permissions, manage_keys, resolve_all, resolve_any, resolve_effective,
    resolve_effective_str,
};
pub use seed::{built_in_matrices, default_role_matrix};
pub use types::{Role, User, UserId};
