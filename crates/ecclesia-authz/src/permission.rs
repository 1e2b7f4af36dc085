//! Permission keys and sparse permission maps.
//!
//! # Purpose
//! A [`PermissionKey`] names one `(module, action)` pair. A [`PermissionMap`]
//! assigns explicit decisions to some of those pairs and is used for both a
//! role's default matrix and a user's overrides.
//!
//! # Key invariants
//! - Permission strings are `module:action`.
//! - A pair missing from a map has no decision of its own; what that means
//!   (deny, or defer to the role) is up to the resolver.
//!
//! # Examples
//! ```rust
//! use ecclesia_authz::{Action, Module, PermissionKey, PermissionMap};
//!
//! let key = PermissionKey::parse("blog:edit").expect("parse");
//! assert_eq!(key, PermissionKey::new(Module::Blog, Action::Edit));
//!
//! let map = PermissionMap::new().with(key, true);
//! assert_eq!(map.get(key), Some(true));
//! ```
use crate::{Action, AuthzError, AuthzResult, Module};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PermissionKey {
    pub module: Module,
    pub action: Action,
}

impl PermissionKey {
    pub fn new(module: Module, action: Action) -> Self {
        Self { module, action }
    }

    /// Parse a `module:action` string.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidPermission`] if the string has no colon.
    /// - [`AuthzError::InvalidModule`] / [`AuthzError::InvalidAction`] for
    ///   names outside the catalog.
    pub fn parse(value: &str) -> AuthzResult<Self> {
        value.parse()
    }

    /// Every pair in the catalog, module-major.
    pub fn catalog() -> impl Iterator<Item = PermissionKey> {
        Module::ALL.into_iter().flat_map(|module| {
            Action::ALL
                .into_iter()
                .map(move |action| PermissionKey::new(module, action))
        })
    }
}

impl From<(Module, Action)> for PermissionKey {
    fn from((module, action): (Module, Action)) -> Self {
        Self::new(module, action)
    }
}

impl std::str::FromStr for PermissionKey {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (module, action) = value
            .split_once(':')
            .ok_or_else(|| AuthzError::InvalidPermission(value.to_string()))?;
        Ok(Self::new(module.parse()?, action.parse()?))
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.module, self.action)
    }
}

/// One explicit decision, the stored shape of a map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub module: Module,
    pub action: Action,
    pub granted: bool,
}

/// Sparse `(module, action) -> bool` map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PermissionEntry>", into = "Vec<PermissionEntry>")]
pub struct PermissionMap {
    entries: BTreeMap<PermissionKey, bool>,
}

impl PermissionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map that grants every listed pair.
    pub fn granting<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PermissionKey>,
    {
        keys.into_iter().map(|key| (key.into(), true)).collect()
    }

    pub fn get(&self, key: PermissionKey) -> Option<bool> {
        self.entries.get(&key).copied()
    }

    pub fn set(&mut self, key: PermissionKey, granted: bool) {
        self.entries.insert(key, granted);
    }

    pub fn remove(&mut self, key: PermissionKey) -> Option<bool> {
        self.entries.remove(&key)
    }

    /// Copy of this map with `key` set.
    pub fn with(mut self, key: impl Into<PermissionKey>, granted: bool) -> Self {
        self.set(key.into(), granted);
        self
    }

    /// Copy of this map with `key` cleared.
    pub fn without(mut self, key: impl Into<PermissionKey>) -> Self {
        self.remove(key.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PermissionKey, bool)> + '_ {
        self.entries.iter().map(|(key, granted)| (*key, *granted))
    }

    /// Keys with an explicit `true`.
    pub fn granted(&self) -> impl Iterator<Item = PermissionKey> + '_ {
        self.iter()
            .filter_map(|(key, granted)| granted.then_some(key))
    }

    pub fn entries(&self) -> Vec<PermissionEntry> {
        self.iter()
            .map(|(key, granted)| PermissionEntry {
                module: key.module,
                action: key.action,
                granted,
            })
            .collect()
    }
}

impl FromIterator<(PermissionKey, bool)> for PermissionMap {
    fn from_iter<T: IntoIterator<Item = (PermissionKey, bool)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<PermissionEntry>> for PermissionMap {
    fn from(entries: Vec<PermissionEntry>) -> Self {
        // Later entries win, matching a last-write-wins document update.
        entries
            .into_iter()
            .map(|entry| (PermissionKey::new(entry.module, entry.action), entry.granted))
            .collect()
    }
}

impl From<PermissionMap> for Vec<PermissionEntry> {
    fn from(map: PermissionMap) -> Self {
        map.entries()
    }
}
