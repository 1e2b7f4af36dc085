//! Effective-permission rules.
//!
//! These functions hold the whole decision logic; the runtime engine only
//! loads the two maps and calls into here.
//!
//! # Key invariants
//! - A user override wins over the role default, in both directions.
//! - A pair with neither an override nor a role entry is denied.
//! - `resolve_all` over no pairs is `true`; `resolve_any` over no pairs is
//!   `false`.
use crate::{Action, Module, PermissionKey, PermissionMap};

/// Decide one pair from a role matrix and the user's overrides.
pub fn resolve_effective(
    role_defaults: &PermissionMap,
    overrides: &PermissionMap,
    key: PermissionKey,
) -> bool {
    overrides
        .get(key)
        .or_else(|| role_defaults.get(key))
        .unwrap_or(false)
}

/// Decide a pair given as raw strings; anything outside the catalog denies.
pub fn resolve_effective_str(
    role_defaults: &PermissionMap,
    overrides: &PermissionMap,
    module: &str,
    action: &str,
) -> bool {
    match (module.parse::<Module>(), action.parse::<Action>()) {
        (Ok(module), Ok(action)) => {
            resolve_effective(role_defaults, overrides, PermissionKey::new(module, action))
        }
        _ => false,
    }
}

pub fn resolve_all(
    role_defaults: &PermissionMap,
    overrides: &PermissionMap,
    keys: &[PermissionKey],
) -> bool {
    keys.iter()
        .all(|key| resolve_effective(role_defaults, overrides, *key))
}

pub fn resolve_any(
    role_defaults: &PermissionMap,
    overrides: &PermissionMap,
    keys: &[PermissionKey],
) -> bool {
    keys.iter()
        .any(|key| resolve_effective(role_defaults, overrides, *key))
}

/// Every granted catalog pair, in catalog order.
pub fn effective_permissions(
    role_defaults: &PermissionMap,
    overrides: &PermissionMap,
) -> Vec<PermissionKey> {
    PermissionKey::catalog()
        .filter(|key| resolve_effective(role_defaults, overrides, *key))
        .collect()
}

/// `(module, Manage)` for every module, the pair list behind any-manage checks.
pub fn manage_keys() -> Vec<PermissionKey> {
    Module::ALL
        .into_iter()
        .map(|module| PermissionKey::new(module, Action::Manage))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(module: Module, action: Action) -> PermissionKey {
        PermissionKey::new(module, action)
    }

    #[test]
    fn role_default_applies_without_override() {
        let defaults = PermissionMap::granting([(Module::Blog, Action::Edit)]);
        let overrides = PermissionMap::new();
        assert!(resolve_effective(&defaults, &overrides, key(Module::Blog, Action::Edit)));
        assert!(!resolve_effective(&defaults, &overrides, key(Module::Blog, Action::Delete)));
    }

    #[test]
    fn override_wins_in_both_directions() {
        let defaults = PermissionMap::granting([(Module::Blog, Action::Edit)]);
        let overrides = PermissionMap::new()
            .with((Module::Blog, Action::Edit), false)
            .with((Module::Finance, Action::View), true);
        assert!(!resolve_effective(&defaults, &overrides, key(Module::Blog, Action::Edit)));
        assert!(resolve_effective(&defaults, &overrides, key(Module::Finance, Action::View)));
    }

    #[test]
    fn explicit_role_denial_is_still_overridable() {
        let defaults = PermissionMap::new().with((Module::Finance, Action::Edit), false);
        let overrides = PermissionMap::new().with((Module::Finance, Action::Edit), true);
        assert!(resolve_effective(&defaults, &overrides, key(Module::Finance, Action::Edit)));
    }

    #[test]
    fn unknown_strings_deny() {
        let defaults = PermissionMap::granting(PermissionKey::catalog());
        let overrides = PermissionMap::new();
        assert!(resolve_effective_str(&defaults, &overrides, "blog", "edit"));
        assert!(!resolve_effective_str(&defaults, &overrides, "payroll", "edit"));
        assert!(!resolve_effective_str(&defaults, &overrides, "blog", "publish"));
        assert!(!resolve_effective_str(&defaults, &overrides, "", ""));
    }

    #[test]
    fn all_and_any_semantics() {
        let defaults = PermissionMap::granting([
            (Module::Events, Action::View),
            (Module::Events, Action::Create),
        ]);
        let overrides = PermissionMap::new();
        let both = [key(Module::Events, Action::View), key(Module::Events, Action::Create)];
        let mixed = [key(Module::Events, Action::View), key(Module::Events, Action::Delete)];
        let none = [key(Module::Finance, Action::View)];

        assert!(resolve_all(&defaults, &overrides, &both));
        assert!(!resolve_all(&defaults, &overrides, &mixed));
        assert!(resolve_any(&defaults, &overrides, &mixed));
        assert!(!resolve_any(&defaults, &overrides, &none));
    }

    #[test]
    fn empty_pair_lists() {
        let defaults = PermissionMap::new();
        let overrides = PermissionMap::new();
        assert!(resolve_all(&defaults, &overrides, &[]));
        assert!(!resolve_any(&defaults, &overrides, &[]));
    }

    #[test]
    fn effective_permissions_apply_overrides() {
        let defaults = PermissionMap::granting([
            (Module::Users, Action::View),
            (Module::Blog, Action::Edit),
        ]);
        let overrides = PermissionMap::new()
            .with((Module::Blog, Action::Edit), false)
            .with((Module::Reports, Action::Export), true);
        assert_eq!(
            effective_permissions(&defaults, &overrides),
            vec![
                key(Module::Users, Action::View),
                key(Module::Reports, Action::Export)
            ]
        );
    }

    #[test]
    fn manage_keys_cover_every_module() {
        let keys = manage_keys();
        assert_eq!(keys.len(), Module::ALL.len());
        assert!(keys.iter().all(|key| key.action == Action::Manage));
    }
}
