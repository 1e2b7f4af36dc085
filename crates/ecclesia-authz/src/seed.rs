//! Default permission matrices for the built-in roles.
//!
//! # Purpose
//! Provides the matrices written to the role store when a deployment is
//! seeded. Administrators edit them afterwards; nothing here is consulted at
//! resolution time.
//!
//! # Key invariants
//! - Seeds only contain grants; anything not listed is denied.
//! - Unknown roles seed to an empty matrix.
use crate::Action::{Create, Edit, Export, Manage, View};
use crate::{Action, Module, PermissionKey, PermissionMap, Role};

/// Default matrix for `role`.
///
/// # Example
/// ```rust
/// use ecclesia_authz::{Action, Module, PermissionKey, Role, default_role_matrix};
///
/// let matrix = default_role_matrix(&Role::secretary());
/// assert_eq!(matrix.get(PermissionKey::new(Module::Blog, Action::Edit)), Some(true));
/// assert!(default_role_matrix(&Role::new("visitor")).is_empty());
/// ```
pub fn default_role_matrix(role: &Role) -> PermissionMap {
    match role.as_str() {
        Role::ADMIN => PermissionMap::granting(PermissionKey::catalog()),
        Role::SECRETARY => secretary_matrix(),
        Role::LEADER => leader_matrix(),
        Role::PROFESSIONAL => professional_matrix(),
        Role::MEMBER => member_matrix(),
        _ => PermissionMap::new(),
    }
}

/// Every built-in role paired with its default matrix.
pub fn built_in_matrices() -> Vec<(Role, PermissionMap)> {
    Role::BUILT_IN
        .into_iter()
        .map(Role::new)
        .map(|role| {
            let matrix = default_role_matrix(&role);
            (role, matrix)
        })
        .collect()
}

fn grants(modules: &[Module], actions: &[Action]) -> Vec<PermissionKey> {
    modules
        .iter()
        .flat_map(|module| {
            actions
                .iter()
                .map(move |action| PermissionKey::new(*module, *action))
        })
        .collect()
}

fn secretary_matrix() -> PermissionMap {
    let mut keys = grants(
        &[
            Module::Members,
            Module::Events,
            Module::Visitors,
            Module::Assistance,
            Module::Notifications,
        ],
        &[View, Create, Edit, Export],
    );
    keys.extend(grants(
        &[
            Module::Blog,
            Module::Devotionals,
            Module::Content,
            Module::Transmissions,
        ],
        &[View, Create, Edit],
    ));
    keys.extend(grants(
        &[
            Module::Finance,
            Module::Reports,
            Module::Projects,
            Module::Leadership,
            Module::Forum,
        ],
        &[View],
    ));
    keys.push(PermissionKey::new(Module::Blog, Manage));
    PermissionMap::granting(keys)
}

fn leader_matrix() -> PermissionMap {
    let mut keys = grants(
        &[
            Module::Blog,
            Module::Transmissions,
            Module::Projects,
            Module::Notifications,
            Module::Members,
            Module::Leadership,
        ],
        &[View],
    );
    keys.extend(grants(
        &[Module::Events, Module::Forum, Module::Devotionals],
        &[View, Create, Edit],
    ));
    keys.push(PermissionKey::new(Module::Forum, Manage));
    PermissionMap::granting(keys)
}

fn professional_matrix() -> PermissionMap {
    let mut keys = grants(&[Module::Assistance], &[View, Create, Edit]);
    keys.extend(grants(
        &[
            Module::Members,
            Module::Events,
            Module::Blog,
            Module::Devotionals,
            Module::Forum,
            Module::Notifications,
        ],
        &[View],
    ));
    PermissionMap::granting(keys)
}

fn member_matrix() -> PermissionMap {
    let mut keys = grants(
        &[
            Module::Events,
            Module::Blog,
            Module::Devotionals,
            Module::Transmissions,
            Module::Forum,
            Module::Notifications,
            Module::Projects,
        ],
        &[View],
    );
    keys.push(PermissionKey::new(Module::Forum, Create));
    PermissionMap::granting(keys)
}
