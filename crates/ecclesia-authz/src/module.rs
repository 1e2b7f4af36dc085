//! Functional areas of the application that are subject to access control.
//!
//! # Key invariants
//! - The set is closed; new areas are added here and nowhere else.
//! - `Module::ALL` is in catalog order, which is also the order used by
//!   permission editors and by the any-manage check.
use crate::AuthzError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Users,
    Members,
    Events,
    Blog,
    Finance,
    Assistance,
    Leadership,
    Transmissions,
    Projects,
    Devotionals,
    Forum,
    Visitors,
    Notifications,
    Settings,
    Ong,
    Content,
    HomePage,
    Reports,
}

impl Module {
    pub const ALL: [Module; 18] = [
        Module::Users,
        Module::Members,
        Module::Events,
        Module::Blog,
        Module::Finance,
        Module::Assistance,
        Module::Leadership,
        Module::Transmissions,
        Module::Projects,
        Module::Devotionals,
        Module::Forum,
        Module::Visitors,
        Module::Notifications,
        Module::Settings,
        Module::Ong,
        Module::Content,
        Module::HomePage,
        Module::Reports,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Module::Users => "users",
            Module::Members => "members",
            Module::Events => "events",
            Module::Blog => "blog",
            Module::Finance => "finance",
            Module::Assistance => "assistance",
            Module::Leadership => "leadership",
            Module::Transmissions => "transmissions",
            Module::Projects => "projects",
            Module::Devotionals => "devotionals",
            Module::Forum => "forum",
            Module::Visitors => "visitors",
            Module::Notifications => "notifications",
            Module::Settings => "settings",
            Module::Ong => "ong",
            Module::Content => "content",
            Module::HomePage => "home_page",
            Module::Reports => "reports",
        }
    }

    /// Label shown in the permission editors.
    pub fn label(self) -> &'static str {
        match self {
            Module::Users => "Users",
            Module::Members => "Members",
            Module::Events => "Events",
            Module::Blog => "Blog",
            Module::Finance => "Finance",
            Module::Assistance => "Assistance",
            Module::Leadership => "Leadership",
            Module::Transmissions => "Transmissions",
            Module::Projects => "Projects",
            Module::Devotionals => "Devotionals",
            Module::Forum => "Forum",
            Module::Visitors => "Visitors",
            Module::Notifications => "Notifications",
            Module::Settings => "Settings",
            Module::Ong => "ONG",
            Module::Content => "Content",
            Module::HomePage => "Home page",
            Module::Reports => "Reports",
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Module {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Module::ALL
            .into_iter()
            .find(|module| module.as_str() == normalized)
            .ok_or_else(|| AuthzError::InvalidModule(value.to_string()))
    }
}
