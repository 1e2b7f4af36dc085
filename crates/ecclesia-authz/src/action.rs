use crate::AuthzError;
use serde::{Deserialize, Serialize};

/// Operation class within a module.
///
/// `Manage` is not expanded into the other actions here; callers that want
/// "manage implies edit" must check `Manage` themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Manage,
    Export,
    Approve,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::View,
        Action::Create,
        Action::Edit,
        Action::Delete,
        Action::Manage,
        Action::Export,
        Action::Approve,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Manage => "manage",
            Action::Export => "export",
            Action::Approve => "approve",
        }
    }

    /// Label shown in the permission editors.
    pub fn label(self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Create => "Create",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
            Action::Manage => "Manage",
            Action::Export => "Export",
            Action::Approve => "Approve",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = AuthzError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Action::View),
            "create" => Ok(Action::Create),
            "edit" => Ok(Action::Edit),
            "delete" => Ok(Action::Delete),
            "manage" => Ok(Action::Manage),
            "export" => Ok(Action::Export),
            "approve" => Ok(Action::Approve),
            _ => Err(AuthzError::InvalidAction(value.to_string())),
        }
    }
}
