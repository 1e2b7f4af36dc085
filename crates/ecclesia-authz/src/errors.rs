use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthzError {
    #[error("invalid module: {0}")]
    InvalidModule(String),
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid permission: {0}")]
    InvalidPermission(String),
    #[error("invalid role: {0:?}")]
    InvalidRole(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
