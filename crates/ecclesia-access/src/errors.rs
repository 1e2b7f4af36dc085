use crate::store::StoreError;
use ecclesia_authz::AuthzError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Authz(#[from] AuthzError),
}

pub type AccessResult<T> = Result<T, AccessError>;
