use stockroom_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Caller is authenticated but its role may not do this
    #[error("{0}")]
    Forbidden(&'static str),

    /// Caller-fixable problem with the submitted fields
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
