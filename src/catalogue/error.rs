use thiserror::Error;

/// Failure taxonomy for catalogue operations. Every failure is reported
/// synchronously on the request that caused it; the REST layer maps each
/// variant to a status code and an `{error}` body.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("{0}")]
    Validation(String),
    #[error("SKU already exists")]
    Conflict,
    #[error("catalogue item not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
