use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("Order creation failed: {0}")]
    OrderCreationFailed(String),
    #[error("Dataset too large: {total} records exceed the export limit of {ceiling}")]
    DatasetTooLarge { total: i64, ceiling: i64 },
    #[error("Internal error: {0}")]
    Internal(String),
}
