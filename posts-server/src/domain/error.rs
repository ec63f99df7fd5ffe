use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("post with id {0} does not exist")]
    NotFound(Uuid),

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}
