use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::error::DomainError;

pub(crate) const BASIC_CHALLENGE: &str = r#"Basic realm="posts""#;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("unauthorized")]
    Unauthorized,
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            // plain message body, no JSON envelope
            AppError::Domain(err @ DomainError::NotFound(_)) => {
                return (StatusCode::NOT_FOUND, err.to_string()).into_response();
            }
            AppError::Domain(err @ DomainError::Validation { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            AppError::Domain(DomainError::Unexpected(detail)) => {
                error!(error = %detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, BASIC_CHALLENGE)],
                    Json(ErrorBody {
                        error: "unauthorized".to_string(),
                    }),
                )
                    .into_response();
            }
        };

        (status, Json(ErrorBody { error: msg })).into_response()
    }
}
