use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::repository::RepositoryError;

/// ErrorBody
///
/// The only error payload API routes ever return: `{ "error": "<message>" }`.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
}

/// Stable, client-facing message for a status code.
pub fn status_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::FORBIDDEN => "Forbidden",
        StatusCode::NOT_FOUND => "Not found",
        StatusCode::BAD_REQUEST => "Bad request",
        _ => "Internal server error",
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// ApiError
///
/// Handler-level failures after the gate has let the request through.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound => {
                json_error(StatusCode::NOT_FOUND, status_message(StatusCode::NOT_FOUND))
            }
            ApiError::Validation(message) => json_error(StatusCode::BAD_REQUEST, message),
            ApiError::Repository(e) => {
                // The cause stays in the logs; clients only get the generic message.
                tracing::error!("repository failure: {:?}", e);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    status_message(StatusCode::INTERNAL_SERVER_ERROR),
                )
            }
        }
    }
}
