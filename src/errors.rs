//! Application error type shared by the repository, the attendance logic
//! and the HTTP handlers.

use crate::model::punch::PunchType;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Punch submission
    // ---------------------------
    #[error("Location not available. Please enable location services.")]
    LocationUnavailable,

    #[error("Cannot punch {requested} while the last punch is {}", last_label(.last))]
    PunchNotAdmissible {
        requested: PunchType,
        last: Option<PunchType>,
    },

    #[error("Punch state changed concurrently, reload and retry")]
    PunchStateChanged,

    // ---------------------------
    // Authentication / input
    // ---------------------------
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    DuplicateOrEmptyInput(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthorized(String),

    // ---------------------------
    // Persistence
    // ---------------------------
    #[error("Database error: {0}")]
    PersistenceFailure(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

fn last_label(last: &Option<PunchType>) -> &'static str {
    match last {
        Some(PunchType::In) => "IN",
        Some(PunchType::Out) => "OUT",
        None => "NONE",
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::LocationUnavailable => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PunchNotAdmissible { .. } | AppError::PunchStateChanged => {
                StatusCode::CONFLICT
            }
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::DuplicateOrEmptyInput(_) | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PersistenceFailure(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::PersistenceFailure(e) => {
                error!(error = %e, "Persistence failure");
                "Something went wrong, Contact with system admin".to_string()
            }
            AppError::Internal(detail) => {
                error!(detail = %detail, "Internal error");
                "Something went wrong, Contact with system admin".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}
