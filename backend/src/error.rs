//! Error handling for the stock-order ledger service
//!
//! Maps core ledger errors and remote failures onto consistent JSON error
//! responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{LedgerError, ValidationErrors, ValidationIssue, ValidationRule};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Local, pre-submit errors
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Remote persistence errors
    #[error("Remote service failure: {0}")]
    RemoteFailure(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(errors) => AppError::Validation(errors),
            LedgerError::UnsupportedOperation(msg) => AppError::UnsupportedOperation(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        for (field, field_errors) in err.field_errors() {
            for field_error in field_errors {
                let message = field_error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid ({})", field, field_error.code));
                errors.push(field, ValidationRule::OutOfRange, message);
            }
        }
        AppError::Validation(errors)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::RemoteFailure(err.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationIssue>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            issues: Vec::new(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: errors.to_string(),
                    field: errors.fields().first().map(|f| f.to_string()),
                    issues: errors.issues.clone(),
                },
            ),
            AppError::UnsupportedOperation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("UNSUPPORTED_OPERATION", msg.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::RemoteFailure(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail::new(
                    "REMOTE_FAILURE",
                    format!("The ledger service could not complete the request: {}", msg),
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("CONFIGURATION_ERROR", format!("Configuration error: {}", msg)),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
