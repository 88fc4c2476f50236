//! HTTP error type shared by every handler.
//!
//! All failures render as `{"error": "...", "code": "..."}`. Internal details
//! (SQL text, SMTP or filesystem errors) are logged and never echoed back.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use crave_core::error::CoreError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input that never reached domain validation, such as a
    /// multipart body without a `file` field.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    /// Status, machine-readable code and client-facing message.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => database_parts(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        CoreError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        CoreError::EmptyCart => (StatusCode::BAD_REQUEST, "EMPTY_CART"),
        CoreError::VariantUnavailable { .. } => (StatusCode::BAD_REQUEST, "VARIANT_UNAVAILABLE"),
        CoreError::UnknownStatus(_) => (StatusCode::BAD_REQUEST, "UNKNOWN_STATUS"),
        CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
    };
    (status, code, err.to_string())
}

/// `RowNotFound` is a 404. Unique violations on `uq_*` constraints and
/// foreign-key violations are 409 with a message naming what collided.
/// Anything else is logged and reported as a 500.
fn database_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    let db_err = match err {
        sqlx::Error::RowNotFound => {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            )
        }
        sqlx::Error::Database(db_err) => db_err,
        other => {
            tracing::error!(error = %other, "Database error");
            return internal();
        }
    };

    match (db_err.code().as_deref(), db_err.constraint()) {
        (Some("23505"), Some(constraint)) if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            conflict_message(constraint),
        ),
        (Some("23503"), _) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Record is still referenced by an order or no longer exists".to_string(),
        ),
        _ => {
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_categories_slug" => "A category with that name already exists".to_string(),
        "uq_users_username" => "That username is already taken".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}
