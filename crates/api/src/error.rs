//! Error handling for the HTTP layer.
//!
//! Handlers return [`AppResult`]; every failure funnels through the
//! [`IntoResponse`] impl below, which picks the status and renders the
//! `{error, code}` JSON body clients parse.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use siteform_core::error::CoreError;

/// Failure surfaced by a handler.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain failure from `siteform_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Storage failure; classified into a status by [`classify_db_error`].
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected server-side failure. The message is logged, never sent
    /// to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn status_code_and_body(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_db_error(err),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_parts()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_and_body();
        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

/// The sanitized 500 triple. Internal detail goes to the log, not the wire.
fn internal_parts() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string()),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal_parts()
        }
    }
}

/// Map a sqlx failure to a response triple.
///
/// `RowNotFound` becomes 404. A Postgres 23505 on one of our `uq_`-named
/// unique constraints becomes 409, so duplicate inserts read as conflicts
/// rather than server faults. Anything else is logged and sanitized to 500.
fn classify_db_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value for {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal_parts()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_parts()
        }
    }
}
