use std::collections::BTreeMap;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<FieldErrors>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// A 422 carrying a per-field error map alongside the summary message.
    pub fn validation<E>(err: E, fields: FieldErrors) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error: err.into(),
            fields: Some(fields),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Database and other unexpected failures must not leak internals.
        let message = if self.status.is_server_error() {
            tracing::error!(error = %self.error, "Internal server error");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = match self.fields {
            Some(fields) => Json(json!({
                "error": message,
                "fields": fields,
            })),
            None => Json(json!({
                "error": message
            })),
        };

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        let error: Error = err.into();

        // Unique violations come straight from the data store's constraints
        // (duplicate email, enrollment, attendance, submission keys) and are
        // surfaced as conflicts rather than server errors.
        if let Some(db_err) = error
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
        {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                let detail = db_err.constraint().unwrap_or("unique constraint");
                return AppError::conflict(anyhow::anyhow!(
                    "Record already exists ({})",
                    detail
                ));
            }
        }

        AppError::internal(error)
    }
}
