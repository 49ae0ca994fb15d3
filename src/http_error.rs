use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::rules::{ErrorKind, Rejection};
use crate::store::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    pub code: Option<String>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into(), code: None }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Logs the detail and hides it from the client.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!("internal error: {}", detail);
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error").with_code("internal")
    }

    pub fn malformatted_id() -> Self {
        AppError::new(StatusCode::BAD_REQUEST, "malformatted id").with_code("malformatted_id")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, code: self.code };
        (self.status, Json(body)).into_response()
    }
}

impl From<(StatusCode, String)> for AppError {
    fn from((status, msg): (StatusCode, String)) -> Self {
        AppError::new(status, msg)
    }
}

impl From<Rejection> for AppError {
    fn from(r: Rejection) -> Self {
        tracing::warn!(code = r.code(), "request rejected: {}", r);
        // ownership failures stay 401, and uniqueness is reported as a plain
        // validation failure
        let status = match r.kind() {
            ErrorKind::Validation | ErrorKind::Conflict => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Auth => StatusCode::UNAUTHORIZED,
        };
        AppError::new(status, r.to_string()).with_code(r.code())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(field) if field == "username" => Rejection::UsernameTaken.into(),
            StoreError::Duplicate(field) => {
                AppError::new(StatusCode::BAD_REQUEST, format!("{field} must be unique")).with_code("duplicate_key")
            }
            StoreError::MissingField(field) => match field.as_str() {
                "title" => Rejection::TitleRequired.into(),
                "url" => Rejection::PersistenceRejected("Blog URL is required".to_string()).into(),
                other => Rejection::PersistenceRejected(format!("{other} is required")).into(),
            },
            StoreError::UnknownReference(field) => match field.as_str() {
                "user" => Rejection::UserNotFound.into(),
                other => Rejection::PersistenceRejected(format!("unknown {other}")).into(),
            },
            StoreError::Backend(detail) => AppError::internal(detail),
        }
    }
}
