//! HTTP mapping for [`VidlibError`].

use crate::error::{ErrorKind, VidlibError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::error;

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::RangeNotSatisfiable => StatusCode::RANGE_NOT_SATISFIABLE,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&VidlibError> for ErrorResponse {
    fn from(err: &VidlibError) -> Self {
        let (error, details) = match err.kind() {
            ErrorKind::InvalidInput => (err.to_string(), None),
            ErrorKind::NotFound => ("Not found".to_string(), Some(err.to_string())),
            ErrorKind::RangeNotSatisfiable => {
                ("Range not satisfiable".to_string(), Some(err.to_string()))
            }
            ErrorKind::Unavailable => ("Service unavailable".to_string(), Some(err.to_string())),
            ErrorKind::Internal => ("Internal server error".to_string(), Some(err.to_string())),
        };
        Self { error, details }
    }
}

impl IntoResponse for VidlibError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        if kind == ErrorKind::Internal {
            error!(error = %self, "Request failed");
        }
        (kind.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

/// JSON 500 for a handler that panicked.
pub(crate) fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %message, "Handler panicked");

    let body = ErrorResponse {
        error: "Internal server error".to_string(),
        details: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
