//! Mapping of gateway errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::HuginnError;

/// A gateway error tagged with the operation that produced it.
#[derive(Debug)]
pub struct ApiError {
    operation: &'static str,
    error: HuginnError,
}

impl ApiError {
    pub fn new(operation: &'static str, error: HuginnError) -> Self {
        Self { operation, error }
    }

    /// Status code this error maps to.
    ///
    /// Validation problems (including an unknown provider) are 400s,
    /// missing upstream items are 404s, everything else is a 500.
    pub fn status(&self) -> StatusCode {
        if self.error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else if self.error.is_not_found() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match status {
            StatusCode::BAD_REQUEST => self.error.to_string(),
            StatusCode::NOT_FOUND => format!("{} not found", self.operation),
            _ => {
                tracing::error!(operation = self.operation, error = %self.error, "request failed");
                format!("{} request failed", self.operation)
            }
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Bind an operation name to gateway results.
pub trait OperationResultExt<T> {
    fn for_operation(self, operation: &'static str) -> Result<T, ApiError>;
}

impl<T> OperationResultExt<T> for crate::Result<T> {
    fn for_operation(self, operation: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| ApiError::new(operation, e))
    }
}
