//! Domain error to HTTP response mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{debug, error};
use warden_core::error::{FieldViolation, WardenError};

/// Wraps a [`WardenError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub WardenError);

impl From<WardenError> for ApiError {
    fn from(err: WardenError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(WardenError::invalid("body", rejection.body_text()))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldViolation]>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, fields) = match &self.0 {
            // Never say whether the id exists under another owner.
            WardenError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                "not_found",
                "resource server not found".to_string(),
                None,
            ),
            WardenError::Validation { violations } => (
                StatusCode::BAD_REQUEST,
                "validation",
                "request failed validation".to_string(),
                Some(violations.as_slice()),
            ),
            WardenError::Conflict(_) => (
                StatusCode::CONFLICT,
                "conflict",
                "conflicting write, reload and retry".to_string(),
                None,
            ),
            WardenError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                self.0.to_string(),
                None,
            ),
            WardenError::Database(_) | WardenError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
                "internal server error".to_string(),
                None,
            ),
        };

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            error: kind,
            message,
            fields,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: WardenError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            status_of(WardenError::not_found("resource_server", "x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(WardenError::invalid("name", "must not be blank")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(WardenError::Conflict("stale".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(WardenError::Database("down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(WardenError::Internal("bug".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(WardenError::Unauthenticated),
            StatusCode::UNAUTHORIZED
        );
    }
}
