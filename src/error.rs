//! Request-level error taxonomy.
//!
//! Guard failures map to 400, upstream fetch failures to 500 (or 404 when
//! the upstream explicitly reported not-found), write failures to 500. All
//! error bodies are plaintext with a trailing newline; the literal strings
//! are part of the controller's contract with the publishing UI.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::clients::ClientError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no collection ID header set")]
    MissingCollectionId,

    #[error("no user access token header set")]
    MissingAccessToken,

    /// A primary-entity fetch failed; `status` is 404 only when the
    /// upstream itself reported not-found.
    #[error("{message}")]
    UpstreamFetch { message: String, status: StatusCode },

    /// A registry write or the follow-on collection-state propagation
    /// failed. Callers must re-read before retrying the metadata patch:
    /// the ETag they hold may be stale by now.
    #[error("{message}")]
    MetadataUpdate { message: String },

    #[error("{message}")]
    ResponseSerialization { message: String },
}

impl ApiError {
    /// Fetch failure whose body carries only the given context.
    pub fn fetch(message: impl Into<String>, source: &ClientError) -> Self {
        ApiError::UpstreamFetch {
            message: message.into(),
            status: if source.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Fetch failure whose body carries the context plus the upstream cause.
    pub fn fetch_with_cause(context: &str, source: &ClientError) -> Self {
        ApiError::UpstreamFetch {
            message: format!("{context}: {source}"),
            status: if source.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    pub fn update(message: impl Into<String>) -> Self {
        ApiError::MetadataUpdate {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCollectionId | ApiError::MissingAccessToken => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UpstreamFetch { status, .. } => *status,
            ApiError::MetadataUpdate { .. } | ApiError::ResponseSerialization { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = format!("{self}\n");
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> ClientError {
        ClientError::ErrorResponse {
            service: "dataset API",
            status: 404,
            body: String::new(),
        }
    }

    fn server_error() -> ClientError {
        ClientError::ErrorResponse {
            service: "dataset API",
            status: 500,
            body: "boom".to_string(),
        }
    }

    #[test]
    fn guard_errors_are_bad_requests() {
        assert_eq!(ApiError::MissingCollectionId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingAccessToken.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_not_found_is_propagated() {
        let err = ApiError::fetch("error getting version", &not_found());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_upstream_failures_are_internal() {
        let err = ApiError::fetch("error getting version", &server_error());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn fetch_with_cause_appends_the_upstream_message() {
        let err = ApiError::fetch_with_cause(
            "error getting all versions from dataset API",
            &server_error(),
        );
        assert_eq!(
            err.to_string(),
            "error getting all versions from dataset API: dataset API returned 500: boom"
        );
    }
}
