//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Validation failures never
//! reach this type - they re-render the originating form with messages.
//! Store failures render a generic error page; the details go to the log
//! and Sentry, never to the client.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::filters;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found (stale room id, missing draft). Recovered by
    /// redirecting to the entry point.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin authentication required.
    #[error("Authentication required")]
    AuthRequired,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Generic server error page.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
struct ServerErrorTemplate;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Database(_) | Self::Internal(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Request error"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, ServerErrorTemplate).into_response()
            }
            Self::NotFound(what) => {
                tracing::debug!(what = %what, "Resource not found, redirecting");
                Redirect::to("/").into_response()
            }
            Self::AuthRequired => Redirect::to("/user/login").into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("room 9".to_string());
        assert_eq!(err.to_string(), "Not found: room 9");
    }

    #[test]
    fn test_status_codes() {
        fn status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(AppError::Database(RepositoryError::Timeout)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        // NotFound and AuthRequired recover via redirect
        assert_eq!(
            status(AppError::NotFound("gone".to_string())),
            StatusCode::SEE_OTHER
        );
        assert_eq!(status(AppError::AuthRequired), StatusCode::SEE_OTHER);
    }
}
