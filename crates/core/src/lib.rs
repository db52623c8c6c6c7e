//! Shared primitives for all Rust crates in Tablero.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Result type used across Tablero crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An upstream service could not be reached.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// An upstream service answered with a non-success status.
    #[error("upstream error {status}: {message}")]
    Upstream {
        /// HTTP status returned by the upstream service.
        status: u16,
        /// Best-effort message extracted from the upstream body.
        message: String,
        /// Raw upstream body text.
        details: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code this error maps to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Unavailable(_) => 503,
            Self::Upstream { status, .. } => *status,
            Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn upstream_error_keeps_upstream_status() {
        let error = AppError::Upstream {
            status: 422,
            message: "stock insuficiente".to_owned(),
            details: "{\"error\":\"stock insuficiente\"}".to_owned(),
        };

        assert_eq!(error.status_code(), 422);
        assert_eq!(error.to_string(), "upstream error 422: stock insuficiente");
    }

    #[test]
    fn unavailable_maps_to_service_unavailable() {
        assert_eq!(
            AppError::Unavailable("connection refused".to_owned()).status_code(),
            503
        );
    }
}
