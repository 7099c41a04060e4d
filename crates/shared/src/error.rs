//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Every domain error in `ridebook-core` converts into one of these, and the
/// HTTP layer turns them into a status code plus `{error, message}` body.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed (bad credentials, missing or invalid token).
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role or ownership does not allow the action.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or rejected input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness or availability conflict (duplicate email, taken dates).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    ///
    /// Conflicts answer 400 like validation failures.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Validation(_) | Self::Conflict(_) => 400,
            Self::ExternalService(_) => 502,
            Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "unauthorized",
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::ExternalService(_) => "external_service_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Returns the message that is safe to show to a client.
    ///
    /// Internal failures are answered with a generic text; their detail only
    /// goes to the logs.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "An error occurred".to_string(),
            Self::ExternalService(_) => "An upstream service is unavailable".to_string(),
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Conflict(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Unauthorized(String::new()), 401)]
    #[case(AppError::Forbidden(String::new()), 403)]
    #[case(AppError::NotFound(String::new()), 404)]
    #[case(AppError::Validation(String::new()), 400)]
    #[case(AppError::Conflict(String::new()), 400)]
    #[case(AppError::ExternalService(String::new()), 502)]
    #[case(AppError::Internal(String::new()), 500)]
    fn test_error_status_codes(#[case] error: AppError, #[case] expected: u16) {
        assert_eq!(error.status_code(), expected);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Unauthorized(String::new()).error_code(),
            "unauthorized"
        );
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "forbidden");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "not_found");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "validation_error"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "conflict");
        assert_eq!(
            AppError::ExternalService(String::new()).error_code(),
            "external_service_error"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "internal_error"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Unauthorized("msg".into()).to_string(),
            "Authentication failed: msg"
        );
        assert_eq!(
            AppError::Conflict("msg".into()).to_string(),
            "Conflict: msg"
        );
        assert_eq!(
            AppError::Internal("msg".into()).to_string(),
            "Internal error: msg"
        );
    }

    #[test]
    fn test_internal_detail_is_not_public() {
        let err = AppError::Internal("connection refused at 10.0.0.3:5432".into());
        assert_eq!(err.public_message(), "An error occurred");

        let err = AppError::Validation("Invalid email format".into());
        assert_eq!(err.public_message(), "Invalid email format");
    }
}
