//! Account error types.

use ridebook_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::{Role, password::PasswordError};

/// Account and authorization errors.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Required field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Email does not have the `local@domain.tld` shape.
    #[error("Invalid email format")]
    InvalidEmail,

    /// Password does not meet the strength rules.
    #[error(
        "Password must contain at least 8 characters, one uppercase letter, one lowercase letter, one number, and one special character"
    )]
    WeakPassword,

    /// Field is longer than its stored column allows.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// Company name does not normalize into a valid slug.
    #[error(
        "Company name can only contain letters, numbers, spaces, and hyphens"
    )]
    InvalidCompanyName,

    /// Role string is not one of `user`, `admin`, `superadmin`.
    #[error("Unknown role: {0}")]
    InvalidRole(String),

    /// Email already registered.
    #[error("Email is already registered")]
    EmailTaken,

    /// Company name already registered.
    #[error("Company name is already taken")]
    CompanyTaken,

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account not found.
    #[error("account not found: {0}")]
    NotFound(Uuid),

    /// Verified role is not the one the route requires.
    #[error("Access denied. {} only.", .0.plural_label())]
    RoleRequired(Role),

    /// Password hashing failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl AccountError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// Snake-case code for API error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidEmail => "invalid_email",
            Self::WeakPassword => "weak_password",
            Self::TooLong { .. } => "too_long",
            Self::InvalidCompanyName => "invalid_company_name",
            Self::InvalidRole(_) => "invalid_role",
            Self::EmailTaken => "email_taken",
            Self::CompanyTaken => "company_taken",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NotFound(_) => "user_not_found",
            Self::RoleRequired(_) => "forbidden",
            Self::Password(_) | Self::Repository(_) => "internal_error",
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::MissingField(_)
            | AccountError::InvalidEmail
            | AccountError::WeakPassword
            | AccountError::TooLong { .. }
            | AccountError::InvalidCompanyName
            | AccountError::InvalidRole(_) => Self::Validation(err.to_string()),
            AccountError::EmailTaken | AccountError::CompanyTaken => {
                Self::Conflict(err.to_string())
            }
            AccountError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AccountError::NotFound(_) => Self::NotFound("User not found".to_string()),
            AccountError::RoleRequired(_) => Self::Forbidden(err.to_string()),
            AccountError::Password(_) | AccountError::Repository(_) => {
                Self::Internal(err.to_string())
            }
        }
    }
}
