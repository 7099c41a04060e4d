//! Catalog error types.

use ridebook_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// Product catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Required form field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Field is longer than its stored column allows.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// Price is not a non-negative decimal that fits the price column.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Product not found.
    #[error("Product not found")]
    NotFound(Uuid),

    /// No account has this company name.
    #[error("Company not found")]
    CompanyNotFound(String),

    /// Product belongs to another account.
    #[error("You can only modify your own products")]
    NotOwner,

    /// Image storage failed or rejected an upload.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl CatalogError {
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
            Self::TooLong { .. } => "too_long",
            Self::InvalidPrice(_) => "invalid_price",
            Self::NotFound(_) => "product_not_found",
            Self::CompanyNotFound(_) => "company_not_found",
            Self::NotOwner => "forbidden",
            Self::Storage(e) if e.is_client_error() => "invalid_image",
            Self::Storage(_) | Self::Repository(_) => "internal_error",
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::MissingField(_)
            | CatalogError::TooLong { .. }
            | CatalogError::InvalidPrice(_) => Self::Validation(err.to_string()),
            CatalogError::NotFound(_) | CatalogError::CompanyNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            CatalogError::NotOwner => Self::Forbidden(err.to_string()),
            CatalogError::Storage(e) => e.into(),
            CatalogError::Repository(msg) => Self::Internal(msg),
        }
    }
}
