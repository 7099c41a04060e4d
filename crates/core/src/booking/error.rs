//! Booking error types.

use ridebook_shared::AppError;
use thiserror::Error;
use uuid::Uuid;

use super::BookingStatus;

/// Booking ledger errors.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Required field is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Customer email is malformed.
    #[error("Invalid email format")]
    InvalidEmail,

    /// Date is not `YYYY-MM-DD`.
    #[error("{field} must be a date in YYYY-MM-DD format, got '{value}'")]
    InvalidDate {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },

    /// End date precedes start date.
    #[error("endDate cannot be before startDate")]
    EndBeforeStart,

    /// Price or distance is negative.
    #[error("{0} cannot be negative")]
    NegativeAmount(&'static str),

    /// Amount has more than 2 decimal places or too many integer digits.
    #[error("{field} must be below {limit} with at most 2 decimal places")]
    AmountOutOfRange {
        /// Field name.
        field: &'static str,
        /// Exclusive upper bound.
        limit: u64,
    },

    /// Text field is longer than its stored column allows.
    #[error("{field} must be at most {max} characters")]
    TooLong {
        /// Field name.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// Status string is not a known status.
    #[error("Invalid status '{0}'. Expected Pending, Confirmed or Cancelled")]
    InvalidStatus(String),

    /// Status change is not allowed.
    #[error("Cannot change a {from} booking to {to}")]
    InvalidTransition {
        /// Current status.
        from: BookingStatus,
        /// Requested status.
        to: BookingStatus,
    },

    /// Dates overlap an active booking of the same company.
    #[error("The selected dates are already booked")]
    DatesUnavailable,

    /// No account has this company name.
    #[error("Company not found")]
    CompanyNotFound(String),

    /// Booking not found (or not in the given company).
    #[error("Booking not found")]
    NotFound(Uuid),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl BookingError {
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
            Self::InvalidDate { .. } => "invalid_date",
            Self::EndBeforeStart => "invalid_date_range",
            Self::NegativeAmount(_) | Self::AmountOutOfRange { .. } => "invalid_amount",
            Self::TooLong { .. } => "too_long",
            Self::InvalidStatus(_) => "invalid_status",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::DatesUnavailable => "dates_unavailable",
            Self::CompanyNotFound(_) => "company_not_found",
            Self::NotFound(_) => "booking_not_found",
            Self::Repository(_) => "internal_error",
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::MissingField(_)
            | BookingError::InvalidEmail
            | BookingError::InvalidDate { .. }
            | BookingError::EndBeforeStart
            | BookingError::NegativeAmount(_)
            | BookingError::AmountOutOfRange { .. }
            | BookingError::TooLong { .. }
            | BookingError::InvalidStatus(_)
            | BookingError::InvalidTransition { .. } => Self::Validation(err.to_string()),
            BookingError::DatesUnavailable => Self::Conflict(err.to_string()),
            BookingError::CompanyNotFound(_) | BookingError::NotFound(_) => {
                Self::NotFound(err.to_string())
            }
            BookingError::Repository(msg) => Self::Internal(msg),
        }
    }
}
