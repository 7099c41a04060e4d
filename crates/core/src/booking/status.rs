//! Booking status and its allowed transitions.

use serde::{Deserialize, Serialize};

use super::error::BookingError;

/// Status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Submitted by a customer, awaiting the company.
    Pending,
    /// Accepted by the company.
    Confirmed,
    /// Withdrawn or refused. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// All statuses.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Cancelled];

    /// Wire and storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether the booking still holds its dates.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Whether a booking in this status may move to `next`.
    ///
    /// Writing the current status again is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, _) | (Self::Confirmed, _) | (Self::Cancelled, Self::Cancelled)
        )
    }

    /// Check a transition.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` when leaving `Cancelled`.
    pub fn transition_to(self, next: Self) -> Result<Self, BookingError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(BookingError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = BookingError;

    /// Case-sensitive: `"pending"` is not a status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| BookingError::InvalidStatus(s.to_string()))
    }
}
