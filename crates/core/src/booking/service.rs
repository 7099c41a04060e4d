//! Booking service implementation.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use super::BookingStatus;
use super::error::BookingError;
use super::types::{
    BookedRange, Booking, BookingChanges, BookingRequest, NewBooking, check_range,
};

/// Repository trait for booking persistence.
pub trait BookingRepository: Send + Sync {
    /// Insert a new booking with status `Pending`.
    ///
    /// With `reject_overlaps`, fails with `DatesUnavailable` when an active
    /// booking of the same company shares a day. The check and the insert
    /// must be atomic with respect to other guarded writes of that company.
    fn create(
        &self,
        input: NewBooking,
        reject_overlaps: bool,
    ) -> impl Future<Output = Result<Booking, BookingError>> + Send;

    /// Find booking by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Booking>, BookingError>> + Send;

    /// List a company's bookings ordered by start date, then creation time.
    fn list_by_company(
        &self,
        company_name: &str,
        status: Option<BookingStatus>,
    ) -> impl Future<Output = Result<Vec<Booking>, BookingError>> + Send;

    /// Apply changes. Returns `None` if the booking does not exist.
    ///
    /// With `reject_overlaps`, the resulting dates are checked against the
    /// company's other active bookings atomically with the write.
    fn update(
        &self,
        id: Uuid,
        changes: BookingChanges,
        reject_overlaps: bool,
    ) -> impl Future<Output = Result<Option<Booking>, BookingError>> + Send;

    /// Move a booking to `next`. With `company_name`, only a booking of
    /// that company matches. Returns the previous status and the stored
    /// booking, or `None` if nothing matches.
    ///
    /// Fails with `InvalidTransition` when the current status does not allow
    /// the move. Reading the current status and writing the new one must be
    /// atomic with respect to other writes of the same booking.
    fn set_status(
        &self,
        id: Uuid,
        company_name: Option<&str>,
        next: BookingStatus,
    ) -> impl Future<Output = Result<Option<(BookingStatus, Booking)>, BookingError>> + Send;

    /// Delete booking by ID. Returns whether a row was removed.
    fn delete(&self, id: Uuid) -> impl Future<Output = Result<bool, BookingError>> + Send;

    /// Resolve a company slug to the account that owns it.
    fn find_company_owner(
        &self,
        company_name: &str,
    ) -> impl Future<Output = Result<Option<Uuid>, BookingError>> + Send;
}

/// Booking rules that vary per deployment.
#[derive(Debug, Clone, Copy)]
pub struct BookingPolicy {
    /// Reject dates overlapping an active booking of the same company.
    pub reject_overlaps: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            reject_overlaps: true,
        }
    }
}

/// Booking ledger service.
pub struct BookingService<R: BookingRepository> {
    repo: Arc<R>,
    policy: BookingPolicy,
}

impl<R: BookingRepository> BookingService<R> {
    /// Create a new booking service.
    #[must_use]
    pub fn new(repo: Arc<R>, policy: BookingPolicy) -> Self {
        Self { repo, policy }
    }

    /// Submit a customer booking for a company. The new booking is always
    /// `Pending`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The company does not exist
    /// - A required field is missing or malformed
    /// - The dates overlap an active booking and overlaps are rejected
    pub async fn create(
        &self,
        company_name: &str,
        request: BookingRequest,
    ) -> Result<Booking, BookingError> {
        let owner_id = self
            .repo
            .find_company_owner(company_name)
            .await?
            .ok_or_else(|| BookingError::CompanyNotFound(company_name.to_string()))?;

        let new_booking = request.into_new(company_name, owner_id)?;
        let (start, end) = (new_booking.start_date, new_booking.end_date);

        let booking = self
            .repo
            .create(new_booking, self.policy.reject_overlaps)
            .await
            .inspect_err(|e| log_unavailable(e, company_name, start, end))?;
        info!(
            booking_id = %booking.id,
            company = %company_name,
            start_date = %booking.start_date,
            "booking created"
        );
        Ok(booking)
    }

    /// All bookings of a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list(&self, company_name: &str) -> Result<Vec<Booking>, BookingError> {
        self.repo.list_by_company(company_name, None).await
    }

    /// Bookings of a company with exactly this status.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatus` for an unknown status name.
    pub async fn list_by_status(
        &self,
        company_name: &str,
        status: &str,
    ) -> Result<Vec<Booking>, BookingError> {
        let status = status.parse::<BookingStatus>()?;
        self.repo.list_by_company(company_name, Some(status)).await
    }

    /// Days held by the company's active bookings.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn booked_dates(
        &self,
        company_name: &str,
    ) -> Result<Vec<BookedRange>, BookingError> {
        let bookings = self.repo.list_by_company(company_name, None).await?;
        Ok(bookings
            .iter()
            .filter(|b| b.status.is_active())
            .map(BookedRange::from)
            .collect())
    }

    /// Change a booking's status.
    ///
    /// With `company_name`, only a booking of that company matches.
    /// Writing the current status again returns the booking unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The status name is unknown
    /// - The booking does not exist (in that company)
    /// - The booking is `Cancelled` and the new status is not
    pub async fn set_status(
        &self,
        company_name: Option<&str>,
        id: Uuid,
        status: &str,
    ) -> Result<Booking, BookingError> {
        let next = status.parse::<BookingStatus>()?;
        let (previous, booking) = self
            .repo
            .set_status(id, company_name, next)
            .await?
            .ok_or(BookingError::NotFound(id))?;

        if previous != next {
            info!(booking_id = %id, from = %previous, to = %next, "booking status changed");
        }
        Ok(booking)
    }

    /// Update customer fields of a company's booking.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The booking does not exist in that company
    /// - A supplied field is malformed or the date range is inverted
    /// - New dates overlap another active booking and overlaps are rejected
    pub async fn update(
        &self,
        company_name: &str,
        id: Uuid,
        request: BookingRequest,
    ) -> Result<Booking, BookingError> {
        let booking = self.find_scoped(Some(company_name), id).await?;
        let changes = request.into_changes()?;

        let start = changes.start_date.unwrap_or(booking.start_date);
        let end = changes.end_date.unwrap_or(booking.end_date);
        let guard = changes.touches_dates()
            && booking.status.is_active()
            && self.policy.reject_overlaps;
        if changes.touches_dates() {
            check_range(start, end)?;
        }

        let updated = self
            .repo
            .update(id, changes, guard)
            .await
            .inspect_err(|e| log_unavailable(e, company_name, start, end))?
            .ok_or(BookingError::NotFound(id))?;

        info!(booking_id = %id, company = %company_name, "booking updated");
        Ok(updated)
    }

    /// Delete a company's booking.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the booking does not exist in that company.
    pub async fn delete(&self, company_name: &str, id: Uuid) -> Result<(), BookingError> {
        self.find_scoped(Some(company_name), id).await?;

        if !self.repo.delete(id).await? {
            return Err(BookingError::NotFound(id));
        }

        info!(booking_id = %id, company = %company_name, "booking deleted");
        Ok(())
    }

    async fn find_scoped(
        &self,
        company_name: Option<&str>,
        id: Uuid,
    ) -> Result<Booking, BookingError> {
        self.repo
            .find_by_id(id)
            .await?
            .filter(|b| company_name.is_none_or(|c| b.company_name == c))
            .ok_or(BookingError::NotFound(id))
    }
}

fn log_unavailable(
    err: &BookingError,
    company_name: &str,
    start: NaiveDate,
    end: Option<NaiveDate>,
) {
    if matches!(err, BookingError::DatesUnavailable) {
        warn!(company = %company_name, %start, end = ?end, "booking dates unavailable");
    }
}
