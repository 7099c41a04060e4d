//! Booking domain types and request validation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::BookingStatus;
use super::error::BookingError;
use crate::account::validation::{MAX_EMAIL_LEN, is_valid_email};
use crate::numeric::{self, DISTANCE_PRECISION, PRICE_PRECISION};

const MAX_FULL_NAME_LEN: usize = 200;
const MAX_PHONE_LEN: usize = 50;
const MAX_TIME_LEN: usize = 20;
const MAX_PLACE_LEN: usize = 500;

/// A customer reservation against one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking ID.
    pub id: Uuid,
    /// Customer name.
    pub full_name: String,
    /// Customer email.
    pub email: String,
    /// Customer phone.
    pub phone: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day; a single-day booking has none.
    pub end_date: Option<NaiveDate>,
    /// Pick-up time as entered by the customer.
    pub time: String,
    /// Free-form comments.
    pub comments: Option<String>,
    /// Route origin.
    pub origin: String,
    /// Route destination.
    pub destination: String,
    /// Price shown to the customer.
    pub price: Decimal,
    /// Route distance in kilometres.
    pub distance: Decimal,
    /// Company the booking was made with.
    pub company_name: String,
    /// Account that owns the company.
    #[serde(rename = "adminId")]
    pub owner_id: Uuid,
    /// Status.
    pub status: BookingStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Inclusive last day held by the booking.
    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.end_date.unwrap_or(self.start_date)
    }

    /// Whether the inclusive range `[start, end]` shares a day with this
    /// booking.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.last_day()
    }
}

/// Customer fields of a booking form, as received.
///
/// Used for creation (all required fields present) and for partial
/// updates. A `status` key in the body is ignored. In an update, an
/// explicit `null` or blank `endDate`/`comments` clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    /// Customer name.
    pub full_name: Option<String>,
    /// Customer email.
    pub email: Option<String>,
    /// Customer phone.
    pub phone: Option<String>,
    /// First day, `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD`. `Some(None)` is an explicit `null`.
    #[serde(deserialize_with = "present")]
    pub end_date: Option<Option<String>>,
    /// Pick-up time.
    pub time: Option<String>,
    /// Comments. `Some(None)` is an explicit `null`.
    #[serde(deserialize_with = "present")]
    pub comments: Option<Option<String>>,
    /// Route origin.
    pub origin: Option<String>,
    /// Route destination.
    pub destination: Option<String>,
    /// Price, number or decimal string.
    pub price: Option<Decimal>,
    /// Distance in km, number or decimal string.
    pub distance: Option<Decimal>,
}

/// Input for persisting a new booking. Status is always `Pending`.
#[derive(Debug, Clone)]
pub struct NewBooking {
    /// Customer name.
    pub full_name: String,
    /// Customer email.
    pub email: String,
    /// Customer phone.
    pub phone: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: Option<NaiveDate>,
    /// Pick-up time.
    pub time: String,
    /// Comments.
    pub comments: Option<String>,
    /// Route origin.
    pub origin: String,
    /// Route destination.
    pub destination: String,
    /// Price.
    pub price: Decimal,
    /// Distance in km.
    pub distance: Decimal,
    /// Company slug.
    pub company_name: String,
    /// Owning account.
    pub owner_id: Uuid,
}

/// Changes to an existing booking. `None` keeps the current value;
/// `Some(None)` clears an optional one.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    /// Customer name.
    pub full_name: Option<String>,
    /// Customer email.
    pub email: Option<String>,
    /// Customer phone.
    pub phone: Option<String>,
    /// First day.
    pub start_date: Option<NaiveDate>,
    /// Last day.
    pub end_date: Option<Option<NaiveDate>>,
    /// Pick-up time.
    pub time: Option<String>,
    /// Comments.
    pub comments: Option<Option<String>>,
    /// Route origin.
    pub origin: Option<String>,
    /// Route destination.
    pub destination: Option<String>,
    /// Price.
    pub price: Option<Decimal>,
    /// Distance in km.
    pub distance: Option<Decimal>,
}

impl BookingChanges {
    /// Whether the date range is touched.
    #[must_use]
    pub fn touches_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// Days held by an active booking, for the public availability calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRange {
    /// First day.
    pub start_date: NaiveDate,
    /// Last day (equal to the first for single-day bookings).
    pub end_date: NaiveDate,
}

impl From<&Booking> for BookedRange {
    fn from(booking: &Booking) -> Self {
        Self {
            start_date: booking.start_date,
            end_date: booking.last_day(),
        }
    }
}

impl BookingRequest {
    /// Validate a complete form for a new booking.
    pub(crate) fn into_new(
        self,
        company_name: &str,
        owner_id: Uuid,
    ) -> Result<NewBooking, BookingError> {
        let changes = self.into_changes()?;

        let full_name = changes.full_name.ok_or(BookingError::MissingField("fullName"))?;
        let email = changes.email.ok_or(BookingError::MissingField("email"))?;
        let phone = changes.phone.ok_or(BookingError::MissingField("phone"))?;
        let start_date = changes.start_date.ok_or(BookingError::MissingField("startDate"))?;
        let time = changes.time.ok_or(BookingError::MissingField("time"))?;
        let origin = changes.origin.ok_or(BookingError::MissingField("origin"))?;
        let destination = changes
            .destination
            .ok_or(BookingError::MissingField("destination"))?;
        let price = changes.price.ok_or(BookingError::MissingField("price"))?;
        let distance = changes.distance.ok_or(BookingError::MissingField("distance"))?;

        let end_date = changes.end_date.flatten();
        check_range(start_date, end_date)?;

        Ok(NewBooking {
            full_name,
            email,
            phone,
            start_date,
            end_date,
            time,
            comments: changes.comments.flatten(),
            origin,
            destination,
            price,
            distance,
            company_name: company_name.to_string(),
            owner_id,
        })
    }

    /// Validate the supplied fields. Blank required text counts as absent;
    /// blank optional text clears.
    pub(crate) fn into_changes(self) -> Result<BookingChanges, BookingError> {
        let email = bounded("email", self.email, MAX_EMAIL_LEN)?
            .map(|e| e.to_lowercase())
            .map(|e| if is_valid_email(&e) { Ok(e) } else { Err(BookingError::InvalidEmail) })
            .transpose()?;
        let end_date = self
            .end_date
            .map(|d| text(d).map(|d| parse_date("endDate", &d)).transpose())
            .transpose()?;

        Ok(BookingChanges {
            full_name: bounded("fullName", self.full_name, MAX_FULL_NAME_LEN)?,
            email,
            phone: bounded("phone", self.phone, MAX_PHONE_LEN)?,
            start_date: text(self.start_date)
                .map(|d| parse_date("startDate", &d))
                .transpose()?,
            end_date,
            time: bounded("time", self.time, MAX_TIME_LEN)?,
            comments: self.comments.map(text),
            origin: bounded("origin", self.origin, MAX_PLACE_LEN)?,
            destination: bounded("destination", self.destination, MAX_PLACE_LEN)?,
            price: self
                .price
                .map(|p| amount("price", p, PRICE_PRECISION))
                .transpose()?,
            distance: self
                .distance
                .map(|d| amount("distance", d, DISTANCE_PRECISION))
                .transpose()?,
        })
    }
}

/// Tells an explicit `null` (`Some(None)`) apart from a missing key (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn bounded(
    field: &'static str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, BookingError> {
    match text(value) {
        Some(v) if v.chars().count() > max => Err(BookingError::TooLong { field, max }),
        other => Ok(other),
    }
}

/// Parse `YYYY-MM-DD`. A full RFC 3339 timestamp is cut to its date.
fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, BookingError> {
    let date_part = raw.split_once('T').map_or(raw, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| BookingError::InvalidDate {
        field,
        value: raw.to_string(),
    })
}

fn amount(field: &'static str, value: Decimal, precision: u32) -> Result<Decimal, BookingError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(BookingError::NegativeAmount(field));
    }
    if !numeric::fits(value, precision) {
        return Err(BookingError::AmountOutOfRange {
            field,
            limit: numeric::upper_bound(precision),
        });
    }
    Ok(value)
}

/// Reject an end date before the start date.
pub(crate) fn check_range(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), BookingError> {
    match end {
        Some(end) if end < start => Err(BookingError::EndBeforeStart),
        _ => Ok(()),
    }
}
