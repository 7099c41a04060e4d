//! Booking ledger: customer reservations per company and their status
//! lifecycle.
//!
//! ```text
//!            ┌──────────────┐
//!            ▼              │
//!        Pending ──────► Confirmed
//!            │              │
//!            └──► Cancelled ◄┘   (terminal)
//! ```

mod error;
mod service;
mod status;
mod types;

pub use error::BookingError;
pub use service::{BookingPolicy, BookingRepository, BookingService};
pub use status::BookingStatus;
pub use types::{BookedRange, Booking, BookingChanges, BookingRequest, NewBooking};
