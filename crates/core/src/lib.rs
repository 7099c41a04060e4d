//! Core business logic for Ridebook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached through repository traits that `ridebook-db`
//! implements.
//!
//! # Modules
//!
//! - `account` - Registration, login, password hashing, role gates
//! - `catalog` - Per-company products and their images
//! - `booking` - Booking ledger and status lifecycle
//! - `routing` - Route estimates and distance-based pricing
//! - `storage` - Image storage (local filesystem or S3-compatible)

pub mod account;
pub mod booking;
pub mod catalog;
pub(crate) mod numeric;
pub mod routing;
pub mod storage;
