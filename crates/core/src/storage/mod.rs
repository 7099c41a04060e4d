//! Image storage for product pictures using Apache OpenDAL.
//!
//! Supported backends:
//! - Local filesystem (served by the API under the public prefix)
//! - S3-compatible buckets: Cloudflare R2, AWS S3, MinIO
//!
//! Stored objects are flat: `{uuid-v4}{.ext}`. The stored name is what a
//! product's `images` list holds.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{ImageStore, ImageUpload};
