//! Product catalog: per-company vehicles with images.

mod error;
mod service;
mod types;

pub use error::CatalogError;
pub use service::{CatalogRepository, CatalogService};
pub use types::{NewProduct, Product, ProductChanges, ProductInput};
