//! Route estimates and distance-based listing prices.
//!
//! Two place names are geocoded, a driving route is requested, and every
//! listing of a company is priced as `base + km * unit_rate`. Routing
//! failures never fail the quote: distance and duration read `"N/A"` and
//! listings keep their base price.

mod error;
mod mapbox;
mod pricing;
mod service;
mod types;

pub use error::RoutingError;
pub use mapbox::MapboxClient;
pub use pricing::{distance_km, duration_minutes, listing_price};
pub use service::{RouteProvider, RoutingService};
pub use types::{Coordinates, PricedListing, RouteEstimate, RouteLeg, RouteQuote};
