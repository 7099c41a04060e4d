//! Routing types.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::pricing::listing_price;
use crate::catalog::Product;

/// Display value used when the route is unknown.
pub const NOT_AVAILABLE: &str = "N/A";

/// A point as `(longitude, latitude)`, the order Mapbox uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}

impl Coordinates {
    /// Parse a `"lng,lat"` pair, as sent by map widgets.
    #[must_use]
    pub fn parse_pair(raw: &str) -> Option<Self> {
        let (lng, lat) = raw.split_once(',')?;
        let lng: f64 = lng.trim().parse().ok()?;
        let lat: f64 = lat.trim().parse().ok()?;
        let valid = (-180.0..=180.0).contains(&lng) && (-90.0..=90.0).contains(&lat);
        valid.then_some(Self { lng, lat })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

/// First route returned by the directions service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    /// Distance in metres.
    pub distance_m: f64,
    /// Duration in seconds.
    pub duration_s: f64,
}

/// Distance and duration of a route, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteEstimate {
    /// Kilometres, two decimals.
    pub distance_km: Option<Decimal>,
    /// Whole minutes.
    pub duration_min: Option<i64>,
    /// Why the route is unknown.
    pub error: Option<String>,
}

impl RouteEstimate {
    /// An estimate with no route.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            distance_km: None,
            duration_min: None,
            error: Some(reason.into()),
        }
    }
}

/// A product priced for a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedListing {
    /// Product ID.
    pub id: Uuid,
    /// Display name.
    pub product_name: String,
    /// Description.
    pub description: String,
    /// Stored image names.
    pub images: Vec<String>,
    /// Product price without the distance surcharge.
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    /// Price for this route.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Route estimate plus priced listings, as returned to the booking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuote {
    /// Kilometres as text, or `"N/A"`.
    pub distance: String,
    /// Minutes as text, or `"N/A"`.
    pub duration: String,
    /// Kilometres, when known.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub distance_km: Option<Decimal>,
    /// Minutes, when known.
    pub duration_min: Option<i64>,
    /// Price added per kilometre.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_rate: Decimal,
    /// Why the route is unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The company's products priced for this route.
    pub listings: Vec<PricedListing>,
}

impl RouteQuote {
    /// Price every product for the estimate. Without a distance the base
    /// price stands.
    #[must_use]
    pub fn new(estimate: RouteEstimate, unit_rate: Decimal, products: Vec<Product>) -> Self {
        let listings = products
            .into_iter()
            .map(|p| PricedListing {
                price: estimate
                    .distance_km
                    .map_or(p.price, |km| listing_price(p.price, km, unit_rate)),
                id: p.id,
                product_name: p.product_name,
                description: p.description,
                images: p.images,
                base_price: p.price,
            })
            .collect();

        Self {
            distance: estimate
                .distance_km
                .map_or_else(|| NOT_AVAILABLE.to_string(), |km| format!("{km:.2}")),
            duration: estimate
                .duration_min
                .map_or_else(|| NOT_AVAILABLE.to_string(), |min| min.to_string()),
            distance_km: estimate.distance_km,
            duration_min: estimate.duration_min,
            unit_rate,
            error: estimate.error,
            listings,
        }
    }
}
