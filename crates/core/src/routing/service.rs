//! Routing service implementation.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::error::RoutingError;
use super::pricing::{distance_km, duration_minutes};
use super::types::{Coordinates, RouteEstimate, RouteLeg, RouteQuote};
use crate::catalog::Product;

/// Geocoding and directions backend.
pub trait RouteProvider: Send + Sync {
    /// Resolve a place name to its best match.
    fn geocode(
        &self,
        place: &str,
    ) -> impl std::future::Future<Output = Result<Option<Coordinates>, RoutingError>> + Send;

    /// First driving route between two points, if any.
    fn directions(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> impl std::future::Future<Output = Result<Option<RouteLeg>, RoutingError>> + Send;
}

/// Route estimates and distance-based prices.
pub struct RoutingService<P: RouteProvider> {
    provider: Arc<P>,
    unit_rate: Decimal,
}

impl<P: RouteProvider> RoutingService<P> {
    /// Create a new routing service.
    #[must_use]
    pub fn new(provider: Arc<P>, unit_rate: Decimal) -> Self {
        Self {
            provider,
            unit_rate,
        }
    }

    /// Create a routing service with the per-kilometre rate given as text.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the rate is not a non-negative decimal.
    pub fn with_rate_str(provider: Arc<P>, unit_rate: &str) -> Result<Self, RoutingError> {
        let rate: Decimal = unit_rate
            .trim()
            .parse()
            .map_err(|_| RoutingError::Configuration(format!("invalid unit rate '{unit_rate}'")))?;
        if rate.is_sign_negative() {
            return Err(RoutingError::Configuration(format!(
                "unit rate cannot be negative: {rate}"
            )));
        }
        Ok(Self::new(provider, rate))
    }

    /// Price added per kilometre.
    #[must_use]
    pub fn unit_rate(&self) -> Decimal {
        self.unit_rate
    }

    /// Estimate the driving route between two places.
    ///
    /// Lookup failures are folded into the estimate as an `"N/A"` reason.
    ///
    /// # Errors
    ///
    /// Returns `MissingPlace` if `from` or `to` is blank.
    pub async fn estimate(&self, from: &str, to: &str) -> Result<RouteEstimate, RoutingError> {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() {
            return Err(RoutingError::MissingPlace("from"));
        }
        if to.is_empty() {
            return Err(RoutingError::MissingPlace("to"));
        }

        match self.route(from, to).await {
            Ok(leg) => match (distance_km(leg.distance_m), duration_minutes(leg.duration_s)) {
                (Some(km), Some(min)) => {
                    debug!(from, to, distance_km = %km, duration_min = min, "route estimated");
                    Ok(RouteEstimate {
                        distance_km: Some(km),
                        duration_min: Some(min),
                        error: None,
                    })
                }
                _ => Ok(RouteEstimate::unavailable(RoutingError::NoRoute.display_message())),
            },
            Err(e) => {
                warn!(from, to, error = %e, "route estimate unavailable");
                Ok(RouteEstimate::unavailable(e.display_message()))
            }
        }
    }

    /// Estimate the route and price the products for it.
    ///
    /// # Errors
    ///
    /// Returns `MissingPlace` if `from` or `to` is blank.
    pub async fn quote(
        &self,
        from: &str,
        to: &str,
        products: Vec<Product>,
    ) -> Result<RouteQuote, RoutingError> {
        let estimate = self.estimate(from, to).await?;
        Ok(RouteQuote::new(estimate, self.unit_rate, products))
    }

    async fn route(&self, from: &str, to: &str) -> Result<RouteLeg, RoutingError> {
        let origin = self.locate(from).await?;
        let destination = self.locate(to).await?;

        self.provider
            .directions(origin, destination)
            .await?
            .ok_or(RoutingError::NoRoute)
    }

    async fn locate(&self, place: &str) -> Result<Coordinates, RoutingError> {
        if let Some(coordinates) = Coordinates::parse_pair(place) {
            return Ok(coordinates);
        }
        self.provider
            .geocode(place)
            .await?
            .ok_or_else(|| RoutingError::PlaceNotFound(place.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use uuid::Uuid;

    /// In-memory provider with fixed answers.
    #[derive(Default)]
    struct FakeProvider {
        places: HashMap<String, Coordinates>,
        leg: Option<RouteLeg>,
        fail: bool,
    }

    impl FakeProvider {
        fn with_places() -> Self {
            let mut places = HashMap::new();
            places.insert("Airport".to_string(), Coordinates { lng: 13.5, lat: 52.36 });
            places.insert("Harbour".to_string(), Coordinates { lng: 13.4, lat: 52.52 });
            Self {
                places,
                leg: Some(RouteLeg {
                    distance_m: 12_340.0,
                    duration_s: 1_530.0,
                }),
                fail: false,
            }
        }
    }

    impl RouteProvider for FakeProvider {
        async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, RoutingError> {
            if self.fail {
                return Err(RoutingError::Upstream("connection refused".to_string()));
            }
            Ok(self.places.get(place).copied())
        }

        async fn directions(
            &self,
            _from: Coordinates,
            _to: Coordinates,
        ) -> Result<Option<RouteLeg>, RoutingError> {
            Ok(self.leg)
        }
    }

    fn product(price: Decimal) -> Product {
        Product {
            id: Uuid::new_v4(),
            product_name: "Sedan".to_string(),
            description: "Four doors".to_string(),
            price,
            images: vec!["a.jpg".to_string()],
            owner_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn service(provider: FakeProvider) -> RoutingService<FakeProvider> {
        RoutingService::new(Arc::new(provider), dec!(2))
    }

    #[tokio::test]
    async fn test_quote_prices_by_distance() {
        let svc = service(FakeProvider::with_places());

        let quote = svc
            .quote("Airport", "Harbour", vec![product(dec!(80))])
            .await
            .unwrap();

        assert_eq!(quote.distance, "12.34");
        assert_eq!(quote.duration, "26");
        assert_eq!(quote.listings[0].price, dec!(104.68));
        assert!(quote.error.is_none());
    }

    #[tokio::test]
    async fn test_coordinates_skip_geocoding() {
        let svc = service(FakeProvider {
            leg: Some(RouteLeg {
                distance_m: 5_000.0,
                duration_s: 600.0,
            }),
            ..FakeProvider::default()
        });

        let estimate = svc.estimate("13.4,52.5", "13.5,52.4").await.unwrap();

        assert_eq!(estimate.distance_km, Some(dec!(5.00)));
        assert_eq!(estimate.duration_min, Some(10));
    }

    #[tokio::test]
    async fn test_no_route_degrades_to_not_available() {
        let mut provider = FakeProvider::with_places();
        provider.leg = None;
        let svc = service(provider);

        let quote = svc
            .quote("Airport", "Harbour", vec![product(dec!(80))])
            .await
            .unwrap();

        assert_eq!(quote.distance, "N/A");
        assert_eq!(quote.duration, "N/A");
        assert_eq!(quote.listings[0].price, dec!(80));
        assert_eq!(
            quote.error.as_deref(),
            Some("Could not find a route between the selected locations")
        );
    }

    #[tokio::test]
    async fn test_unknown_place_and_upstream_failure_degrade() {
        let svc = service(FakeProvider::with_places());
        let unknown = svc.estimate("Atlantis", "Harbour").await.unwrap();
        assert!(unknown.error.unwrap().contains("Atlantis"));

        let mut failing = FakeProvider::with_places();
        failing.fail = true;
        let down = service(failing).estimate("Airport", "Harbour").await.unwrap();
        assert_eq!(down.distance_km, None);
        assert_eq!(
            down.error.as_deref(),
            Some("An error occurred during route calculation")
        );
    }

    #[tokio::test]
    async fn test_blank_place_is_rejected() {
        let svc = service(FakeProvider::with_places());

        assert!(matches!(
            svc.estimate("  ", "Harbour").await,
            Err(RoutingError::MissingPlace("from"))
        ));
        assert!(matches!(
            svc.estimate("Airport", "").await,
            Err(RoutingError::MissingPlace("to"))
        ));
    }

    #[test]
    fn test_unit_rate_from_config_text() {
        let provider = Arc::new(FakeProvider::default());

        assert_eq!(
            RoutingService::with_rate_str(provider.clone(), "2.5").unwrap().unit_rate(),
            dec!(2.5)
        );
        assert!(RoutingService::with_rate_str(provider.clone(), "-1").is_err());
        assert!(RoutingService::with_rate_str(provider, "two").is_err());
    }
}
