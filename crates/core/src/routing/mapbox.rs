//! Mapbox geocoding and directions over HTTP.

use std::time::Duration;

use reqwest::{Client, Url};
use ridebook_shared::config::MapboxConfig;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::RoutingError;
use super::service::RouteProvider;
use super::types::{Coordinates, RouteLeg};

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    center: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    distance: f64,
    duration: f64,
}

impl GeocodingResponse {
    fn first_match(self) -> Option<Coordinates> {
        self.features.into_iter().next().map(|f| Coordinates {
            lng: f.center[0],
            lat: f.center[1],
        })
    }
}

impl DirectionsResponse {
    fn first_route(self) -> Option<RouteLeg> {
        self.routes.into_iter().next().map(|r| RouteLeg {
            distance_m: r.distance,
            duration_s: r.duration,
        })
    }
}

/// Mapbox API client. No retries; every request carries a fixed timeout.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: Client,
    base_url: Url,
    access_token: String,
}

impl MapboxClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &MapboxConfig) -> Result<Self, RoutingError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RoutingError::Configuration(format!("invalid Mapbox base URL: {e}")))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RoutingError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token.clone(),
        })
    }

    /// Whether an access token is configured.
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RoutingError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                RoutingError::Configuration("Mapbox base URL cannot be a base".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, RoutingError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Upstream(format!("Mapbox answered {status}")));
        }
        Ok(response.json::<T>().await?)
    }
}

impl RouteProvider for MapboxClient {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, RoutingError> {
        let file = format!("{place}.json");
        let mut url = self.endpoint(&["geocoding", "v5", "mapbox.places", &file])?;
        url.query_pairs_mut().append_pair("limit", "1");

        let body: GeocodingResponse = self.get_json(url).await?;
        Ok(body.first_match())
    }

    async fn directions(
        &self,
        from: Coordinates,
        to: Coordinates,
    ) -> Result<Option<RouteLeg>, RoutingError> {
        let mut url = self.endpoint(&[
            "directions",
            "v5",
            "mapbox",
            "driving",
            &format!("{from};{to}"),
        ])?;
        url.query_pairs_mut().append_pair("overview", "false");

        let body: DirectionsResponse = self.get_json(url).await?;
        Ok(body.first_route())
    }
}
