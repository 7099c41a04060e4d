//! Routing error types.

use ridebook_shared::AppError;
use thiserror::Error;

/// Routing and geocoding errors.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// `from` or `to` is missing or blank.
    #[error("{0} is required")]
    MissingPlace(&'static str),

    /// Geocoding found nothing for this place.
    #[error("Could not find a location named '{0}'")]
    PlaceNotFound(String),

    /// The directions service returned zero routes.
    #[error("Could not find a route between the selected locations")]
    NoRoute,

    /// The upstream request failed or answered with an error.
    #[error("route service error: {0}")]
    Upstream(String),

    /// Client or pricing configuration is invalid.
    #[error("routing configuration error: {0}")]
    Configuration(String),
}

impl RoutingError {
    /// Snake-case code for API error bodies.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingPlace(_) => "missing_field",
            Self::PlaceNotFound(_) => "place_not_found",
            Self::NoRoute => "no_route",
            Self::Upstream(_) => "upstream_error",
            Self::Configuration(_) => "internal_error",
        }
    }

    /// Message shown to the customer when an estimate degrades to `"N/A"`.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Upstream(_) | Self::Configuration(_) => {
                "An error occurred during route calculation".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL: it carries the access token.
        Self::Upstream(err.without_url().to_string())
    }
}

impl From<RoutingError> for AppError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::MissingPlace(_) => Self::Validation(err.to_string()),
            RoutingError::PlaceNotFound(_) | RoutingError::NoRoute | RoutingError::Upstream(_) => {
                Self::ExternalService(err.to_string())
            }
            RoutingError::Configuration(msg) => Self::Internal(msg),
        }
    }
}
