//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication middleware and role gates
//! - Static serving of locally stored product images
//! - Error-to-response mapping and JSON-rejecting extractors

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit, http::HeaderValue};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use ridebook_core::booking::BookingPolicy;
use ridebook_core::routing::{MapboxClient, RoutingService};
use ridebook_core::storage::{ImageStore, StorageConfig};
use ridebook_shared::{AppConfig, AppError, JwtConfig, JwtService};

/// Images accepted in one product form.
const MAX_IMAGES_PER_REQUEST: u64 = 10;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Product image store.
    pub images: Arc<ImageStore>,
    /// Route estimates and distance pricing.
    pub routing: Arc<RoutingService<MapboxClient>>,
    /// Booking rules.
    pub booking_policy: BookingPolicy,
    /// Origin allowed by CORS.
    pub cors_origin: String,
    /// URL prefix locally stored images are served under.
    pub uploads_prefix: String,
}

impl AppState {
    /// Build the state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the image store or the routing client cannot be
    /// configured.
    pub fn from_config(db: DatabaseConnection, config: &AppConfig) -> Result<Self, AppError> {
        let jwt_service = JwtService::new(JwtConfig {
            secret: config.jwt.secret.clone(),
            token_expires_secs: i64::try_from(config.jwt.token_expiry_secs).unwrap_or(i64::MAX),
        });

        let images = ImageStore::from_config(StorageConfig::from_settings(&config.storage))?;

        let mapbox = MapboxClient::from_config(&config.mapbox)?;
        if !mapbox.has_token() {
            warn!("mapbox access token is not set, route quotes will be unavailable");
        }
        let routing = RoutingService::with_rate_str(Arc::new(mapbox), &config.mapbox.unit_rate)?;

        Ok(Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            images: Arc::new(images),
            routing: Arc::new(routing),
            booking_policy: BookingPolicy {
                reject_overlaps: config.booking.reject_overlaps,
            },
            cors_origin: config.server.cors_origin.clone(),
            uploads_prefix: config.storage.public_prefix.clone(),
        })
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let max_body = state
        .images
        .config()
        .max_file_size
        .saturating_mul(MAX_IMAGES_PER_REQUEST);

    let mut router = Router::new()
        .merge(routes::health::routes())
        .nest("/api", routes::api_routes_with_state(state.clone()));

    if let Some(root) = state.images.config().provider.local_root() {
        router = router.nest_service(&state.uploads_prefix, ServeDir::new(root));
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            usize::try_from(max_body).unwrap_or(usize::MAX),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.cors_origin))
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!(origin, "invalid CORS origin, cross-origin requests will be refused");
            layer
        }
    }
}
