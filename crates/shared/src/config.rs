//! Application configuration management.
//!
//! Values are layered: `config/default.toml`, then `config/{RUN_MODE}.toml`,
//! then environment variables prefixed `RIDEBOOK__` (e.g.
//! `RIDEBOOK__DATABASE__URL`).

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Image storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Mapbox configuration.
    #[serde(default)]
    pub mapbox: MapboxConfig,
    /// Booking policy.
    #[serde(default)]
    pub booking: BookingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed by CORS (the booking front end).
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Session token expiration in seconds.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: u64,
}

fn default_token_expiry() -> u64 {
    86_400 // 24 hours
}

/// Image storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Root directory for uploaded images (local filesystem provider).
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// Maximum size of one uploaded image, in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// URL prefix the images are served under.
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
    /// S3-compatible bucket. When set, images are written there instead of
    /// the local root and `public_prefix` should point at the bucket's
    /// public URL.
    #[serde(default)]
    pub s3: Option<S3Settings>,
}

/// S3-compatible bucket settings.
#[derive(Debug, Clone, Deserialize)]
pub struct S3Settings {
    /// Endpoint URL.
    pub endpoint: String,
    /// Bucket name.
    pub bucket: String,
    /// Access key ID.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Region.
    #[serde(default = "default_s3_region")]
    pub region: String,
}

fn default_s3_region() -> String {
    "auto".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_file_size: default_max_file_size(),
            public_prefix: default_public_prefix(),
            s3: None,
        }
    }
}

fn default_storage_root() -> String {
    "./images".to_string()
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

/// Mapbox configuration for geocoding and directions.
#[derive(Debug, Clone, Deserialize)]
pub struct MapboxConfig {
    /// Access token.
    #[serde(default)]
    pub access_token: String,
    /// API base URL.
    #[serde(default = "default_mapbox_base_url")]
    pub base_url: String,
    /// Price added per driven kilometre.
    #[serde(default = "default_unit_rate")]
    pub unit_rate: String,
    /// Request timeout in seconds.
    #[serde(default = "default_mapbox_timeout")]
    pub timeout_secs: u64,
}

impl Default for MapboxConfig {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            base_url: default_mapbox_base_url(),
            unit_rate: default_unit_rate(),
            timeout_secs: default_mapbox_timeout(),
        }
    }
}

fn default_mapbox_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn default_unit_rate() -> String {
    "2".to_string()
}

fn default_mapbox_timeout() -> u64 {
    10
}

/// Booking policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingConfig {
    /// Reject bookings whose dates overlap an active booking of the same company.
    #[serde(default = "default_reject_overlaps")]
    pub reject_overlaps: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            reject_overlaps: default_reject_overlaps(),
        }
    }
}

fn default_reject_overlaps() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("RIDEBOOK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        config.try_deserialize()
    }
}
