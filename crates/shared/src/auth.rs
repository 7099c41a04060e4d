//! Authentication types for session tokens and account payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: Uuid,
    /// Account role (`user`, `admin` or `superadmin`).
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(account_id: Uuid, role: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Account email.
    pub email: String,
    /// Company display name; normalized into the tenant slug.
    pub company_name: String,
    /// Plaintext password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed session token.
    pub token: String,
    /// Account role.
    pub role: String,
    /// Account ID (named after the admin that owns the company).
    pub admin_id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Normalized company name.
    pub company_name: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Public projection of an account. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    /// Account ID.
    pub id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Normalized company name.
    pub company_name: String,
    /// Role.
    pub role: String,
}

/// Account row as listed to the superadmin.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    /// Account ID.
    pub id: Uuid,
    /// Email.
    pub email: String,
    /// Role.
    pub role: String,
}

/// Superadmin update of an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    /// New email (optional).
    pub email: Option<String>,
    /// New role (optional).
    pub role: Option<String>,
}
