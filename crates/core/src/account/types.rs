//! Account domain types.

use chrono::{DateTime, Utc};
use ridebook_shared::auth::{AccountView, UserSummary};
use uuid::Uuid;

use super::Role;

/// A registered account. The company name is the tenant boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account ID.
    pub id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Normalized (lowercase) email, unique.
    pub email: String,
    /// Normalized company slug, unique.
    pub company_name: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Role.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Public projection, without the password hash.
    #[must_use]
    pub fn view(&self) -> AccountView {
        AccountView {
            id: self.id,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            company_name: self.company_name.clone(),
            role: self.role.to_string(),
        }
    }

    /// Row shown in the superadmin user list.
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            role: self.role.to_string(),
        }
    }
}

/// Input for persisting a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Normalized email.
    pub email: String,
    /// Normalized company slug.
    pub company_name: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Role.
    pub role: Role,
}

/// Validated superadmin changes to an account.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    /// New normalized email.
    pub email: Option<String>,
    /// New role.
    pub role: Option<Role>,
}
