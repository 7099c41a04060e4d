//! Accounts, credentials, and role gates.
//!
//! This module provides:
//! - Registration and login rules (email shape, password strength, company slug)
//! - Password hashing with Argon2id
//! - The closed set of account roles and the exact-match role gate

mod error;
mod password;
mod service;
mod types;
pub(crate) mod validation;

pub use error::AccountError;
pub use password::{PasswordError, hash_password, verify_password};
pub use service::{AccountRepository, AccountService};
pub use types::{Account, AccountChanges, NewAccount};
pub use validation::{normalize_company_name, normalize_email, validate_password};

use serde::{Deserialize, Serialize};

/// Account roles. There is no hierarchy between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform user without a company catalog.
    User,
    /// Company owner: manages its products and bookings.
    Admin,
    /// Platform operator: manages account roles.
    Superadmin,
}

impl Role {
    /// Wire and storage name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }

    pub(crate) const fn plural_label(self) -> &'static str {
        match self {
            Self::User => "Users",
            Self::Admin => "Admins",
            Self::Superadmin => "Superadmins",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            other => Err(AccountError::InvalidRole(other.to_string())),
        }
    }
}

/// Fails unless the verified role is exactly `required`.
///
/// `superadmin` does not pass an `admin` gate and `admin` does not pass a
/// `user` gate.
pub fn require_role(verified: &str, required: Role) -> Result<(), AccountError> {
    if verified == required.as_str() {
        Ok(())
    } else {
        Err(AccountError::RoleRequired(required))
    }
}
