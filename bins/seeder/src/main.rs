//! Superadmin bootstrap for Ridebook.
//!
//! Registration only ever creates admins, so this is the one way a
//! superadmin comes into existence. Re-running it is harmless.
//!
//! Usage: `seeder` with `DATABASE_URL`, `SUPERADMIN_EMAIL`,
//! `SUPERADMIN_PASSWORD` and `SUPERADMIN_COMPANY` set.

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use ridebook_core::account::AccountService;
use ridebook_db::AccountRepository;

fn required_var(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set in environment"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ridebook=info,seeder=info".into()),
        )
        .init();

    let database_url = required_var("DATABASE_URL")?;
    let email = required_var("SUPERADMIN_EMAIL")?;
    let password = required_var("SUPERADMIN_PASSWORD")?;
    let company = std::env::var("SUPERADMIN_COMPANY").unwrap_or_else(|_| "ridebook".to_string());

    info!("Connecting to database...");
    let db = ridebook_db::connect(&database_url).await?;

    let service = AccountService::new(Arc::new(AccountRepository::new(db)));
    match service.ensure_superadmin(&email, &password, &company).await? {
        Some(account) => {
            info!(account_id = %account.id, email = %account.email, "Superadmin ready");
        }
        None => info!(email = %email, "Superadmin already exists, nothing to do"),
    }

    Ok(())
}
