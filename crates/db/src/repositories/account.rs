//! Account repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::entities::{accounts, sea_orm_active_enums::AccountRole};
use ridebook_core::account::{
    Account, AccountChanges, AccountError, AccountRepository as AccountRepoTrait, NewAccount,
    Role,
};

/// Account repository implementation.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl AccountRepoTrait for AccountRepository {
    async fn create(&self, input: NewAccount) -> Result<Account, AccountError> {
        let now = chrono::Utc::now().into();
        let active_model = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            company_name: Set(input.company_name),
            password_hash: Set(input.password_hash),
            role: Set(to_db_role(input.role)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_error)?;
        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccountError> {
        let model = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn find_by_company(&self, company_name: &str) -> Result<Option<Account>, AccountError> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::CompanyName.eq(company_name))
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list(&self) -> Result<Vec<Account>, AccountError> {
        let models = accounts::Entity::find()
            .order_by_asc(accounts::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AccountError> {
        let Some(existing) = accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AccountError::repository(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut active_model: accounts::ActiveModel = existing.into();
        if let Some(email) = changes.email {
            active_model.email = Set(email);
        }
        if let Some(role) = changes.role {
            active_model.role = Set(to_db_role(role));
        }

        let model = active_model.update(&self.db).await.map_err(map_write_error)?;
        Ok(Some(to_domain(model)))
    }
}

/// Map unique violations to the domain conflict they represent.
fn map_write_error(err: DbErr) -> AccountError {
    err.sql_err()
        .as_ref()
        .and_then(conflict_for)
        .unwrap_or_else(|| AccountError::repository(err.to_string()))
}

fn conflict_for(err: &SqlErr) -> Option<AccountError> {
    match err {
        SqlErr::UniqueConstraintViolation(detail) if detail.contains("company_name") => {
            Some(AccountError::CompanyTaken)
        }
        SqlErr::UniqueConstraintViolation(detail) if detail.contains("email") => {
            Some(AccountError::EmailTaken)
        }
        _ => None,
    }
}

/// Convert domain role to database enum.
const fn to_db_role(role: Role) -> AccountRole {
    match role {
        Role::User => AccountRole::User,
        Role::Admin => AccountRole::Admin,
        Role::Superadmin => AccountRole::Superadmin,
    }
}

/// Convert database role to domain enum.
const fn from_db_role(role: AccountRole) -> Role {
    match role {
        AccountRole::User => Role::User,
        AccountRole::Admin => Role::Admin,
        AccountRole::Superadmin => Role::Superadmin,
    }
}

/// Convert database model to domain model.
fn to_domain(model: accounts::Model) -> Account {
    Account {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        company_name: model.company_name,
        password_hash: model.password_hash,
        role: from_db_role(model.role),
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}
