//! Account service implementation.

use std::sync::Arc;

use ridebook_shared::auth::{RegisterRequest, UpdateUserRequest};
use tracing::{info, warn};
use uuid::Uuid;

use super::Role;
use super::error::AccountError;
use super::password::{burn_verification, hash_password, verify_password};
use super::types::{Account, AccountChanges, NewAccount};
use super::validation::{
    MAX_NAME_LEN, check_length, normalize_company_name, normalize_email, validate_password,
};

/// Repository trait for account persistence.
///
/// Implemented by the db crate. `create` and `update` must report unique
/// violations as `EmailTaken` / `CompanyTaken`.
pub trait AccountRepository: Send + Sync {
    /// Insert a new account.
    fn create(
        &self,
        input: NewAccount,
    ) -> impl std::future::Future<Output = Result<Account, AccountError>> + Send;

    /// Find account by ID.
    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Account>, AccountError>> + Send;

    /// Find account by normalized email.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<Account>, AccountError>> + Send;

    /// Find account by company slug.
    fn find_by_company(
        &self,
        company_name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Account>, AccountError>> + Send;

    /// List every account, oldest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Account>, AccountError>> + Send;

    /// Apply changes. Returns `None` if the account does not exist.
    fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> impl std::future::Future<Output = Result<Option<Account>, AccountError>> + Send;
}

/// Registration, login, and superadmin account management.
pub struct AccountService<R: AccountRepository> {
    repo: Arc<R>,
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, AccountError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AccountError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

impl<R: AccountRepository> AccountService<R> {
    /// Create a new account service.
    #[must_use]
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Register a company owner. New accounts always get the `admin` role.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A field is blank, the email is malformed, or the password is weak
    /// - The company name does not normalize into a slug
    /// - The email or company is already registered
    pub async fn register(&self, input: RegisterRequest) -> Result<Account, AccountError> {
        let first_name = required(&input.first_name, "firstName")?.to_string();
        let last_name = required(&input.last_name, "lastName")?.to_string();
        check_length("firstName", &first_name, MAX_NAME_LEN)?;
        check_length("lastName", &last_name, MAX_NAME_LEN)?;
        required(&input.email, "email")?;
        required(&input.company_name, "companyName")?;
        if input.password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        let email = normalize_email(&input.email)?;
        validate_password(&input.password)?;
        let company_name = normalize_company_name(&input.company_name)?;

        self.create_account(
            first_name,
            last_name,
            email,
            company_name,
            &input.password,
            Role::Admin,
        )
        .await
    }

    /// Create the platform superadmin, or promote the account that already
    /// holds the email.
    ///
    /// Returns `None` when the account is already a superadmin.
    ///
    /// # Errors
    ///
    /// Returns an error if the inputs are invalid or persistence fails.
    pub async fn ensure_superadmin(
        &self,
        email: &str,
        password: &str,
        company_name: &str,
    ) -> Result<Option<Account>, AccountError> {
        let email = normalize_email(email)?;
        if let Some(existing) = self.repo.find_by_email(&email).await? {
            if existing.role == Role::Superadmin {
                return Ok(None);
            }
            let changes = AccountChanges {
                email: None,
                role: Some(Role::Superadmin),
            };
            let promoted = self
                .repo
                .update(existing.id, changes)
                .await?
                .ok_or(AccountError::NotFound(existing.id))?;
            info!(account_id = %promoted.id, "account promoted to superadmin");
            return Ok(Some(promoted));
        }
        validate_password(password)?;
        let company_name = normalize_company_name(company_name)?;

        self.create_account(
            "Platform".to_string(),
            "Superadmin".to_string(),
            email,
            company_name,
            password,
            Role::Superadmin,
        )
        .await
        .map(Some)
    }

    async fn create_account(
        &self,
        first_name: String,
        last_name: String,
        email: String,
        company_name: String,
        password: &str,
        role: Role,
    ) -> Result<Account, AccountError> {
        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }
        if self.repo.find_by_company(&company_name).await?.is_some() {
            return Err(AccountError::CompanyTaken);
        }

        let password_hash = hash_password(password)?;
        let account = self
            .repo
            .create(NewAccount {
                first_name,
                last_name,
                email,
                company_name,
                password_hash,
                role,
            })
            .await?;

        info!(
            account_id = %account.id,
            company = %account.company_name,
            role = %account.role,
            "account registered"
        );
        Ok(account)
    }

    /// Check credentials and return the matching account.
    ///
    /// Unknown emails and wrong passwords fail identically.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredentials` on any mismatch.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let Ok(email) = normalize_email(email) else {
            burn_verification(password);
            return Err(AccountError::InvalidCredentials);
        };

        let Some(account) = self.repo.find_by_email(&email).await? else {
            burn_verification(password);
            return Err(AccountError::InvalidCredentials);
        };

        if verify_password(password, &account.password_hash)? {
            Ok(account)
        } else {
            warn!(account_id = %account.id, "failed login attempt");
            Err(AccountError::InvalidCredentials)
        }
    }

    /// Load the account a verified token refers to.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account no longer exists.
    pub async fn profile(&self, id: Uuid) -> Result<Account, AccountError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id))
    }

    /// List all accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository fails.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AccountError> {
        self.repo.list().await
    }

    /// Change an account's email and/or role.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is malformed or the role is unknown
    /// - The email belongs to another account
    /// - The account does not exist
    pub async fn update_account(
        &self,
        id: Uuid,
        input: UpdateUserRequest,
    ) -> Result<Account, AccountError> {
        let email = input.email.as_deref().map(normalize_email).transpose()?;
        let role = input
            .role
            .as_deref()
            .map(|r| r.trim().parse::<Role>())
            .transpose()?;

        if let Some(email) = &email
            && let Some(other) = self.repo.find_by_email(email).await?
            && other.id != id
        {
            return Err(AccountError::EmailTaken);
        }

        let updated = self
            .repo
            .update(id, AccountChanges { email, role })
            .await?
            .ok_or(AccountError::NotFound(id))?;

        info!(account_id = %id, role = %updated.role, "account updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock repository for testing.
    #[derive(Default)]
    struct MockAccountRepository {
        accounts: Mutex<HashMap<Uuid, Account>>,
    }

    impl AccountRepository for MockAccountRepository {
        async fn create(&self, input: NewAccount) -> Result<Account, AccountError> {
            let account = Account {
                id: Uuid::new_v4(),
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                company_name: input.company_name,
                password_hash: input.password_hash,
                role: input.role,
                created_at: Utc::now(),
            };
            self.accounts
                .lock()
                .unwrap()
                .insert(account.id, account.clone());
            Ok(account)
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccountError> {
            Ok(self.accounts.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .values()
                .find(|a| a.email == email)
                .cloned())
        }

        async fn find_by_company(
            &self,
            company_name: &str,
        ) -> Result<Option<Account>, AccountError> {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .values()
                .find(|a| a.company_name == company_name)
                .cloned())
        }

        async fn list(&self) -> Result<Vec<Account>, AccountError> {
            let mut all: Vec<Account> = self.accounts.lock().unwrap().values().cloned().collect();
            all.sort_by_key(|a| a.created_at);
            Ok(all)
        }

        async fn update(
            &self,
            id: Uuid,
            changes: AccountChanges,
        ) -> Result<Option<Account>, AccountError> {
            let mut accounts = self.accounts.lock().unwrap();
            let Some(account) = accounts.get_mut(&id) else {
                return Ok(None);
            };
            if let Some(email) = changes.email {
                account.email = email;
            }
            if let Some(role) = changes.role {
                account.role = role;
            }
            Ok(Some(account.clone()))
        }
    }

    fn service() -> AccountService<MockAccountRepository> {
        AccountService::new(Arc::new(MockAccountRepository::default()))
    }

    fn registration(email: &str, company: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            company_name: company.to_string(),
            password: "Acme!2024".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_normalizes_and_assigns_admin() {
        let svc = service();

        let account = svc
            .register(registration("  Ada@Acme.Test", "Acme Rentals"))
            .await
            .unwrap();

        assert_eq!(account.email, "ada@acme.test");
        assert_eq!(account.company_name, "acme-rentals");
        assert_eq!(account.role, Role::Admin);
        assert!(account.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let svc = service();
        svc.register(registration("ada@acme.test", "acme")).await.unwrap();

        let first = svc.register(registration("ADA@acme.test", "other")).await;
        let second = svc.register(registration("ada@acme.test", "third")).await;

        assert!(matches!(first, Err(AccountError::EmailTaken)));
        assert!(matches!(second, Err(AccountError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_register_duplicate_company_conflicts() {
        let svc = service();
        svc.register(registration("ada@acme.test", "Acme")).await.unwrap();

        let result = svc.register(registration("bob@acme.test", "acme")).await;

        assert!(matches!(result, Err(AccountError::CompanyTaken)));
    }

    #[tokio::test]
    async fn test_register_rejects_bad_input() {
        let svc = service();

        let mut blank = registration("ada@acme.test", "acme");
        blank.first_name = "  ".to_string();
        assert!(matches!(
            svc.register(blank).await,
            Err(AccountError::MissingField("firstName"))
        ));

        let mut long = registration("ada@acme.test", "acme");
        long.last_name = "L".repeat(101);
        assert!(matches!(
            svc.register(long).await,
            Err(AccountError::TooLong { field: "lastName", max: 100 })
        ));

        let mut weak = registration("ada@acme.test", "acme");
        weak.password = "password".to_string();
        assert!(matches!(svc.register(weak).await, Err(AccountError::WeakPassword)));

        assert!(matches!(
            svc.register(registration("not-an-email", "acme")).await,
            Err(AccountError::InvalidEmail)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_success_and_case_insensitive_email() {
        let svc = service();
        let created = svc.register(registration("ada@acme.test", "acme")).await.unwrap();

        let account = svc.authenticate("ADA@Acme.test ", "Acme!2024").await.unwrap();

        assert_eq!(account.id, created.id);
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_fail_identically() {
        let svc = service();
        svc.register(registration("ada@acme.test", "acme")).await.unwrap();

        let unknown = svc
            .authenticate("nobody@acme.test", "Acme!2024")
            .await
            .unwrap_err();
        let wrong = svc
            .authenticate("ada@acme.test", "Wrong!2024")
            .await
            .unwrap_err();

        assert!(matches!(unknown, AccountError::InvalidCredentials));
        assert!(matches!(wrong, AccountError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_profile_not_found() {
        let svc = service();
        let id = Uuid::new_v4();

        assert!(matches!(svc.profile(id).await, Err(AccountError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_update_account_role_and_email() {
        let svc = service();
        let account = svc.register(registration("ada@acme.test", "acme")).await.unwrap();

        let updated = svc
            .update_account(
                account.id,
                UpdateUserRequest {
                    email: Some("Ada.New@Acme.test".to_string()),
                    role: Some("superadmin".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "ada.new@acme.test");
        assert_eq!(updated.role, Role::Superadmin);
    }

    #[tokio::test]
    async fn test_update_account_rejects_unknown_role_and_taken_email() {
        let svc = service();
        let ada = svc.register(registration("ada@acme.test", "acme")).await.unwrap();
        svc.register(registration("bob@fleet.test", "fleet")).await.unwrap();

        let bad_role = svc
            .update_account(
                ada.id,
                UpdateUserRequest {
                    email: None,
                    role: Some("owner".to_string()),
                },
            )
            .await;
        assert!(matches!(bad_role, Err(AccountError::InvalidRole(_))));

        let taken = svc
            .update_account(
                ada.id,
                UpdateUserRequest {
                    email: Some("bob@fleet.test".to_string()),
                    role: None,
                },
            )
            .await;
        assert!(matches!(taken, Err(AccountError::EmailTaken)));

        let missing = svc
            .update_account(Uuid::new_v4(), UpdateUserRequest::default())
            .await;
        assert!(matches!(missing, Err(AccountError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_ensure_superadmin_is_idempotent() {
        let svc = service();

        let created = svc
            .ensure_superadmin("root@ridebook.test", "Root!2024x", "Ridebook")
            .await
            .unwrap();
        let again = svc
            .ensure_superadmin("root@ridebook.test", "Root!2024x", "Ridebook")
            .await
            .unwrap();

        assert_eq!(created.unwrap().role, Role::Superadmin);
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_ensure_superadmin_promotes_existing_account() {
        let svc = service();
        let admin = svc.register(registration("ops@acme.test", "Acme")).await.unwrap();

        let promoted = svc
            .ensure_superadmin("ops@acme.test", "ignored", "ignored")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(promoted.id, admin.id);
        assert_eq!(promoted.role, Role::Superadmin);
        assert_eq!(svc.profile(admin.id).await.unwrap().role, Role::Superadmin);
    }
}
