//! User accounts, registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use velora_core::{AppError, AppResult};
use velora_domain::{EmailAddress, Principal, Role, UserId, UserStatus, validate_password};

/// One stored user account, including the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Display name, if the user provided one.
    pub name: Option<String>,
    /// Argon2 password hash in PHC string form.
    pub password_hash: String,
    /// Currently assigned role.
    pub role: Role,
    /// Account lifecycle state.
    pub status: UserStatus,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a freshly registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    /// Canonical email address.
    pub email: String,
    /// Display name, if the user provided one.
    pub name: Option<String>,
    /// Argon2 password hash in PHC string form.
    pub password_hash: String,
    /// Initial role.
    pub role: Role,
}

/// Repository port over the users table for account lookup and creation.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds an account by canonical email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>>;

    /// Finds an account by id.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Persists a new account. `Conflict` when the email is taken.
    async fn create(&self, record: NewUserRecord) -> AppResult<UserAccount>;
}

/// Port for password hashing and verification. Hashing is CPU-bound and
/// fast enough to stay synchronous.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Application service for registration and credential login.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Creates a user service from a repository and a password hasher.
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Registers a new account with the default `User` role.
    pub async fn register(
        &self,
        email: &str,
        name: Option<String>,
        password: &str,
    ) -> AppResult<Principal> {
        let email = EmailAddress::new(email)?;
        validate_password(password)?;

        if self.repository.find_by_email(email.as_str()).await?.is_some() {
            return Err(AppError::Conflict(
                "an account with this email already exists".to_owned(),
            ));
        }

        let password_hash = self.hasher.hash_password(password)?;
        let account = self
            .repository
            .create(NewUserRecord {
                email: email.as_str().to_owned(),
                name,
                password_hash,
                role: Role::User,
            })
            .await?;

        tracing::info!(user_id = %account.id, "registered new user");
        Ok(principal_for(&account))
    }

    /// Authenticates credentials and returns the session principal.
    ///
    /// Every pre-verification failure collapses into the same
    /// `Unauthorized` so the endpoint cannot be used to enumerate
    /// accounts.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Principal> {
        let email = EmailAddress::new(email).map_err(|_| invalid_credentials())?;

        let Some(account) = self.repository.find_by_email(email.as_str()).await? else {
            return Err(invalid_credentials());
        };

        if !self.hasher.verify_password(password, &account.password_hash)? {
            return Err(invalid_credentials());
        }

        if account.status != UserStatus::Active {
            return Err(AppError::Unauthorized("account is not active".to_owned()));
        }

        tracing::info!(user_id = %account.id, "user logged in");
        Ok(principal_for(&account))
    }

    /// Returns the principal for an existing account id.
    pub async fn principal_by_id(&self, user_id: UserId) -> AppResult<Principal> {
        let account = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user with id {user_id} not found")))?;

        Ok(principal_for(&account))
    }
}

fn principal_for(account: &UserAccount) -> Principal {
    let display_name = account
        .name
        .clone()
        .unwrap_or_else(|| account.email.clone());
    Principal::new(account.id, account.email.clone(), display_name, account.role)
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("invalid email or password".to_owned())
}

#[cfg(test)]
mod tests {
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct FakeUserRepository {
        accounts: Mutex<Vec<UserAccount>>,
    }

    impl FakeUserRepository {
        async fn insert(&self, account: UserAccount) {
            self.accounts.lock().await.push(account);
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepository {
        async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
            Ok(self
                .accounts
                .lock()
                .await
                .iter()
                .find(|account| account.email == email)
                .cloned())
        }

        async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
            Ok(self
                .accounts
                .lock()
                .await
                .iter()
                .find(|account| account.id == user_id)
                .cloned())
        }

        async fn create(&self, record: NewUserRecord) -> AppResult<UserAccount> {
            let account = UserAccount {
                id: UserId::new(),
                email: record.email,
                name: record.name,
                password_hash: record.password_hash,
                role: record.role,
                status: UserStatus::Active,
                created_at: Utc::now(),
            };
            self.accounts.lock().await.push(account.clone());
            Ok(account)
        }
    }

    struct FakePasswordHasher;

    impl PasswordHasher for FakePasswordHasher {
        fn hash_password(&self, password: &str) -> AppResult<String> {
            Ok(format!("hashed:{password}"))
        }

        fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    fn service(repository: Arc<FakeUserRepository>) -> UserService {
        UserService::new(repository, Arc::new(FakePasswordHasher))
    }

    fn account(email: &str, password: &str, status: UserStatus) -> UserAccount {
        UserAccount {
            id: UserId::new(),
            email: email.to_owned(),
            name: Some("Existing User".to_owned()),
            password_hash: format!("hashed:{password}"),
            role: Role::User,
            status,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn register_creates_account_with_default_role() {
        let repository = Arc::new(FakeUserRepository::default());
        let result = service(repository)
            .register("New@Velora.dev", Some("New User".to_owned()), "correct horse battery")
            .await;

        assert!(result.is_ok());
        let principal = result.unwrap_or_else(|_| panic!("test"));
        assert_eq!(principal.role(), Role::User);
        assert_eq!(principal.email(), "new@velora.dev");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_case_insensitively() {
        let repository = Arc::new(FakeUserRepository::default());
        repository
            .insert(account("taken@velora.dev", "irrelevant-pass", UserStatus::Active))
            .await;

        let result = service(repository)
            .register("Taken@Velora.DEV", None, "correct horse battery")
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let repository = Arc::new(FakeUserRepository::default());
        let service = service(repository);

        let short = service.register("a@velora.dev", None, "short").await;
        assert!(matches!(short, Err(AppError::Validation(_))));

        let common = service.register("a@velora.dev", None, "password123").await;
        assert!(matches!(common, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn login_returns_principal_for_valid_credentials() {
        let repository = Arc::new(FakeUserRepository::default());
        repository
            .insert(account("user@velora.dev", "correct horse battery", UserStatus::Active))
            .await;

        let result = service(repository)
            .login("user@velora.dev", "correct horse battery")
            .await;

        assert!(result.is_ok());
        let principal = result.unwrap_or_else(|_| panic!("test"));
        assert_eq!(principal.email(), "user@velora.dev");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let repository = Arc::new(FakeUserRepository::default());
        repository
            .insert(account("user@velora.dev", "correct horse battery", UserStatus::Active))
            .await;

        let result = service(repository)
            .login("user@velora.dev", "wrong password entirely")
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email_with_the_same_error() {
        let repository = Arc::new(FakeUserRepository::default());
        let result = service(repository)
            .login("nobody@velora.dev", "correct horse battery")
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn login_rejects_suspended_account() {
        let repository = Arc::new(FakeUserRepository::default());
        repository
            .insert(account(
                "suspended@velora.dev",
                "correct horse battery",
                UserStatus::Suspended,
            ))
            .await;

        let result = service(repository)
            .login("suspended@velora.dev", "correct horse battery")
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
