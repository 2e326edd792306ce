//! PostgreSQL-backed user account repository.

use async_trait::async_trait;
use sqlx::PgPool;

use velora_application::{NewUserRecord, UserAccount, UserRepository};
use velora_core::{AppError, AppResult};
use velora_domain::{Role, UserId, UserStatus};

/// PostgreSQL implementation of the user repository port.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    email: String,
    name: Option<String>,
    password_hash: String,
    role: String,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<AccountRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: AccountRow) -> AppResult<Self> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| AppError::Internal(format!("stored role '{}' is unknown", row.role)))?;
        let status: UserStatus = row.status.parse().map_err(|_| {
            AppError::Internal(format!("stored status '{}' is unknown", row.status))
        })?;

        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            role,
            status,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, name, password_hash, role, status, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, name, password_hash, role, status, created_at
            FROM users
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by id: {error}")))?;

        row.map(UserAccount::try_from).transpose()
    }

    async fn create(&self, record: NewUserRecord) -> AppResult<UserAccount> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, name, password_hash, role, status, created_at
            "#,
        )
        .bind(UserId::new().as_uuid())
        .bind(&record.email)
        .bind(&record.name)
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(UserStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(email_conflict_or_internal)?;

        UserAccount::try_from(row)
    }
}

/// Maps a unique violation on the email column to `Conflict`; everything
/// else stays `Internal`.
fn email_conflict_or_internal(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        if database_error.code().as_deref() == Some("23505") {
            return AppError::Conflict("an account with this email already exists".to_owned());
        }
    }

    AppError::Internal(format!("failed to create user: {error}"))
}
