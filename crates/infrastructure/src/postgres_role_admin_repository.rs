//! PostgreSQL-backed role administration repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velora_application::{BulkRoleUpdate, RoleAdminRepository, UserRoleRecord};
use velora_core::{AppError, AppResult, PageRequest};
use velora_domain::{Role, UserId, UserStatus};

/// PostgreSQL implementation of the role administration port.
#[derive(Clone)]
pub struct PostgresRoleAdminRepository {
    pool: PgPool,
}

impl PostgresRoleAdminRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRoleRow {
    id: uuid::Uuid,
    email: String,
    name: Option<String>,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    role_assigned_at: Option<DateTime<Utc>>,
    role_assigned_by: Option<uuid::Uuid>,
}

impl TryFrom<UserRoleRow> for UserRoleRecord {
    type Error = AppError;

    fn try_from(row: UserRoleRow) -> AppResult<Self> {
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
            role,
            status,
            created_at: row.created_at,
            role_assigned_at: row.role_assigned_at,
            role_assigned_by: row.role_assigned_by.map(UserId::from_uuid),
        })
    }
}

#[async_trait]
impl RoleAdminRepository for PostgresRoleAdminRepository {
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRoleRecord>> {
        let row = sqlx::query_as::<_, UserRoleRow>(
            r#"
            SELECT id, email, name, role, status, created_at,
                   role_assigned_at, role_assigned_by
            FROM users
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user: {error}")))?;

        row.map(UserRoleRecord::try_from).transpose()
    }

    async fn set_role(
        &self,
        user_id: UserId,
        role: Role,
        assigned_by: Option<UserId>,
        assigned_at: DateTime<Utc>,
    ) -> AppResult<Option<UserRoleRecord>> {
        let row = sqlx::query_as::<_, UserRoleRow>(
            r#"
            UPDATE users
            SET role = $2, role_assigned_at = $3, role_assigned_by = $4
            WHERE id = $1
            RETURNING id, email, name, role, status, created_at,
                      role_assigned_at, role_assigned_by
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(role.as_str())
        .bind(assigned_at)
        .bind(assigned_by.map(|id| id.as_uuid()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update user role: {error}")))?;

        row.map(UserRoleRecord::try_from).transpose()
    }

    async fn set_role_bulk(
        &self,
        user_ids: &[UserId],
        role: Role,
        assigned_by: Option<UserId>,
        assigned_at: DateTime<Utc>,
    ) -> AppResult<BulkRoleUpdate> {
        let uuids: Vec<uuid::Uuid> = user_ids.iter().map(UserId::as_uuid).collect();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))?;

        // Lock the rows so the existence check and the update see the
        // same set of users.
        let existing: Vec<uuid::Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1) FOR UPDATE")
                .bind(&uuids)
                .fetch_all(&mut *tx)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to resolve users for bulk update: {error}"))
                })?;

        let missing: Vec<UserId> = user_ids
            .iter()
            .copied()
            .filter(|id| !existing.contains(&id.as_uuid()))
            .collect();

        if !missing.is_empty() {
            tx.rollback().await.map_err(|error| {
                AppError::Internal(format!("failed to roll back bulk update: {error}"))
            })?;
            return Ok(BulkRoleUpdate {
                updated: 0,
                missing,
            });
        }

        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = $2, role_assigned_at = $3, role_assigned_by = $4
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .bind(role.as_str())
        .bind(assigned_at)
        .bind(assigned_by.map(|id| id.as_uuid()))
        .execute(&mut *tx)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bulk update roles: {error}")))?;

        tx.commit()
            .await
            .map_err(|error| AppError::Internal(format!("failed to commit bulk update: {error}")))?;

        Ok(BulkRoleUpdate {
            updated: result.rows_affected(),
            missing: Vec::new(),
        })
    }

    async fn list_users(
        &self,
        roles: Option<&[Role]>,
        page: PageRequest,
    ) -> AppResult<(Vec<UserRoleRecord>, u64)> {
        let role_filter: Option<Vec<String>> =
            roles.map(|roles| roles.iter().map(|role| role.as_str().to_owned()).collect());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::text[] IS NULL OR role = ANY($1))",
        )
        .bind(&role_filter)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count users: {error}")))?;

        let rows = sqlx::query_as::<_, UserRoleRow>(
            r#"
            SELECT id, email, name, role, status, created_at,
                   role_assigned_at, role_assigned_by
            FROM users
            WHERE ($1::text[] IS NULL OR role = ANY($1))
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&role_filter)
        .bind(i64::from(page.limit()))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        let users = rows
            .into_iter()
            .map(UserRoleRecord::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((users, u64::try_from(total).unwrap_or_default()))
    }
}
