//! PostgreSQL-backed media gallery repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velora_application::{
    MediaListQuery, MediaRecord, MediaRepository, MediaUpdate, NewMediaInput, OwnedMediaRef,
};
use velora_core::{AppError, AppResult};
use velora_domain::{MediaId, MediaResourceType, UserId};

/// PostgreSQL implementation of the media repository port.
#[derive(Clone)]
pub struct PostgresMediaRepository {
    pool: PgPool,
}

impl PostgresMediaRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MediaRow {
    id: uuid::Uuid,
    owner_id: uuid::Uuid,
    public_id: String,
    secure_url: String,
    format: Option<String>,
    resource_type: String,
    size_bytes: i64,
    width: Option<i32>,
    height: Option<i32>,
    original_name: Option<String>,
    tags: Vec<String>,
    uploaded_at: DateTime<Utc>,
}

impl TryFrom<MediaRow> for MediaRecord {
    type Error = AppError;

    fn try_from(row: MediaRow) -> AppResult<Self> {
        let resource_type: MediaResourceType = row.resource_type.parse().map_err(|_| {
            AppError::Internal(format!(
                "stored resource type '{}' is unknown",
                row.resource_type
            ))
        })?;

        Ok(Self {
            id: MediaId::from_uuid(row.id),
            owner: UserId::from_uuid(row.owner_id),
            public_id: row.public_id,
            secure_url: row.secure_url,
            format: row.format,
            resource_type,
            size_bytes: row.size_bytes,
            width: row.width,
            height: row.height,
            original_name: row.original_name,
            tags: row.tags,
            uploaded_at: row.uploaded_at,
        })
    }
}

mod query;

#[async_trait]
impl MediaRepository for PostgresMediaRepository {
    async fn insert(&self, owner: UserId, input: NewMediaInput) -> AppResult<MediaRecord> {
        let row = sqlx::query_as::<_, MediaRow>(
            r#"
            INSERT INTO media_gallery
                (id, owner_id, public_id, secure_url, format, resource_type,
                 size_bytes, width, height, original_name, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, owner_id, public_id, secure_url, format, resource_type,
                      size_bytes, width, height, original_name, tags, uploaded_at
            "#,
        )
        .bind(MediaId::new().as_uuid())
        .bind(owner.as_uuid())
        .bind(&input.public_id)
        .bind(&input.secure_url)
        .bind(&input.format)
        .bind(input.resource_type.as_str())
        .bind(input.size_bytes)
        .bind(input.width)
        .bind(input.height)
        .bind(&input.original_name)
        .bind(&input.tags)
        .fetch_one(&self.pool)
        .await
        .map_err(public_id_conflict_or_internal)?;

        MediaRecord::try_from(row)
    }

    async fn find_by_id(&self, id: MediaId) -> AppResult<Option<MediaRecord>> {
        let row = sqlx::query_as::<_, MediaRow>(
            r#"
            SELECT id, owner_id, public_id, secure_url, format, resource_type,
                   size_bytes, width, height, original_name, tags, uploaded_at
            FROM media_gallery
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find media item: {error}")))?;

        row.map(MediaRecord::try_from).transpose()
    }

    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<MediaRecord>> {
        let row = sqlx::query_as::<_, MediaRow>(
            r#"
            SELECT id, owner_id, public_id, secure_url, format, resource_type,
                   size_bytes, width, height, original_name, tags, uploaded_at
            FROM media_gallery
            WHERE public_id = $1
            LIMIT 1
            "#,
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find media item by public id: {error}"))
        })?;

        row.map(MediaRecord::try_from).transpose()
    }

    async fn list(
        &self,
        owner: UserId,
        query: &MediaListQuery,
    ) -> AppResult<(Vec<MediaRecord>, u64)> {
        self.list_impl(owner, query).await
    }

    async fn update(&self, id: MediaId, update: MediaUpdate) -> AppResult<Option<MediaRecord>> {
        let row = sqlx::query_as::<_, MediaRow>(
            r#"
            UPDATE media_gallery
            SET original_name = COALESCE($2, original_name),
                tags = COALESCE($3, tags)
            WHERE id = $1
            RETURNING id, owner_id, public_id, secure_url, format, resource_type,
                      size_bytes, width, height, original_name, tags, uploaded_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&update.original_name)
        .bind(&update.tags)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update media item: {error}")))?;

        row.map(MediaRecord::try_from).transpose()
    }

    async fn delete(&self, id: MediaId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM media_gallery WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete media item: {error}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_owned(&self, owner: UserId, ids: &[MediaId]) -> AppResult<Vec<OwnedMediaRef>> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(MediaId::as_uuid).collect();

        let rows: Vec<(uuid::Uuid, String)> = sqlx::query_as(
            "SELECT id, public_id FROM media_gallery WHERE owner_id = $1 AND id = ANY($2)",
        )
        .bind(owner.as_uuid())
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve owned media items: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|(id, public_id)| OwnedMediaRef {
                id: MediaId::from_uuid(id),
                public_id,
            })
            .collect())
    }

    async fn delete_owned(&self, owner: UserId, ids: &[MediaId]) -> AppResult<u64> {
        let uuids: Vec<uuid::Uuid> = ids.iter().map(MediaId::as_uuid).collect();

        let result =
            sqlx::query("DELETE FROM media_gallery WHERE owner_id = $1 AND id = ANY($2)")
                .bind(owner.as_uuid())
                .bind(&uuids)
                .execute(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to delete media items: {error}"))
                })?;

        Ok(result.rows_affected())
    }
}

/// Maps a unique violation on the public id column to `Conflict`.
fn public_id_conflict_or_internal(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        if database_error.code().as_deref() == Some("23505") {
            return AppError::Conflict(
                "a media item with this public id already exists".to_owned(),
            );
        }
    }

    AppError::Internal(format!("failed to insert media item: {error}"))
}
