//! Media gallery ports and application service.
//!
//! The gallery keeps its canonical rows in the primary store and a copy
//! of each asset at an external media host. The host is best-effort:
//! once a primary row is gone the asset delete may still fail, and the
//! failure is logged rather than surfaced.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use velora_core::{AppError, AppResult, PageRequest};
use velora_domain::{MediaId, MediaResourceType, MediaSortKey, SortDirection, UserId};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// One stored media gallery item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    /// Unique media identifier.
    pub id: MediaId,
    /// The user that uploaded the item.
    pub owner: UserId,
    /// Identifier of the asset at the media host.
    pub public_id: String,
    /// Delivery URL of the asset.
    pub secure_url: String,
    /// File format, when the host reported one.
    pub format: Option<String>,
    /// Asset kind at the media host.
    pub resource_type: MediaResourceType,
    /// Asset size in bytes.
    pub size_bytes: i64,
    /// Pixel width for images and videos.
    pub width: Option<i32>,
    /// Pixel height for images and videos.
    pub height: Option<i32>,
    /// Original client-side file name.
    pub original_name: Option<String>,
    /// Free-form labels attached by the owner.
    pub tags: Vec<String>,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// Input for registering a freshly uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaInput {
    /// Identifier of the asset at the media host.
    pub public_id: String,
    /// Delivery URL of the asset.
    pub secure_url: String,
    /// File format, when the host reported one.
    pub format: Option<String>,
    /// Asset kind at the media host.
    pub resource_type: MediaResourceType,
    /// Asset size in bytes.
    pub size_bytes: i64,
    /// Pixel width for images and videos.
    pub width: Option<i32>,
    /// Pixel height for images and videos.
    pub height: Option<i32>,
    /// Original client-side file name.
    pub original_name: Option<String>,
    /// Free-form labels attached by the owner.
    pub tags: Vec<String>,
}

/// Partial update of owner-editable metadata. `None` leaves the field
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaUpdate {
    /// Replacement original file name.
    pub original_name: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

/// Filtered, sorted and paginated listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaListQuery {
    /// Page to return.
    pub page: PageRequest,
    /// Column to sort by.
    pub sort_by: MediaSortKey,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Restrict to one file format.
    pub format: Option<String>,
    /// Restrict to one asset kind.
    pub resource_type: Option<MediaResourceType>,
    /// Inclusive lower size bound in bytes.
    pub min_size_bytes: Option<i64>,
    /// Inclusive upper size bound in bytes.
    pub max_size_bytes: Option<i64>,
    /// Inclusive lower pixel-width bound.
    pub min_width: Option<i32>,
    /// Inclusive upper pixel-width bound.
    pub max_width: Option<i32>,
    /// Inclusive lower pixel-height bound.
    pub min_height: Option<i32>,
    /// Inclusive upper pixel-height bound.
    pub max_height: Option<i32>,
    /// Only items uploaded at or after this instant.
    pub uploaded_after: Option<DateTime<Utc>>,
    /// Only items uploaded at or before this instant.
    pub uploaded_before: Option<DateTime<Utc>>,
}

impl Default for MediaListQuery {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            sort_by: MediaSortKey::default(),
            sort_direction: SortDirection::default(),
            format: None,
            resource_type: None,
            min_size_bytes: None,
            max_size_bytes: None,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
            uploaded_after: None,
            uploaded_before: None,
        }
    }
}

/// Minimal projection used by set-based deletes: enough to remove the
/// primary row and the host asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedMediaRef {
    /// Unique media identifier.
    pub id: MediaId,
    /// Identifier of the asset at the media host.
    pub public_id: String,
}

/// Repository port over the media gallery table.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Inserts a new gallery row for the owner.
    async fn insert(&self, owner: UserId, input: NewMediaInput) -> AppResult<MediaRecord>;

    /// Finds a gallery row by id, regardless of owner.
    async fn find_by_id(&self, id: MediaId) -> AppResult<Option<MediaRecord>>;

    /// Finds a gallery row by host public id.
    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<MediaRecord>>;

    /// Lists the owner's rows matching the query, with the total count.
    async fn list(
        &self,
        owner: UserId,
        query: &MediaListQuery,
    ) -> AppResult<(Vec<MediaRecord>, u64)>;

    /// Applies a metadata update. Returns `None` if the row no longer
    /// exists.
    async fn update(&self, id: MediaId, update: MediaUpdate) -> AppResult<Option<MediaRecord>>;

    /// Deletes one row. Returns whether a row was removed.
    async fn delete(&self, id: MediaId) -> AppResult<bool>;

    /// Resolves which of the given ids exist and belong to the owner, in
    /// one query.
    async fn find_owned(&self, owner: UserId, ids: &[MediaId]) -> AppResult<Vec<OwnedMediaRef>>;

    /// Deletes the given rows for the owner in one statement, returning
    /// the removed row count.
    async fn delete_owned(&self, owner: UserId, ids: &[MediaId]) -> AppResult<u64>;
}

/// Port for the external media host holding the binary assets.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Deletes one asset at the host.
    async fn delete_asset(
        &self,
        public_id: &str,
        resource_type: MediaResourceType,
    ) -> AppResult<()>;

    /// Deletes a set of assets at the host in one call.
    async fn delete_assets(&self, public_ids: &[String]) -> AppResult<()>;
}

// ---------------------------------------------------------------------------
// Bulk deletion
// ---------------------------------------------------------------------------

/// Tuning knobs for the batched bulk-delete executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkDeleteConfig {
    /// Ids per batch.
    pub batch_size: usize,
    /// Batches allowed to run at once within a wave.
    pub concurrency_limit: usize,
    /// Upper bound on each batch's media-host call.
    pub host_timeout: Duration,
}

impl Default for BulkDeleteConfig {
    fn default() -> Self {
        Self {
            batch_size: 50,
            concurrency_limit: 3,
            host_timeout: Duration::from_secs(10),
        }
    }
}

/// One failed batch inside a bulk deletion.
#[derive(Debug)]
pub struct BulkBatchError {
    /// Zero-based position of the batch in the partition.
    pub batch_index: usize,
    /// Number of ids in the failed batch.
    pub batch_len: usize,
    /// Why the batch failed.
    pub error: AppError,
}

/// Aggregated outcome of a bulk deletion. Partial failure is data, not
/// an error: sibling batches keep their results.
#[derive(Debug, Default)]
pub struct BulkDeleteReport {
    /// Ids the caller asked to delete.
    pub total_requested: usize,
    /// Rows actually removed from the primary store.
    pub deleted: u64,
    /// Batches that failed, in batch order.
    pub errors: Vec<BulkBatchError>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for the media gallery.
#[derive(Clone)]
pub struct MediaService {
    repository: Arc<dyn MediaRepository>,
    host: Arc<dyn MediaHost>,
    bulk_config: BulkDeleteConfig,
}

impl MediaService {
    /// Creates a media service with the default bulk-delete tuning.
    #[must_use]
    pub fn new(repository: Arc<dyn MediaRepository>, host: Arc<dyn MediaHost>) -> Self {
        Self {
            repository,
            host,
            bulk_config: BulkDeleteConfig::default(),
        }
    }

    /// Overrides the bulk-delete tuning.
    #[must_use]
    pub fn with_bulk_config(mut self, bulk_config: BulkDeleteConfig) -> Self {
        self.bulk_config = bulk_config;
        self
    }

    async fn find_owned_record(&self, owner: UserId, id: MediaId) -> AppResult<MediaRecord> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| media_not_found(id))?;

        if record.owner != owner {
            return Err(AppError::Forbidden(
                "media item does not belong to the requesting user".to_owned(),
            ));
        }

        Ok(record)
    }
}

fn media_not_found(id: MediaId) -> AppError {
    AppError::NotFound(format!("media item with id {id} not found"))
}

mod bulk;
mod gallery;

#[cfg(test)]
mod tests;
