use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use velora_core::{AppError, AppResult};
use velora_domain::{MediaId, MediaResourceType, UserId};

use super::{
    BulkDeleteConfig, MediaHost, MediaListQuery, MediaRecord, MediaRepository, MediaService,
    MediaUpdate, NewMediaInput, OwnedMediaRef,
};

#[derive(Default)]
struct FakeMediaRepository {
    records: Mutex<Vec<MediaRecord>>,
    active_lookups: AtomicUsize,
    peak_lookups: AtomicUsize,
}

impl FakeMediaRepository {
    async fn insert_record(&self, record: MediaRecord) {
        self.records.lock().await.push(record);
    }

    async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    async fn contains(&self, id: MediaId) -> bool {
        self.records.lock().await.iter().any(|record| record.id == id)
    }

    fn peak_concurrent_lookups(&self) -> usize {
        self.peak_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaRepository for FakeMediaRepository {
    async fn insert(&self, owner: UserId, input: NewMediaInput) -> AppResult<MediaRecord> {
        let record = MediaRecord {
            id: MediaId::new(),
            owner,
            public_id: input.public_id,
            secure_url: input.secure_url,
            format: input.format,
            resource_type: input.resource_type,
            size_bytes: input.size_bytes,
            width: input.width,
            height: input.height,
            original_name: input.original_name,
            tags: input.tags,
            uploaded_at: Utc::now(),
        };
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: MediaId) -> AppResult<Option<MediaRecord>> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn find_by_public_id(&self, public_id: &str) -> AppResult<Option<MediaRecord>> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|record| record.public_id == public_id)
            .cloned())
    }

    async fn list(
        &self,
        owner: UserId,
        query: &MediaListQuery,
    ) -> AppResult<(Vec<MediaRecord>, u64)> {
        let records = self.records.lock().await;
        let matching: Vec<MediaRecord> = records
            .iter()
            .filter(|record| record.owner == owner)
            .filter(|record| {
                query
                    .format
                    .as_deref()
                    .is_none_or(|format| record.format.as_deref() == Some(format))
            })
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .take(query.page.limit() as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, id: MediaId, update: MediaUpdate) -> AppResult<Option<MediaRecord>> {
        let mut records = self.records.lock().await;
        let Some(record) = records.iter_mut().find(|record| record.id == id) else {
            return Ok(None);
        };
        if let Some(original_name) = update.original_name {
            record.original_name = Some(original_name);
        }
        if let Some(tags) = update.tags {
            record.tags = tags;
        }
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: MediaId) -> AppResult<bool> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok(records.len() < before)
    }

    async fn find_owned(&self, owner: UserId, ids: &[MediaId]) -> AppResult<Vec<OwnedMediaRef>> {
        let active = self.active_lookups.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_lookups.fetch_max(active, Ordering::SeqCst);
        // Hold the "query" open long enough for sibling batches to overlap.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let owned = self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| record.owner == owner && ids.contains(&record.id))
            .map(|record| OwnedMediaRef {
                id: record.id,
                public_id: record.public_id.clone(),
            })
            .collect();

        self.active_lookups.fetch_sub(1, Ordering::SeqCst);
        Ok(owned)
    }

    async fn delete_owned(&self, owner: UserId, ids: &[MediaId]) -> AppResult<u64> {
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|record| !(record.owner == owner && ids.contains(&record.id)));
        Ok((before - records.len()) as u64)
    }
}

#[derive(Default)]
struct FakeMediaHost {
    deleted: Mutex<Vec<String>>,
    call_sizes: Mutex<Vec<usize>>,
    fail: bool,
    delay: Option<Duration>,
}

impl FakeMediaHost {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    async fn deleted_public_ids(&self) -> Vec<String> {
        self.deleted.lock().await.clone()
    }

    async fn batch_sizes(&self) -> Vec<usize> {
        self.call_sizes.lock().await.clone()
    }
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn delete_asset(
        &self,
        public_id: &str,
        _resource_type: MediaResourceType,
    ) -> AppResult<()> {
        self.delete_assets(&[public_id.to_owned()]).await
    }

    async fn delete_assets(&self, public_ids: &[String]) -> AppResult<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AppError::Internal("media host unavailable".to_owned()));
        }
        self.call_sizes.lock().await.push(public_ids.len());
        self.deleted.lock().await.extend_from_slice(public_ids);
        Ok(())
    }
}

fn new_input(index: usize) -> NewMediaInput {
    NewMediaInput {
        public_id: format!("gallery/asset-{index}"),
        secure_url: format!("https://media.example/gallery/asset-{index}.jpg"),
        format: Some("jpg".to_owned()),
        resource_type: MediaResourceType::Image,
        size_bytes: 1024,
        width: Some(640),
        height: Some(480),
        original_name: Some(format!("asset-{index}.jpg")),
        tags: Vec::new(),
    }
}

fn service(
    repository: Arc<FakeMediaRepository>,
    host: Arc<FakeMediaHost>,
) -> MediaService {
    MediaService::new(repository, host)
}

async fn seed(
    repository: &FakeMediaRepository,
    owner: UserId,
    count: usize,
) -> Vec<MediaId> {
    let mut ids = Vec::with_capacity(count);
    for index in 0..count {
        let input = new_input(index);
        let record = MediaRecord {
            id: MediaId::new(),
            owner,
            public_id: input.public_id,
            secure_url: input.secure_url,
            format: input.format,
            resource_type: input.resource_type,
            size_bytes: input.size_bytes,
            width: input.width,
            height: input.height,
            original_name: input.original_name,
            tags: input.tags,
            uploaded_at: Utc::now(),
        };
        ids.push(record.id);
        repository.insert_record(record).await;
    }
    ids
}

#[tokio::test]
async fn upload_registers_record_for_owner() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();

    let result = service(repository.clone(), host)
        .upload_media(owner, new_input(1))
        .await;

    assert!(result.is_ok());
    let record = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(record.owner, owner);
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn upload_rejects_duplicate_public_id() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let service = service(repository, host);

    assert!(service.upload_media(owner, new_input(1)).await.is_ok());
    let duplicate = service.upload_media(owner, new_input(1)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn get_media_is_forbidden_for_non_owner() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 1).await;

    let result = service(repository, host)
        .get_media(UserId::new(), ids[0])
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn update_media_replaces_tags() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 1).await;

    let update = MediaUpdate {
        original_name: None,
        tags: Some(vec!["banner".to_owned()]),
    };
    let result = service(repository, host)
        .update_media(owner, ids[0], update)
        .await;

    assert!(result.is_ok());
    let record = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(record.tags, vec!["banner".to_owned()]);
}

#[tokio::test]
async fn delete_media_removes_row_and_host_asset() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 1).await;

    let result = service(repository.clone(), host.clone())
        .delete_media(owner, ids[0])
        .await;

    assert!(result.is_ok());
    assert_eq!(repository.len().await, 0);
    assert_eq!(host.deleted_public_ids().await.len(), 1);
}

#[tokio::test]
async fn delete_media_swallows_host_failure() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::failing());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 1).await;

    let result = service(repository.clone(), host)
        .delete_media(owner, ids[0])
        .await;

    assert!(result.is_ok());
    assert_eq!(repository.len().await, 0);
}

#[tokio::test]
async fn bulk_delete_rejects_empty_id_list() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());

    let result = service(repository, host)
        .bulk_delete_media(UserId::new(), &[])
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn small_request_takes_the_single_batch_path() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 30).await;

    let result = service(repository.clone(), host.clone())
        .bulk_delete_media(owner, &ids)
        .await;

    assert!(result.is_ok());
    let report = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(report.total_requested, 30);
    assert_eq!(report.deleted, 30);
    assert!(report.errors.is_empty());
    assert_eq!(host.batch_sizes().await, vec![30]);
    assert_eq!(repository.len().await, 0);
}

#[tokio::test]
async fn large_request_is_partitioned_into_batches_of_fifty() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 120).await;

    let result = service(repository.clone(), host.clone())
        .bulk_delete_media(owner, &ids)
        .await;

    assert!(result.is_ok());
    let report = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(report.total_requested, 120);
    assert_eq!(report.deleted, 120);
    assert!(report.errors.is_empty());
    assert_eq!(repository.len().await, 0);

    let mut batch_sizes = host.batch_sizes().await;
    batch_sizes.sort_unstable();
    assert_eq!(batch_sizes, vec![20, 50, 50]);
    assert!(repository.peak_concurrent_lookups() <= 3);
}

#[tokio::test]
async fn failing_last_batch_leaves_earlier_batches_deleted() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let mut ids = seed(&repository, owner, 119).await;
    // An id the store has never seen lands in the final short batch.
    ids.push(MediaId::new());

    let result = service(repository.clone(), host)
        .bulk_delete_media(owner, &ids)
        .await;

    assert!(result.is_ok());
    let report = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(report.total_requested, 120);
    assert_eq!(report.deleted, 100);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].batch_index, 2);
    assert_eq!(report.errors[0].batch_len, 20);
    assert!(matches!(report.errors[0].error, AppError::NotFound(_)));
    // The failed batch's rows are untouched.
    assert_eq!(repository.len().await, 19);
}

#[tokio::test]
async fn failing_middle_batch_does_not_abort_siblings() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 120).await;

    let mut requested = ids.clone();
    // Replace one id inside the second batch with an unknown one.
    requested[70] = MediaId::new();

    let result = service(repository.clone(), host)
        .bulk_delete_media(owner, &requested)
        .await;

    assert!(result.is_ok());
    let report = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(report.deleted, 70);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].batch_index, 1);
    // All 50 rows of the failed batch survive, plus the displaced one.
    assert_eq!(repository.len().await, 50);
    assert!(repository.contains(ids[70]).await);
}

#[tokio::test]
async fn single_batch_request_with_unknown_id_fails_hard() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let owner = UserId::new();
    let mut ids = seed(&repository, owner, 4).await;
    ids.push(MediaId::new());

    let result = service(repository.clone(), host)
        .bulk_delete_media(owner, &ids)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(repository.len().await, 4);
}

#[tokio::test]
async fn single_batch_request_for_foreign_ids_fails_hard() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::default());
    let other_owner = UserId::new();
    let ids = seed(&repository, other_owner, 5).await;

    let result = service(repository.clone(), host)
        .bulk_delete_media(UserId::new(), &ids)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(repository.len().await, 5);
}

#[tokio::test]
async fn host_failure_never_rolls_back_primary_deletion() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::failing());
    let owner = UserId::new();
    let ids = seed(&repository, owner, 60).await;

    let result = service(repository.clone(), host)
        .bulk_delete_media(owner, &ids)
        .await;

    assert!(result.is_ok());
    let report = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(report.deleted, 60);
    assert!(report.errors.is_empty());
    assert_eq!(repository.len().await, 0);
}

#[tokio::test]
async fn host_timeout_is_swallowed() {
    let repository = Arc::new(FakeMediaRepository::default());
    let host = Arc::new(FakeMediaHost::slow(Duration::from_millis(100)));
    let owner = UserId::new();
    let ids = seed(&repository, owner, 3).await;

    let config = BulkDeleteConfig {
        host_timeout: Duration::from_millis(10),
        ..BulkDeleteConfig::default()
    };
    let result = service(repository.clone(), host.clone())
        .with_bulk_config(config)
        .bulk_delete_media(owner, &ids)
        .await;

    assert!(result.is_ok());
    let report = result.unwrap_or_else(|_| panic!("test"));
    assert_eq!(report.deleted, 3);
    assert!(report.errors.is_empty());
    assert!(host.deleted_public_ids().await.is_empty());
}

#[tokio::test]
async fn partition_is_exact_for_uneven_sizes() {
    for count in [1_usize, 49, 50, 51, 100, 149, 250] {
        let repository = Arc::new(FakeMediaRepository::default());
        let host = Arc::new(FakeMediaHost::default());
        let owner = UserId::new();
        let ids = seed(&repository, owner, count).await;

        let result = service(repository.clone(), host.clone())
            .bulk_delete_media(owner, &ids)
            .await;

        assert!(result.is_ok());
        let report = result.unwrap_or_else(|_| panic!("test"));
        assert_eq!(report.total_requested, count);
        assert_eq!(report.deleted, count as u64);
        assert!(report.errors.is_empty());
        assert_eq!(repository.len().await, 0);

        let mut deleted = host.deleted_public_ids().await;
        deleted.sort_unstable();
        deleted.dedup();
        assert_eq!(deleted.len(), count);
    }
}
