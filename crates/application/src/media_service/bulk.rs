//! Batched bulk deletion.
//!
//! Large requests are partitioned into fixed-size batches executed in
//! waves: each wave launches up to `concurrency_limit` batches and is
//! fully awaited before the next wave starts. Batches are isolated, a
//! failing batch never aborts its siblings and is reported alongside
//! the counts of the ones that succeeded.

use tokio::time::timeout;

use super::*;

impl MediaService {
    /// Deletes a set of the owner's gallery items in batches.
    ///
    /// A request that fits in one batch fails hard when its validation
    /// fails, since there is no partial result to report. Larger
    /// requests return a report rather than failing on the first bad
    /// batch; the caller inspects `errors` to detect partial failure.
    /// Batches that contain an unknown or foreign id fail whole,
    /// without touching their siblings.
    pub async fn bulk_delete_media(
        &self,
        owner: UserId,
        ids: &[MediaId],
    ) -> AppResult<BulkDeleteReport> {
        if ids.is_empty() {
            return Err(AppError::Validation(
                "no media ids provided for bulk deletion".to_owned(),
            ));
        }

        let batch_size = self.bulk_config.batch_size.max(1);
        let mut report = BulkDeleteReport {
            total_requested: ids.len(),
            ..BulkDeleteReport::default()
        };

        // Small requests skip the batching machinery entirely. With a
        // single batch there are no sibling results to preserve, so a
        // failed existence/ownership check fails the whole call instead
        // of being folded into the report.
        if ids.len() <= batch_size {
            report.deleted = self.delete_batch(owner, ids.to_vec()).await?;
            return Ok(report);
        }

        let batches: Vec<Vec<MediaId>> = ids.chunks(batch_size).map(<[MediaId]>::to_vec).collect();
        let batch_count = batches.len();
        let concurrency = self.bulk_config.concurrency_limit.max(1);

        for (wave_index, wave) in batches.chunks(concurrency).enumerate() {
            let mut handles = Vec::with_capacity(wave.len());
            for (offset, batch) in wave.iter().enumerate() {
                let batch_index = wave_index * concurrency + offset;
                let batch = batch.clone();
                let service = self.clone();
                handles.push((
                    batch_index,
                    batch.len(),
                    tokio::spawn(async move { service.delete_batch(owner, batch).await }),
                ));
            }

            for (batch_index, batch_len, handle) in handles {
                match handle.await {
                    Ok(Ok(deleted)) => report.deleted += deleted,
                    Ok(Err(error)) => report.errors.push(BulkBatchError {
                        batch_index,
                        batch_len,
                        error,
                    }),
                    Err(join_error) => report.errors.push(BulkBatchError {
                        batch_index,
                        batch_len,
                        error: AppError::Internal(format!("batch task failed: {join_error}")),
                    }),
                }
            }
        }

        tracing::info!(
            owner = %owner,
            total_requested = report.total_requested,
            deleted = report.deleted,
            failed_batches = report.errors.len(),
            batches = batch_count,
            "bulk media deletion finished"
        );

        Ok(report)
    }

    /// Deletes one batch: resolves existence and ownership in a single
    /// query, removes the primary rows, then best-effort removes the
    /// host assets under the configured timeout.
    async fn delete_batch(&self, owner: UserId, ids: Vec<MediaId>) -> AppResult<u64> {
        let owned = self.repository.find_owned(owner, &ids).await?;
        if owned.len() != ids.len() {
            let missing = ids.len() - owned.len();
            return Err(AppError::NotFound(format!(
                "{missing} media items not found or not owned by the requesting user"
            )));
        }

        let deleted = self.repository.delete_owned(owner, &ids).await?;

        let public_ids: Vec<String> = owned.into_iter().map(|asset| asset.public_id).collect();
        match timeout(
            self.bulk_config.host_timeout,
            self.host.delete_assets(&public_ids),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::warn!(
                owner = %owner,
                assets = public_ids.len(),
                %error,
                "media host bulk delete failed; primary records already removed"
            ),
            Err(_) => tracing::warn!(
                owner = %owner,
                assets = public_ids.len(),
                "media host bulk delete timed out; primary records already removed"
            ),
        }

        Ok(deleted)
    }
}
