use tokio::time::timeout;

use velora_core::PageInfo;

use super::*;

impl MediaService {
    /// Registers an uploaded asset in the gallery.
    pub async fn upload_media(&self, owner: UserId, input: NewMediaInput) -> AppResult<MediaRecord> {
        if input.public_id.trim().is_empty() {
            return Err(AppError::Validation(
                "media public id must not be empty".to_owned(),
            ));
        }

        if self
            .repository
            .find_by_public_id(&input.public_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "media item with public id '{}' already exists",
                input.public_id
            )));
        }

        let record = self.repository.insert(owner, input).await?;
        tracing::info!(
            media_id = %record.id,
            owner = %record.owner,
            public_id = %record.public_id,
            "registered media item"
        );
        Ok(record)
    }

    /// Returns one of the owner's gallery items.
    pub async fn get_media(&self, owner: UserId, id: MediaId) -> AppResult<MediaRecord> {
        self.find_owned_record(owner, id).await
    }

    /// Lists the owner's gallery items matching the query.
    pub async fn list_media(
        &self,
        owner: UserId,
        query: &MediaListQuery,
    ) -> AppResult<(Vec<MediaRecord>, PageInfo)> {
        if let (Some(min), Some(max)) = (query.min_size_bytes, query.max_size_bytes) {
            if min > max {
                return Err(AppError::Validation(
                    "minimum size bound exceeds maximum size bound".to_owned(),
                ));
            }
        }

        let (records, total) = self.repository.list(owner, query).await?;
        Ok((records, PageInfo::new(query.page, total)))
    }

    /// Applies a metadata update to one of the owner's gallery items.
    pub async fn update_media(
        &self,
        owner: UserId,
        id: MediaId,
        update: MediaUpdate,
    ) -> AppResult<MediaRecord> {
        self.find_owned_record(owner, id).await?;

        self.repository
            .update(id, update)
            .await?
            .ok_or_else(|| media_not_found(id))
    }

    /// Deletes one of the owner's gallery items, then best-effort removes
    /// the asset at the media host.
    pub async fn delete_media(&self, owner: UserId, id: MediaId) -> AppResult<()> {
        let record = self.find_owned_record(owner, id).await?;

        if !self.repository.delete(id).await? {
            return Err(media_not_found(id));
        }

        match timeout(
            self.bulk_config.host_timeout,
            self.host
                .delete_asset(&record.public_id, record.resource_type),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::warn!(
                media_id = %id,
                public_id = %record.public_id,
                %error,
                "media host delete failed; primary record already removed"
            ),
            Err(_) => tracing::warn!(
                media_id = %id,
                public_id = %record.public_id,
                "media host delete timed out; primary record already removed"
            ),
        }

        tracing::info!(media_id = %id, owner = %owner, "deleted media item");
        Ok(())
    }
}
