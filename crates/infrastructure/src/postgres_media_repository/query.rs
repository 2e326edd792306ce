use sqlx::{Postgres, QueryBuilder};

use velora_domain::MediaSortKey;

use super::*;

impl PostgresMediaRepository {
    pub(super) async fn list_impl(
        &self,
        owner: UserId,
        query: &MediaListQuery,
    ) -> AppResult<(Vec<MediaRecord>, u64)> {
        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM media_gallery");
        push_filters(&mut count_builder, owner, query);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count media items: {error}"))
            })?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(
            "SELECT id, owner_id, public_id, secure_url, format, resource_type, \
             size_bytes, width, height, original_name, tags, uploaded_at \
             FROM media_gallery",
        );
        push_filters(&mut builder, owner, query);

        // Sort column comes from a closed enum, never from caller text.
        builder.push(" ORDER BY ");
        builder.push(sort_column(query.sort_by));
        builder.push(' ');
        builder.push(query.sort_direction.as_sql());
        builder.push(", id ASC");

        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.page.limit()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        let rows: Vec<MediaRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list media items: {error}")))?;

        let records = rows
            .into_iter()
            .map(MediaRecord::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((records, u64::try_from(total).unwrap_or_default()))
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, owner: UserId, query: &MediaListQuery) {
    builder.push(" WHERE owner_id = ");
    builder.push_bind(owner.as_uuid());

    if let Some(format) = &query.format {
        builder.push(" AND format = ");
        builder.push_bind(format.clone());
    }

    if let Some(resource_type) = query.resource_type {
        builder.push(" AND resource_type = ");
        builder.push_bind(resource_type.as_str());
    }

    if let Some(min_size) = query.min_size_bytes {
        builder.push(" AND size_bytes >= ");
        builder.push_bind(min_size);
    }

    if let Some(max_size) = query.max_size_bytes {
        builder.push(" AND size_bytes <= ");
        builder.push_bind(max_size);
    }

    if let Some(min_width) = query.min_width {
        builder.push(" AND width >= ");
        builder.push_bind(min_width);
    }

    if let Some(max_width) = query.max_width {
        builder.push(" AND width <= ");
        builder.push_bind(max_width);
    }

    if let Some(min_height) = query.min_height {
        builder.push(" AND height >= ");
        builder.push_bind(min_height);
    }

    if let Some(max_height) = query.max_height {
        builder.push(" AND height <= ");
        builder.push_bind(max_height);
    }

    if let Some(uploaded_after) = query.uploaded_after {
        builder.push(" AND uploaded_at >= ");
        builder.push_bind(uploaded_after);
    }

    if let Some(uploaded_before) = query.uploaded_before {
        builder.push(" AND uploaded_at <= ");
        builder.push_bind(uploaded_before);
    }
}

fn sort_column(sort_by: MediaSortKey) -> &'static str {
    match sort_by {
        MediaSortKey::UploadedAt => "uploaded_at",
        MediaSortKey::Size => "size_bytes",
        MediaSortKey::OriginalName => "original_name",
        MediaSortKey::Format => "format",
        MediaSortKey::Width => "width",
        MediaSortKey::Height => "height",
    }
}
