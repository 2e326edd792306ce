use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use velora_application::{MediaListQuery, MediaUpdate, NewMediaInput};
use velora_core::PageRequest;
use velora_domain::{MediaId, MediaResourceType, MediaSortKey, Principal, SortDirection};

use crate::dto::{
    BulkDeleteMediaRequest, BulkDeleteMediaResponse, CreateMediaRequest, GenericMessageResponse,
    MediaListParams, MediaPageResponse, MediaResponse, PageResponse, UpdateMediaRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_media_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateMediaRequest>,
) -> ApiResult<(StatusCode, Json<MediaResponse>)> {
    let resource_type = payload
        .resource_type
        .as_deref()
        .map(str::parse::<MediaResourceType>)
        .transpose()?
        .unwrap_or(MediaResourceType::Image);

    let record = state
        .media_service
        .upload_media(
            principal.id(),
            NewMediaInput {
                public_id: payload.public_id,
                secure_url: payload.secure_url,
                format: payload.format,
                resource_type,
                size_bytes: payload.size_bytes.unwrap_or_default(),
                width: payload.width,
                height: payload.height,
                original_name: payload.original_name,
                tags: payload.tags.unwrap_or_default(),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(MediaResponse::from(record))))
}

pub async fn list_media_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<MediaListParams>,
) -> ApiResult<Json<MediaPageResponse>> {
    let query = MediaListQuery {
        page: PageRequest::new(params.page, params.limit)?,
        sort_by: params
            .sort_by
            .as_deref()
            .map(str::parse::<MediaSortKey>)
            .transpose()?
            .unwrap_or_default(),
        sort_direction: params
            .sort_order
            .as_deref()
            .map(str::parse::<SortDirection>)
            .transpose()?
            .unwrap_or_default(),
        format: params.format,
        resource_type: params
            .resource_type
            .as_deref()
            .map(str::parse::<MediaResourceType>)
            .transpose()?,
        min_size_bytes: params.min_size_bytes,
        max_size_bytes: params.max_size_bytes,
        min_width: params.min_width,
        max_width: params.max_width,
        min_height: params.min_height,
        max_height: params.max_height,
        uploaded_after: params.uploaded_after,
        uploaded_before: params.uploaded_before,
    };

    let (records, page) = state.media_service.list_media(principal.id(), &query).await?;

    Ok(Json(MediaPageResponse {
        media: records.into_iter().map(MediaResponse::from).collect(),
        pagination: PageResponse::from(page),
    }))
}

pub async fn get_media_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(media_id): Path<Uuid>,
) -> ApiResult<Json<MediaResponse>> {
    let record = state
        .media_service
        .get_media(principal.id(), MediaId::from_uuid(media_id))
        .await?;

    Ok(Json(MediaResponse::from(record)))
}

pub async fn update_media_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(media_id): Path<Uuid>,
    Json(payload): Json<UpdateMediaRequest>,
) -> ApiResult<Json<MediaResponse>> {
    let record = state
        .media_service
        .update_media(
            principal.id(),
            MediaId::from_uuid(media_id),
            MediaUpdate {
                original_name: payload.original_name,
                tags: payload.tags,
            },
        )
        .await?;

    Ok(Json(MediaResponse::from(record)))
}

pub async fn delete_media_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(media_id): Path<Uuid>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state
        .media_service
        .delete_media(principal.id(), MediaId::from_uuid(media_id))
        .await?;

    Ok(Json(GenericMessageResponse {
        message: "media item deleted".to_owned(),
    }))
}

pub async fn bulk_delete_media_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<BulkDeleteMediaRequest>,
) -> ApiResult<Json<BulkDeleteMediaResponse>> {
    let ids: Vec<MediaId> = payload.ids.into_iter().map(MediaId::from_uuid).collect();

    let report = state
        .media_service
        .bulk_delete_media(principal.id(), &ids)
        .await?;

    Ok(Json(BulkDeleteMediaResponse::from(report)))
}
