use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use uuid::Uuid;

use velora_core::PageRequest;
use velora_domain::{Permission, Principal, Role, UserId};

use crate::dto::{
    AssignRoleRequest, BulkAssignRoleRequest, BulkAssignRoleResponse, ListUsersQuery,
    PermissionValidationResponse, RoleHistoryResponse, SearchUsersQuery, UserPageResponse,
    UserRoleResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UserPageResponse>> {
    let page = PageRequest::new(query.page, query.limit)?;
    let role_filter = query
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()?;

    let users = state
        .role_service
        .list_users_with_roles(&actor, role_filter, page)
        .await?;

    Ok(Json(UserPageResponse::from(users)))
}

pub async fn get_user_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserRoleResponse>> {
    let user = state
        .role_service
        .get_user_with_role_and_permissions(&actor, UserId::from_uuid(user_id))
        .await?;

    Ok(Json(UserRoleResponse::from(user)))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<AssignRoleRequest>,
) -> ApiResult<Json<UserRoleResponse>> {
    let role: Role = payload.role.parse()?;

    let assignment = state
        .role_service
        .assign_role(&actor, UserId::from_uuid(user_id), role)
        .await?;

    Ok(Json(UserRoleResponse::from(
        velora_application::UserWithPermissions {
            user: assignment.user,
            permissions: assignment.permissions,
        },
    )))
}

pub async fn bulk_assign_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Json(payload): Json<BulkAssignRoleRequest>,
) -> ApiResult<Json<BulkAssignRoleResponse>> {
    let role: Role = payload.role.parse()?;
    let user_ids: Vec<UserId> = payload
        .user_ids
        .into_iter()
        .map(UserId::from_uuid)
        .collect();

    let assignment = state
        .role_service
        .bulk_assign_role(&actor, &user_ids, role)
        .await?;

    Ok(Json(BulkAssignRoleResponse::from(assignment)))
}

pub async fn role_history_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<RoleHistoryResponse>> {
    let history = state
        .role_service
        .role_history(&actor, UserId::from_uuid(user_id))
        .await?;

    Ok(Json(RoleHistoryResponse::from(history)))
}

pub async fn validate_permission_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Path((user_id, permission)): Path<(Uuid, String)>,
) -> ApiResult<Json<PermissionValidationResponse>> {
    let permission = Permission::from_transport(&permission)?;

    let validation = state
        .role_service
        .validate_permission(&actor, UserId::from_uuid(user_id), permission)
        .await?;

    Ok(Json(PermissionValidationResponse::from(validation)))
}

pub async fn search_users_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<Principal>,
    Query(query): Query<SearchUsersQuery>,
) -> ApiResult<Json<UserPageResponse>> {
    let page = PageRequest::new(query.page, query.limit)?;
    let role = query.role.as_deref().map(str::parse::<Role>).transpose()?;
    let permission = query
        .permission
        .as_deref()
        .map(Permission::from_transport)
        .transpose()?;

    let users = state
        .role_service
        .search_users_by_role_or_permission(&actor, role, permission, page)
        .await?;

    Ok(Json(UserPageResponse::from(users)))
}
