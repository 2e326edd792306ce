use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use velora_application::{
    BulkDeleteReport, BulkRoleAssignment, MediaRecord, PermissionValidation, RoleHistory,
    UserPage, UserWithPermissions,
};
use velora_core::PageInfo;
use velora_domain::{Permission, Principal};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Simple acknowledgement payload.
#[derive(Debug, Serialize)]
pub struct GenericMessageResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// Incoming registration payload.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
    pub password: String,
}

/// Incoming login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id().as_uuid(),
            email: principal.email().to_owned(),
            display_name: principal.display_name().to_owned(),
            role: principal.role().as_str().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// One role of the catalog with its effective permissions.
#[derive(Debug, Serialize)]
pub struct RoleGrantsResponse {
    pub role: String,
    pub permissions: Vec<String>,
}

/// Incoming payload for a single role assignment.
#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: String,
}

/// Incoming payload for a bulk role assignment.
#[derive(Debug, Deserialize)]
pub struct BulkAssignRoleRequest {
    pub user_ids: Vec<Uuid>,
    pub role: String,
}

/// API representation of a user with role and permissions.
#[derive(Debug, Serialize)]
pub struct UserRoleResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub role_assigned_at: Option<DateTime<Utc>>,
    pub role_assigned_by: Option<Uuid>,
    pub permissions: Vec<String>,
}

impl From<UserWithPermissions> for UserRoleResponse {
    fn from(value: UserWithPermissions) -> Self {
        Self {
            id: value.user.id.as_uuid(),
            email: value.user.email,
            name: value.user.name,
            role: value.user.role.as_str().to_owned(),
            status: value.user.status.as_str().to_owned(),
            created_at: value.user.created_at,
            role_assigned_at: value.user.role_assigned_at,
            role_assigned_by: value.user.role_assigned_by.map(|id| id.as_uuid()),
            permissions: permission_names(&value.permissions),
        }
    }
}

/// Pagination metadata payload.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl From<PageInfo> for PageResponse {
    fn from(value: PageInfo) -> Self {
        Self {
            page: value.page,
            limit: value.limit,
            total: value.total,
            total_pages: value.total_pages,
        }
    }
}

/// One page of users with roles.
#[derive(Debug, Serialize)]
pub struct UserPageResponse {
    pub users: Vec<UserRoleResponse>,
    pub pagination: PageResponse,
}

impl From<UserPage> for UserPageResponse {
    fn from(value: UserPage) -> Self {
        Self {
            users: value.users.into_iter().map(UserRoleResponse::from).collect(),
            pagination: PageResponse::from(value.page),
        }
    }
}

/// Outcome payload of a bulk role assignment.
#[derive(Debug, Serialize)]
pub struct BulkAssignRoleResponse {
    pub message: String,
    pub assigned_count: u64,
    pub role: String,
    pub permissions: Vec<String>,
}

impl From<BulkRoleAssignment> for BulkAssignRoleResponse {
    fn from(value: BulkRoleAssignment) -> Self {
        Self {
            message: format!("role assigned to {} users", value.assigned_count),
            assigned_count: value.assigned_count,
            role: value.role.as_str().to_owned(),
            permissions: permission_names(&value.permissions),
        }
    }
}

/// Soft-fail permission check payload.
#[derive(Debug, Serialize)]
pub struct PermissionValidationResponse {
    pub has_permission: bool,
    pub role: Option<String>,
    pub permissions: Vec<String>,
    pub reason: Option<String>,
}

impl From<PermissionValidation> for PermissionValidationResponse {
    fn from(value: PermissionValidation) -> Self {
        Self {
            has_permission: value.has_permission,
            role: value.role.map(|role| role.as_str().to_owned()),
            permissions: permission_names(&value.permissions),
            reason: value.reason,
        }
    }
}

/// Role provenance payload.
#[derive(Debug, Serialize)]
pub struct RoleHistoryResponse {
    pub current_role: String,
    pub permissions: Vec<String>,
    pub role_assigned_at: Option<DateTime<Utc>>,
    pub role_assigned_by: Option<Uuid>,
    pub user_created_at: DateTime<Utc>,
}

impl From<RoleHistory> for RoleHistoryResponse {
    fn from(value: RoleHistory) -> Self {
        Self {
            current_role: value.current_role.as_str().to_owned(),
            permissions: permission_names(&value.permissions),
            role_assigned_at: value.role_assigned_at,
            role_assigned_by: value.role_assigned_by.map(|id| id.as_uuid()),
            user_created_at: value.user_created_at,
        }
    }
}

/// Query parameters for the paginated user listing.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<String>,
}

/// Query parameters for the role/permission search.
#[derive(Debug, Deserialize)]
pub struct SearchUsersQuery {
    pub role: Option<String>,
    pub permission: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Media gallery
// ---------------------------------------------------------------------------

/// Incoming payload for registering an uploaded asset.
#[derive(Debug, Deserialize)]
pub struct CreateMediaRequest {
    pub public_id: String,
    pub secure_url: String,
    pub format: Option<String>,
    pub resource_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub original_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Incoming payload for a media metadata update.
#[derive(Debug, Deserialize)]
pub struct UpdateMediaRequest {
    pub original_name: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Query parameters for the gallery listing.
#[derive(Debug, Deserialize)]
pub struct MediaListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub format: Option<String>,
    pub resource_type: Option<String>,
    pub min_size_bytes: Option<i64>,
    pub max_size_bytes: Option<i64>,
    pub min_width: Option<i32>,
    pub max_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_height: Option<i32>,
    pub uploaded_after: Option<DateTime<Utc>>,
    pub uploaded_before: Option<DateTime<Utc>>,
}

/// API representation of a gallery item.
#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub id: Uuid,
    pub public_id: String,
    pub secure_url: String,
    pub format: Option<String>,
    pub resource_type: String,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub original_name: Option<String>,
    pub tags: Vec<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<MediaRecord> for MediaResponse {
    fn from(value: MediaRecord) -> Self {
        Self {
            id: value.id.as_uuid(),
            public_id: value.public_id,
            secure_url: value.secure_url,
            format: value.format,
            resource_type: value.resource_type.as_str().to_owned(),
            size_bytes: value.size_bytes,
            width: value.width,
            height: value.height,
            original_name: value.original_name,
            tags: value.tags,
            uploaded_at: value.uploaded_at,
        }
    }
}

/// One page of gallery items.
#[derive(Debug, Serialize)]
pub struct MediaPageResponse {
    pub media: Vec<MediaResponse>,
    pub pagination: PageResponse,
}

/// Incoming payload for a bulk gallery deletion.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteMediaRequest {
    pub ids: Vec<Uuid>,
}

/// Outcome payload of a bulk gallery deletion. Partial failure stays a
/// success response; callers inspect `errors`.
#[derive(Debug, Serialize)]
pub struct BulkDeleteMediaResponse {
    pub message: String,
    pub count: u64,
    pub errors: usize,
}

impl From<BulkDeleteReport> for BulkDeleteMediaResponse {
    fn from(value: BulkDeleteReport) -> Self {
        Self {
            message: format!(
                "deleted {} of {} media items",
                value.deleted, value.total_requested
            ),
            count: value.deleted,
            errors: value.errors.len(),
        }
    }
}

pub fn permission_names(permissions: &[Permission]) -> Vec<String> {
    permissions
        .iter()
        .map(|permission| permission.as_str().to_owned())
        .collect()
}
