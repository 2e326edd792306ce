//! Role assignment ports and application service.
//!
//! Owns the `role`, `role_assigned_at` and `role_assigned_by` fields of
//! the user record: every transition is a direct overwrite performed
//! through an explicit assignment operation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use velora_core::{AppError, AppResult, PageInfo, PageRequest};
use velora_domain::{Permission, Principal, Role, UserId, UserStatus};

use crate::AuthorizationService;

/// Roles allowed to administer role assignments.
const ADMIN_ROLES: &[Role] = &[Role::Admin, Role::SuperAdmin];

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// User projection returned by role administration queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleRecord {
    /// Unique user identifier.
    pub id: UserId,
    /// Canonical email address.
    pub email: String,
    /// Display name, if the user provided one.
    pub name: Option<String>,
    /// Currently assigned role.
    pub role: Role,
    /// Account lifecycle state.
    pub status: UserStatus,
    /// Account creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When the current role was assigned, if it ever was explicitly.
    pub role_assigned_at: Option<DateTime<Utc>>,
    /// Who assigned the current role; `None` for system-initiated changes.
    pub role_assigned_by: Option<UserId>,
}

/// Outcome of a set-based bulk role update.
///
/// When `missing` is non-empty the repository has performed no update:
/// the existence check and the write run in one transaction so the
/// all-or-nothing precondition holds without a race window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRoleUpdate {
    /// Number of rows updated.
    pub updated: u64,
    /// Requested ids that resolved to no user.
    pub missing: Vec<UserId>,
}

/// Repository port for role administration over the users table.
#[async_trait]
pub trait RoleAdminRepository: Send + Sync {
    /// Finds a user projection by id.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserRoleRecord>>;

    /// Overwrites the user's role fields. Returns `None` if the user no
    /// longer exists.
    async fn set_role(
        &self,
        user_id: UserId,
        role: Role,
        assigned_by: Option<UserId>,
        assigned_at: DateTime<Utc>,
    ) -> AppResult<Option<UserRoleRecord>>;

    /// Overwrites the role fields for a set of users in one transactional
    /// statement, reporting missing ids instead of partially updating.
    async fn set_role_bulk(
        &self,
        user_ids: &[UserId],
        role: Role,
        assigned_by: Option<UserId>,
        assigned_at: DateTime<Utc>,
    ) -> AppResult<BulkRoleUpdate>;

    /// Lists users, optionally restricted to a role set, newest first.
    async fn list_users(
        &self,
        roles: Option<&[Role]>,
        page: PageRequest,
    ) -> AppResult<(Vec<UserRoleRecord>, u64)>;
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a single role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// The user after the assignment.
    pub user: UserRoleRecord,
    /// Effective permissions of the newly assigned role.
    pub permissions: Vec<Permission>,
}

/// Outcome of a bulk role assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRoleAssignment {
    /// Number of users whose role was overwritten.
    pub assigned_count: u64,
    /// The role that was assigned.
    pub role: Role,
    /// Effective permissions of the assigned role.
    pub permissions: Vec<Permission>,
}

/// Soft-fail permission check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionValidation {
    /// Whether the user's role grants the permission.
    pub has_permission: bool,
    /// The user's role, when the user exists.
    pub role: Option<Role>,
    /// Effective permissions of the user's role.
    pub permissions: Vec<Permission>,
    /// Populated when the check could not be performed (unknown user).
    pub reason: Option<String>,
}

/// A user together with the effective permissions of their role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithPermissions {
    /// The user projection.
    pub user: UserRoleRecord,
    /// Effective permissions of the user's role.
    pub permissions: Vec<Permission>,
}

/// One page of users with permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPage {
    /// Users on this page.
    pub users: Vec<UserWithPermissions>,
    /// Pagination metadata.
    pub page: PageInfo,
}

/// Role provenance for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHistory {
    /// Currently assigned role.
    pub current_role: Role,
    /// Effective permissions of the current role.
    pub permissions: Vec<Permission>,
    /// When the current role was assigned.
    pub role_assigned_at: Option<DateTime<Utc>>,
    /// Who assigned the current role.
    pub role_assigned_by: Option<UserId>,
    /// When the account was created.
    pub user_created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for role assignment and role-based user queries.
#[derive(Clone)]
pub struct RoleService {
    repository: Arc<dyn RoleAdminRepository>,
    authorization: AuthorizationService,
}

impl RoleService {
    /// Creates a role service from a repository and an evaluator.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleAdminRepository>, authorization: AuthorizationService) -> Self {
        Self {
            repository,
            authorization,
        }
    }

    fn require_admin(&self, actor: &Principal) -> AppResult<()> {
        self.authorization.require_any_role(actor.role(), ADMIN_ROLES)
    }

    fn permissions_for(&self, role: Role) -> Vec<Permission> {
        self.authorization
            .map()
            .permissions_for(role)
            .iter()
            .copied()
            .collect()
    }

    fn with_permissions(&self, user: UserRoleRecord) -> UserWithPermissions {
        let permissions = self.permissions_for(user.role);
        UserWithPermissions { user, permissions }
    }
}

fn user_not_found(user_id: UserId) -> AppError {
    AppError::NotFound(format!("user with id {user_id} not found"))
}

mod assign;
mod query;
