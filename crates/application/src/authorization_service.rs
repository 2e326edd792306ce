use std::sync::Arc;

use velora_core::{AppError, AppResult};
use velora_domain::{Permission, Role, RolePermissionMap};

/// Evaluates role-based access decisions against the injected
/// role→permission map.
///
/// All predicates are pure and synchronous: the map is read-only after
/// startup, so the evaluator is safe for unsynchronized concurrent use
/// and never suspends.
#[derive(Clone)]
pub struct AuthorizationService {
    map: Arc<RolePermissionMap>,
}

impl AuthorizationService {
    /// Creates an evaluator over a role→permission map.
    #[must_use]
    pub fn new(map: Arc<RolePermissionMap>) -> Self {
        Self { map }
    }

    /// Returns the underlying role→permission map.
    #[must_use]
    pub fn map(&self) -> &RolePermissionMap {
        &self.map
    }

    /// Returns whether the role grants the permission.
    #[must_use]
    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.map.permissions_for(role).contains(&permission)
    }

    /// Returns whether the role is one of the allowed roles.
    #[must_use]
    pub fn has_any_role(&self, role: Role, allowed: &[Role]) -> bool {
        allowed.contains(&role)
    }

    /// Returns whether the role grants every required permission.
    #[must_use]
    pub fn has_all_permissions(&self, role: Role, required: &[Permission]) -> bool {
        let granted = self.map.permissions_for(role);
        required.iter().all(|permission| granted.contains(permission))
    }

    /// Ensures the role grants the permission.
    pub fn require_permission(&self, role: Role, permission: Permission) -> AppResult<()> {
        if self.has_permission(role, permission) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "role '{}' is missing permission '{}'",
            role.as_str(),
            permission.as_str()
        )))
    }

    /// Ensures the role is one of the allowed roles.
    pub fn require_any_role(&self, role: Role, allowed: &[Role]) -> AppResult<()> {
        if self.has_any_role(role, allowed) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "role '{}' is not permitted to perform this operation",
            role.as_str()
        )))
    }
}
