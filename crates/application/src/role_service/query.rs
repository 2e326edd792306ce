use super::*;

impl RoleService {
    /// Returns one user together with the effective permissions of their
    /// role. Hard-fails with `NotFound` for unknown users.
    pub async fn get_user_with_role_and_permissions(
        &self,
        actor: &Principal,
        user_id: UserId,
    ) -> AppResult<UserWithPermissions> {
        self.require_admin(actor)?;

        let user = self
            .repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        Ok(self.with_permissions(user))
    }

    /// Checks whether a user's role grants a permission.
    ///
    /// Soft-fail contract: an unknown user yields a negative result with a
    /// reason instead of an error, because permission checks are expected
    /// to handle unknown principals gracefully.
    pub async fn validate_permission(
        &self,
        actor: &Principal,
        user_id: UserId,
        permission: Permission,
    ) -> AppResult<PermissionValidation> {
        self.require_admin(actor)?;

        let Some(user) = self.repository.find_user(user_id).await? else {
            return Ok(PermissionValidation {
                has_permission: false,
                role: None,
                permissions: Vec::new(),
                reason: Some("User not found".to_owned()),
            });
        };

        Ok(PermissionValidation {
            has_permission: self.authorization.has_permission(user.role, permission),
            role: Some(user.role),
            permissions: self.permissions_for(user.role),
            reason: None,
        })
    }

    /// Lists users with their roles and permissions, newest first,
    /// optionally restricted to one role.
    pub async fn list_users_with_roles(
        &self,
        actor: &Principal,
        role_filter: Option<Role>,
        page: PageRequest,
    ) -> AppResult<UserPage> {
        self.require_admin(actor)?;

        let roles = role_filter.map(|role| vec![role]);
        let (users, total) = self.repository.list_users(roles.as_deref(), page).await?;

        Ok(UserPage {
            users: users
                .into_iter()
                .map(|user| self.with_permissions(user))
                .collect(),
            page: PageInfo::new(page, total),
        })
    }

    /// Searches users by role or by permission.
    ///
    /// A role filter wins over a permission filter. A permission-only
    /// search first resolves the roles whose grant set contains the
    /// permission, then filters users by membership in that role set.
    /// Without either filter all users are returned.
    pub async fn search_users_by_role_or_permission(
        &self,
        actor: &Principal,
        role: Option<Role>,
        permission: Option<Permission>,
        page: PageRequest,
    ) -> AppResult<UserPage> {
        self.require_admin(actor)?;

        let roles: Option<Vec<Role>> = match (role, permission) {
            (Some(role), _) => Some(vec![role]),
            (None, Some(permission)) => {
                Some(self.authorization.map().roles_with_permission(permission))
            }
            (None, None) => None,
        };

        let (users, total) = self.repository.list_users(roles.as_deref(), page).await?;

        Ok(UserPage {
            users: users
                .into_iter()
                .map(|user| self.with_permissions(user))
                .collect(),
            page: PageInfo::new(page, total),
        })
    }

    /// Returns role provenance for one user.
    pub async fn role_history(
        &self,
        actor: &Principal,
        user_id: UserId,
    ) -> AppResult<RoleHistory> {
        self.require_admin(actor)?;

        let user = self
            .repository
            .find_user(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        Ok(RoleHistory {
            current_role: user.role,
            permissions: self.permissions_for(user.role),
            role_assigned_at: user.role_assigned_at,
            role_assigned_by: user.role_assigned_by,
            user_created_at: user.created_at,
        })
    }
}
