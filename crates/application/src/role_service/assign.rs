use super::*;

impl RoleService {
    /// Assigns a role to one user, recording who assigned it and when.
    ///
    /// Fails with `NotFound` if the target user does not exist. Concurrent
    /// assignments to the same user race at the storage layer and the last
    /// write wins; there is no per-user lock.
    pub async fn assign_role(
        &self,
        actor: &Principal,
        user_id: UserId,
        new_role: Role,
    ) -> AppResult<RoleAssignment> {
        self.require_admin(actor)?;

        if self.repository.find_user(user_id).await?.is_none() {
            return Err(user_not_found(user_id));
        }

        let user = self
            .repository
            .set_role(user_id, new_role, Some(actor.id()), Utc::now())
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        tracing::info!(
            user_id = %user_id,
            role = new_role.as_str(),
            assigned_by = %actor.id(),
            "role assigned",
        );

        Ok(RoleAssignment {
            permissions: self.permissions_for(new_role),
            user,
        })
    }

    /// Assigns a role to many users at once.
    ///
    /// All-or-nothing precondition: if any id does not resolve to an
    /// existing user the whole call fails with `NotFound` naming the
    /// missing ids and no assignment is performed.
    pub async fn bulk_assign_role(
        &self,
        actor: &Principal,
        user_ids: &[UserId],
        new_role: Role,
    ) -> AppResult<BulkRoleAssignment> {
        self.require_admin(actor)?;

        if user_ids.is_empty() {
            return Err(AppError::Validation(
                "at least one user id is required".to_owned(),
            ));
        }

        let outcome = self
            .repository
            .set_role_bulk(user_ids, new_role, Some(actor.id()), Utc::now())
            .await?;

        if !outcome.missing.is_empty() {
            let missing = outcome
                .missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(AppError::NotFound(format!("users not found: {missing}")));
        }

        tracing::info!(
            assigned = outcome.updated,
            role = new_role.as_str(),
            assigned_by = %actor.id(),
            "bulk role assignment applied",
        );

        Ok(BulkRoleAssignment {
            assigned_count: outcome.updated,
            role: new_role,
            permissions: self.permissions_for(new_role),
        })
    }
}
