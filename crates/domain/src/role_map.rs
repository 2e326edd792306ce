//! The role→permission catalog.
//!
//! Centralized as one static artifact so the privilege hierarchy stays
//! auditable and testable in a single place. Built once at process start
//! and injected into the services that consult it.

use std::collections::{BTreeMap, BTreeSet};

use crate::security::{Permission, Role};

/// Total mapping from every role to the permission set it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionMap {
    grants: BTreeMap<Role, BTreeSet<Permission>>,
}

impl RolePermissionMap {
    /// Builds the built-in privilege hierarchy.
    ///
    /// Each role's grant set is a superset of the next less privileged
    /// role's set (SUPER_ADMIN ⊇ ADMIN ⊇ MANAGER ⊇ USER ⊇ GUEST).
    #[must_use]
    pub fn builtin() -> Self {
        use Permission::*;

        let mut grants = BTreeMap::new();

        grants.insert(
            Role::SuperAdmin,
            Permission::all().iter().copied().collect(),
        );

        grants.insert(
            Role::Admin,
            [
                ManageUsers,
                ViewUsers,
                CreateUser,
                UpdateUser,
                DeleteUser,
                CreateContent,
                ViewContent,
                EditContent,
                DeleteContent,
                CreateCategory,
                ViewCategories,
                EditCategory,
                DeleteCategory,
                UploadMedia,
                ManageMedia,
                ViewMedia,
                ViewLeads,
                EditLead,
                DeleteLead,
                ViewEnquiries,
                DeleteEnquiry,
                ReplyEnquiry,
                ViewOrders,
                EditOrder,
                ViewPayments,
                EditPayment,
                ViewProfile,
                EditProfile,
                ViewSettings,
                ViewAnalytics,
                ExportData,
                BulkOperations,
            ]
            .into_iter()
            .collect(),
        );

        grants.insert(
            Role::Manager,
            [
                ViewUsers,
                CreateContent,
                ViewContent,
                EditContent,
                DeleteContent,
                CreateCategory,
                ViewCategories,
                EditCategory,
                DeleteCategory,
                UploadMedia,
                ManageMedia,
                ViewMedia,
                ViewLeads,
                EditLead,
                ViewEnquiries,
                ReplyEnquiry,
                ViewOrders,
                ViewPayments,
                ViewProfile,
                EditProfile,
                ViewAnalytics,
            ]
            .into_iter()
            .collect(),
        );

        grants.insert(
            Role::User,
            [ViewContent, ViewProfile, EditProfile].into_iter().collect(),
        );

        grants.insert(Role::Guest, [ViewContent].into_iter().collect());

        Self { grants }
    }

    /// Builds a map from explicit grant sets, filling absent roles with
    /// empty sets so the mapping stays total.
    #[must_use]
    pub fn from_grants(grants: BTreeMap<Role, BTreeSet<Permission>>) -> Self {
        let mut grants = grants;
        for role in Role::all() {
            grants.entry(*role).or_default();
        }

        Self { grants }
    }

    /// Returns the permission set granted to a role. Total: every role
    /// resolves to a defined (possibly empty) set.
    #[must_use]
    pub fn permissions_for(&self, role: Role) -> &BTreeSet<Permission> {
        static EMPTY: BTreeSet<Permission> = BTreeSet::new();
        self.grants.get(&role).unwrap_or(&EMPTY)
    }

    /// Returns the full permission catalog for administrative display.
    #[must_use]
    pub fn all_permissions(&self) -> &'static [Permission] {
        Permission::all()
    }

    /// Returns the roles whose grant set contains the permission.
    #[must_use]
    pub fn roles_with_permission(&self, permission: Permission) -> Vec<Role> {
        Role::all()
            .iter()
            .copied()
            .filter(|role| self.permissions_for(*role).contains(&permission))
            .collect()
    }

    /// Iterates roles with their grant sets in privilege order.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &BTreeSet<Permission>)> {
        Role::all()
            .iter()
            .map(|role| (*role, self.permissions_for(*role)))
    }
}

impl Default for RolePermissionMap {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::RolePermissionMap;
    use crate::security::{Permission, Role};

    #[test]
    fn every_role_resolves_to_a_defined_set() {
        let map = RolePermissionMap::builtin();
        for role in Role::all() {
            // Totality: the lookup itself must succeed for every role.
            let _ = map.permissions_for(*role);
        }
    }

    #[test]
    fn privilege_hierarchy_is_monotonic() {
        let map = RolePermissionMap::builtin();
        let chain = [
            Role::SuperAdmin,
            Role::Admin,
            Role::Manager,
            Role::User,
            Role::Guest,
        ];

        for pair in chain.windows(2) {
            let higher = map.permissions_for(pair[0]);
            let lower = map.permissions_for(pair[1]);
            assert!(
                higher.is_superset(lower),
                "{:?} grants must contain every {:?} grant",
                pair[0],
                pair[1],
            );
        }
    }

    #[test]
    fn super_admin_holds_the_full_catalog() {
        let map = RolePermissionMap::builtin();
        assert_eq!(
            map.permissions_for(Role::SuperAdmin).len(),
            Permission::all().len()
        );
    }

    #[test]
    fn admin_is_denied_system_management() {
        let map = RolePermissionMap::builtin();
        let admin = map.permissions_for(Role::Admin);
        assert!(!admin.contains(&Permission::ManageSystem));
        assert!(!admin.contains(&Permission::ManageSettings));
        assert!(admin.contains(&Permission::BulkOperations));
    }

    #[test]
    fn view_content_is_granted_to_all_roles() {
        let map = RolePermissionMap::builtin();
        assert_eq!(
            map.roles_with_permission(Permission::ViewContent),
            Role::all().to_vec()
        );
    }

    #[test]
    fn manage_system_is_super_admin_only() {
        let map = RolePermissionMap::builtin();
        assert_eq!(
            map.roles_with_permission(Permission::ManageSystem),
            vec![Role::SuperAdmin]
        );
    }

    #[test]
    fn from_grants_fills_missing_roles_with_empty_sets() {
        let map = RolePermissionMap::from_grants(BTreeMap::new());
        for role in Role::all() {
            assert!(map.permissions_for(*role).is_empty());
        }
    }

    #[test]
    fn iteration_follows_privilege_order() {
        let map = RolePermissionMap::builtin();
        let roles: Vec<Role> = map.iter().map(|(role, _)| role).collect();
        assert_eq!(roles, Role::all().to_vec());
    }

    proptest::proptest! {
        #[test]
        fn reverse_lookup_agrees_with_grant_sets(
            role_index in 0..Role::all().len(),
            permission_index in 0..Permission::all().len(),
        ) {
            let map = RolePermissionMap::builtin();
            let role = Role::all()[role_index];
            let permission = Permission::all()[permission_index];

            let granted = map.permissions_for(role).contains(&permission);
            let listed = map.roles_with_permission(permission).contains(&role);
            proptest::prop_assert_eq!(granted, listed);
        }
    }
}
