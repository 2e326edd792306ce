use std::str::FromStr;

use serde::{Deserialize, Serialize};
use velora_core::AppError;

/// Principal classes recognized by the system, from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full platform control, including destructive system operations.
    SuperAdmin,
    /// Day-to-day administration without system-level settings.
    Admin,
    /// Content and catalog management without user administration.
    Manager,
    /// Regular authenticated account.
    User,
    /// Unauthenticated or trial visitor.
    Guest,
}

impl Role {
    /// Returns the stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::User => "USER",
            Self::Guest => "GUEST",
        }
    }

    /// Returns all known roles in privilege order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::SuperAdmin,
            Role::Admin,
            Role::Manager,
            Role::User,
            Role::Guest,
        ];

        ALL
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "USER" => Ok(Self::User),
            "GUEST" => Ok(Self::Guest),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Fine-grained capabilities enforced by application policy checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Full user administration.
    ManageUsers,
    /// Allows listing and inspecting user accounts.
    ViewUsers,
    /// Allows creating user accounts.
    CreateUser,
    /// Allows updating user accounts.
    UpdateUser,
    /// Allows deleting user accounts.
    DeleteUser,
    /// Allows creating content entries.
    CreateContent,
    /// Allows reading content entries.
    ViewContent,
    /// Allows editing content entries.
    EditContent,
    /// Allows deleting content entries.
    DeleteContent,
    /// Allows creating categories.
    CreateCategory,
    /// Allows listing categories.
    ViewCategories,
    /// Allows editing categories.
    EditCategory,
    /// Allows deleting categories.
    DeleteCategory,
    /// Allows uploading media assets.
    UploadMedia,
    /// Allows managing any media asset, including destructive operations.
    ManageMedia,
    /// Allows browsing the media gallery.
    ViewMedia,
    /// Allows reading sales leads.
    ViewLeads,
    /// Allows editing sales leads.
    EditLead,
    /// Allows deleting sales leads.
    DeleteLead,
    /// Allows reading customer enquiries.
    ViewEnquiries,
    /// Allows deleting customer enquiries.
    DeleteEnquiry,
    /// Allows replying to customer enquiries.
    ReplyEnquiry,
    /// Allows reading orders.
    ViewOrders,
    /// Allows editing orders.
    EditOrder,
    /// Allows deleting orders.
    DeleteOrder,
    /// Allows reading payment records.
    ViewPayments,
    /// Allows editing payment records.
    EditPayment,
    /// Allows deleting payment records.
    DeletePayment,
    /// Allows reading the own profile.
    ViewProfile,
    /// Allows editing the own profile.
    EditProfile,
    /// Allows changing system settings.
    ManageSettings,
    /// Allows reading system settings.
    ViewSettings,
    /// Allows reading analytics dashboards.
    ViewAnalytics,
    /// Allows exporting report data.
    ExportData,
    /// Allows running bulk operations.
    BulkOperations,
    /// Allows system-level administration.
    ManageSystem,
}

impl Permission {
    /// Returns the stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageUsers => "MANAGE_USERS",
            Self::ViewUsers => "VIEW_USERS",
            Self::CreateUser => "CREATE_USER",
            Self::UpdateUser => "UPDATE_USER",
            Self::DeleteUser => "DELETE_USER",
            Self::CreateContent => "CREATE_CONTENT",
            Self::ViewContent => "VIEW_CONTENT",
            Self::EditContent => "EDIT_CONTENT",
            Self::DeleteContent => "DELETE_CONTENT",
            Self::CreateCategory => "CREATE_CATEGORY",
            Self::ViewCategories => "VIEW_CATEGORIES",
            Self::EditCategory => "EDIT_CATEGORY",
            Self::DeleteCategory => "DELETE_CATEGORY",
            Self::UploadMedia => "UPLOAD_MEDIA",
            Self::ManageMedia => "MANAGE_MEDIA",
            Self::ViewMedia => "VIEW_MEDIA",
            Self::ViewLeads => "VIEW_LEADS",
            Self::EditLead => "EDIT_LEAD",
            Self::DeleteLead => "DELETE_LEAD",
            Self::ViewEnquiries => "VIEW_ENQUIRIES",
            Self::DeleteEnquiry => "DELETE_ENQUIRY",
            Self::ReplyEnquiry => "REPLY_ENQUIRY",
            Self::ViewOrders => "VIEW_ORDERS",
            Self::EditOrder => "EDIT_ORDER",
            Self::DeleteOrder => "DELETE_ORDER",
            Self::ViewPayments => "VIEW_PAYMENTS",
            Self::EditPayment => "EDIT_PAYMENT",
            Self::DeletePayment => "DELETE_PAYMENT",
            Self::ViewProfile => "VIEW_PROFILE",
            Self::EditProfile => "EDIT_PROFILE",
            Self::ManageSettings => "MANAGE_SETTINGS",
            Self::ViewSettings => "VIEW_SETTINGS",
            Self::ViewAnalytics => "VIEW_ANALYTICS",
            Self::ExportData => "EXPORT_DATA",
            Self::BulkOperations => "BULK_OPERATIONS",
            Self::ManageSystem => "MANAGE_SYSTEM",
        }
    }

    /// Returns the full permission catalog for administrative display.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::ManageUsers,
            Permission::ViewUsers,
            Permission::CreateUser,
            Permission::UpdateUser,
            Permission::DeleteUser,
            Permission::CreateContent,
            Permission::ViewContent,
            Permission::EditContent,
            Permission::DeleteContent,
            Permission::CreateCategory,
            Permission::ViewCategories,
            Permission::EditCategory,
            Permission::DeleteCategory,
            Permission::UploadMedia,
            Permission::ManageMedia,
            Permission::ViewMedia,
            Permission::ViewLeads,
            Permission::EditLead,
            Permission::DeleteLead,
            Permission::ViewEnquiries,
            Permission::DeleteEnquiry,
            Permission::ReplyEnquiry,
            Permission::ViewOrders,
            Permission::EditOrder,
            Permission::DeleteOrder,
            Permission::ViewPayments,
            Permission::EditPayment,
            Permission::DeletePayment,
            Permission::ViewProfile,
            Permission::EditProfile,
            Permission::ManageSettings,
            Permission::ViewSettings,
            Permission::ViewAnalytics,
            Permission::ExportData,
            Permission::BulkOperations,
            Permission::ManageSystem,
        ];

        ALL
    }

    /// Parses a transport value into a permission.
    pub fn from_transport(value: &str) -> Result<Self, AppError> {
        Self::from_str(value)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|permission| permission.as_str() == value)
            .copied()
            .ok_or_else(|| AppError::Validation(format!("unknown permission '{value}'")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::str::FromStr;

    use super::{Permission, Role};

    #[test]
    fn role_roundtrip_storage_value() {
        for role in Role::all() {
            let restored = Role::from_str(role.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Role::Guest), *role);
        }
    }

    #[test]
    fn permission_roundtrip_storage_value() {
        for permission in Permission::all() {
            let restored = Permission::from_str(permission.as_str());
            assert!(restored.is_ok());
            assert_eq!(restored.unwrap_or(Permission::ViewContent), *permission);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(Role::from_str("ROOT").is_err());
    }

    #[test]
    fn unknown_permission_is_rejected() {
        assert!(Permission::from_transport("LAUNCH_MISSILES").is_err());
    }

    #[test]
    fn catalog_has_no_duplicate_storage_values() {
        let values: BTreeSet<&str> = Permission::all().iter().map(Permission::as_str).collect();
        assert_eq!(values.len(), Permission::all().len());
    }
}
