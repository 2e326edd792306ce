//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod media_service;
mod role_service;
mod user_service;

pub use authorization_service::AuthorizationService;
pub use media_service::{
    BulkBatchError, BulkDeleteConfig, BulkDeleteReport, MediaHost, MediaListQuery, MediaRecord,
    MediaRepository, MediaService, MediaUpdate, NewMediaInput, OwnedMediaRef,
};
pub use role_service::{
    BulkRoleAssignment, BulkRoleUpdate, PermissionValidation, RoleAdminRepository, RoleAssignment,
    RoleHistory, RoleService, UserPage, UserRoleRecord, UserWithPermissions,
};
pub use user_service::{NewUserRecord, PasswordHasher, UserAccount, UserRepository, UserService};
