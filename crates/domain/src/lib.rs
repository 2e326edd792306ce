//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod media;
mod role_map;
mod security;
mod user;

pub use media::{MediaId, MediaResourceType, MediaSortKey, SortDirection};
pub use role_map::RolePermissionMap;
pub use security::{Permission, Role};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, Principal, UserId, UserStatus,
    validate_password,
};
