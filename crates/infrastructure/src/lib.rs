//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod cloudinary_media_host;
mod postgres_media_repository;
mod postgres_role_admin_repository;
mod postgres_user_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use cloudinary_media_host::{CloudinaryConfig, CloudinaryMediaHost};
pub use postgres_media_repository::PostgresMediaRepository;
pub use postgres_role_admin_repository::PostgresRoleAdminRepository;
pub use postgres_user_repository::PostgresUserRepository;
