pub mod admin;
pub mod health;
pub mod media;
pub mod roles;
