//! HTTP route handlers.

pub mod commerces;
pub mod health;
pub mod permissions;
pub mod resources;
pub mod roles;
pub mod user_access;
