//! Domain layer for the marketplace admin backend.
//!
//! This crate contains:
//! - Domain models (permissions, roles, paginated resources)
//! - The permission adapter and permission tree builder
//! - Business services orchestrating the storage traits in [`store`]
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use error::{DomainError, DomainResult, FieldError};
