//! Persistence layer for the marketplace admin backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - PostgreSQL implementations of the domain store traits
//! - [`memory::MemoryStore`], an in-process implementation of the same traits

pub mod db;
pub mod entities;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod repositories;
pub mod seed;

pub use memory::MemoryStore;
pub use repositories::{PgRbacStore, PgResourceRepository};
