//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod permission;
pub mod record;
pub mod role;
