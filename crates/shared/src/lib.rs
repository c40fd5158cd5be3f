//! Shared utilities and common types for the marketplace admin backend.
//!
//! This crate provides functionality used across all other crates:
//! - Page-based pagination primitives
//! - Common field validators
//! - Clearable patch fields

pub mod nullable;
pub mod pagination;
pub mod validation;
