//! Repository implementations for database operations.

pub mod rbac;
pub mod resource;

pub use rbac::{PgRbacStore, PgRbacTransaction};
pub use resource::PgResourceRepository;

/// Escapes `%`, `_` and `\` so user input matches literally inside ILIKE.
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
