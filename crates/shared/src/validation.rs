//! Common validation utilities.
//!
//! These functions plug into `#[validate(custom(function = ...))]` on request
//! payloads, so each returns a `validator::ValidationError` with a message.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// One segment of a dot-delimited permission name.
    static ref PERMISSION_SEGMENT: Regex = Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap();
    static ref DOCUMENT_NUMBER: Regex = Regex::new(r"^[0-9]{5,15}(-[0-9])?$").unwrap();
    static ref PHONE_NUMBER: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
    static ref ACCOUNT_NUMBER: Regex = Regex::new(r"^[0-9]{6,20}$").unwrap();
    static ref ISO_CODE: Regex = Regex::new(r"^[A-Z]{2,3}$").unwrap();
}

/// Number of segments in a stored permission name (`module.entity.action`).
pub const PERMISSION_SEGMENTS: usize = 3;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Returns true if `segment` is a valid permission name segment.
pub fn is_permission_segment(segment: &str) -> bool {
    PERMISSION_SEGMENT.is_match(segment)
}

/// Validates a stored permission name: exactly three non-empty lowercase segments.
pub fn validate_permission_name(name: &str) -> Result<(), ValidationError> {
    let segments: Vec<&str> = name.split('.').collect();
    if segments.len() == PERMISSION_SEGMENTS && segments.iter().all(|s| is_permission_segment(s)) {
        Ok(())
    } else {
        Err(error(
            "permission_name",
            "Permission name must have the form module.entity.action",
        ))
    }
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value cannot be blank"))
    } else {
        Ok(())
    }
}

/// Validates a national identity or tax document number, with optional check digit.
pub fn validate_document_number(value: &str) -> Result<(), ValidationError> {
    if DOCUMENT_NUMBER.is_match(value) {
        Ok(())
    } else {
        Err(error(
            "document_number",
            "Document number must be 5-15 digits with an optional check digit",
        ))
    }
}

/// Validates a phone number: optional leading `+` followed by 7-15 digits.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if PHONE_NUMBER.is_match(value) {
        Ok(())
    } else {
        Err(error("phone", "Phone must contain 7-15 digits"))
    }
}

/// Validates a bank account number.
pub fn validate_account_number(value: &str) -> Result<(), ValidationError> {
    if ACCOUNT_NUMBER.is_match(value) {
        Ok(())
    } else {
        Err(error("account_number", "Account number must be 6-20 digits"))
    }
}

/// Validates an ISO 3166 alpha-2 or alpha-3 country code.
pub fn validate_iso_code(value: &str) -> Result<(), ValidationError> {
    if ISO_CODE.is_match(value) {
        Ok(())
    } else {
        Err(error("iso_code", "Code must be 2 or 3 uppercase letters"))
    }
}
