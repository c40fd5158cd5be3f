//! Platform user domain models.
//!
//! Credentials and sessions belong to the authentication service; this
//! record carries the profile administrators manage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::resource::{check_optional, DeletionPolicy, FilterField, Resource};

/// Which part of the platform a user belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSegment {
    Admin,
    Provider,
    App,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub document_number: Option<String>,
    pub segment: UserSegment,
    /// Owning commerce for provider users
    pub commerce_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
    #[validate(custom(function = "shared::validation::validate_document_number"))]
    pub document_number: Option<String>,
    pub segment: UserSegment,
    pub commerce_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Checked by [`User::check`] once applied
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub document_number: Option<Option<String>>,
    pub segment: Option<UserSegment>,
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub commerce_id: Option<Option<Uuid>>,
}

impl Resource for User {
    const KIND: &'static str = "User";
    const TABLE: &'static str = "users";
    const DELETION: DeletionPolicy = DeletionPolicy::Soft;
    const FILTERS: &'static [FilterField] = &[
        FilterField::contains("first_name"),
        FilterField::contains("last_name"),
        FilterField::contains("email"),
        FilterField::exact("document_number"),
        FilterField::exact("segment"),
        FilterField::exact("commerce_id"),
    ];

    type Create = CreateUserRequest;
    type Update = UpdateUserRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email.to_lowercase(),
            phone: input.phone,
            document_number: input.document_number,
            segment: input.segment,
            commerce_id: input.commerce_id,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email.to_lowercase();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(document_number) = patch.document_number {
            self.document_number = document_number;
        }
        if let Some(segment) = patch.segment {
            self.segment = segment;
        }
        if let Some(commerce_id) = patch.commerce_id {
            self.commerce_id = commerce_id;
        }
    }

    fn check(&self) -> crate::DomainResult<()> {
        if self.segment == UserSegment::Provider && self.commerce_id.is_none() {
            return Err(crate::DomainError::invalid_field(
                "commerce_id",
                "Provider users must belong to a commerce",
            ));
        }
        check_optional(
            "phone",
            self.phone.as_deref(),
            shared::validation::validate_phone,
        )?;
        check_optional(
            "document_number",
            self.document_number.as_deref(),
            shared::validation::validate_document_number,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request(segment: UserSegment) -> CreateUserRequest {
        CreateUserRequest {
            first_name: "Ana".to_string(),
            last_name: "Gómez".to_string(),
            email: "Ana.Gomez@Example.com".to_string(),
            phone: Some("+573001234567".to_string()),
            document_number: None,
            segment,
            commerce_id: None,
        }
    }

    #[test]
    fn test_create_normalizes_email() {
        let user = User::create(create_request(UserSegment::Admin));
        assert_eq!(user.email, "ana.gomez@example.com");
    }

    #[test]
    fn test_provider_requires_commerce() {
        let user = User::create(create_request(UserSegment::Provider));
        assert!(user.check().is_err());

        let mut request = create_request(UserSegment::Provider);
        request.commerce_id = Some(Uuid::new_v4());
        assert!(User::create(request).check().is_ok());
    }

    #[test]
    fn test_optional_fields_validated_when_present() {
        let mut request = create_request(UserSegment::App);
        request.phone = Some("12".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_patch_clears_optional_fields() {
        let mut request = create_request(UserSegment::Provider);
        request.commerce_id = Some(Uuid::new_v4());
        let mut user = User::create(request);

        let patch: UpdateUserRequest =
            serde_json::from_str(r#"{"phone":null,"segment":"app","commerce_id":null}"#).unwrap();
        user.apply(patch);
        assert!(user.phone.is_none());
        assert!(user.commerce_id.is_none());
        assert!(user.check().is_ok());

        // Absent keys leave values alone
        let patch: UpdateUserRequest = serde_json::from_str(r#"{"first_name":"Ana María"}"#).unwrap();
        user.phone = Some("+573001234567".to_string());
        user.apply(patch);
        assert_eq!(user.phone.as_deref(), Some("+573001234567"));
    }

    #[test]
    fn test_patched_phone_is_checked() {
        let mut user = User::create(create_request(UserSegment::App));
        user.apply(UpdateUserRequest {
            phone: Some(Some("12".to_string())),
            ..Default::default()
        });
        match user.check() {
            Err(crate::DomainError::Validation { fields, .. }) => {
                assert_eq!(fields[0].field, "phone")
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
    }
}
