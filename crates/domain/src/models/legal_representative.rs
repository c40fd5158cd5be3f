//! Legal representative of a commerce.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::resource::{check_optional, DeletionPolicy, FilterField, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Cédula de ciudadanía
    Cc,
    /// Cédula de extranjería
    Ce,
    Passport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalRepresentative {
    pub commerce_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLegalRepresentativeRequest {
    pub commerce_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub document_type: DocumentType,
    #[validate(custom(function = "shared::validation::validate_document_number"))]
    pub document_number: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateLegalRepresentativeRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,
    pub document_type: Option<DocumentType>,
    #[validate(custom(function = "shared::validation::validate_document_number"))]
    pub document_number: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    /// Checked by [`LegalRepresentative::check`] once applied
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub phone: Option<Option<String>>,
}

impl Resource for LegalRepresentative {
    const KIND: &'static str = "LegalRepresentative";
    const TABLE: &'static str = "legal_representatives";
    const DELETION: DeletionPolicy = DeletionPolicy::Hard;
    const FILTERS: &'static [FilterField] = &[
        FilterField::exact("commerce_id"),
        FilterField::exact("document_number"),
        FilterField::contains("last_name"),
    ];

    type Create = CreateLegalRepresentativeRequest;
    type Update = UpdateLegalRepresentativeRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            commerce_id: input.commerce_id,
            first_name: input.first_name,
            last_name: input.last_name,
            document_type: input.document_type,
            document_number: input.document_number,
            email: input.email.to_lowercase(),
            phone: input.phone,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(document_type) = patch.document_type {
            self.document_type = document_type;
        }
        if let Some(document_number) = patch.document_number {
            self.document_number = document_number;
        }
        if let Some(email) = patch.email {
            self.email = email.to_lowercase();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
    }

    fn check(&self) -> crate::DomainResult<()> {
        check_optional(
            "phone",
            self.phone.as_deref(),
            shared::validation::validate_phone,
        )
    }
}
