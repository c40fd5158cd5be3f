//! Commerce (provider) domain models.
//!
//! A commerce registers as `pending` and is validated by an administrator,
//! who approves or rejects it. A rejected commerce may resubmit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::resource::{DeletionPolicy, FilterField, Resource};

/// Validation state of a provider registration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommerceStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl CommerceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommerceStatus::Pending => "pending",
            CommerceStatus::Approved => "approved",
            CommerceStatus::Rejected => "rejected",
        }
    }

    /// Whether a commerce in this state may move to `next`.
    pub fn can_transition_to(&self, next: CommerceStatus) -> bool {
        matches!(
            (self, next),
            (CommerceStatus::Pending, CommerceStatus::Approved)
                | (CommerceStatus::Pending, CommerceStatus::Rejected)
                | (CommerceStatus::Rejected, CommerceStatus::Pending)
        )
    }
}

impl std::fmt::Display for CommerceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commerce {
    pub name: String,
    /// Tax identification number
    pub nit: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub city_id: Option<Uuid>,
    pub status: CommerceStatus,
    pub review_reason: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommerceRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: String,
    #[validate(custom(function = "shared::validation::validate_document_number"))]
    pub nit: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: String,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    pub city_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCommerceRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be 1-150 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,
    /// `null` clears the address
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub city_id: Option<Option<Uuid>>,
}

/// Administrator decision on a pending commerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

impl ReviewDecision {
    pub fn target_status(&self) -> CommerceStatus {
        match self {
            ReviewDecision::Approve => CommerceStatus::Approved,
            ReviewDecision::Reject => CommerceStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewCommerceRequest {
    pub decision: ReviewDecision,
    #[validate(length(max = 1000, message = "Reason must be at most 1000 characters"))]
    pub reason: Option<String>,
}

impl Resource for Commerce {
    const KIND: &'static str = "Commerce";
    const TABLE: &'static str = "commerces";
    const DELETION: DeletionPolicy = DeletionPolicy::Soft;
    const FILTERS: &'static [FilterField] = &[
        FilterField::contains("name"),
        FilterField::exact("nit"),
        FilterField::contains("email"),
        FilterField::exact("status"),
        FilterField::exact("city_id"),
    ];

    type Create = CreateCommerceRequest;
    type Update = UpdateCommerceRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            name: input.name,
            nit: input.nit,
            email: input.email.to_lowercase(),
            phone: input.phone,
            address: input.address,
            city_id: input.city_id,
            status: CommerceStatus::Pending,
            review_reason: None,
            reviewed_at: None,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email.to_lowercase();
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(city_id) = patch.city_id {
            self.city_id = city_id;
        }
    }
}
