//! Generic paginated-resource model.
//!
//! Every administrable entity (commerces, users, geography, ...) implements
//! [`Resource`] and is stored as a [`Record`]: the entity's own fields plus
//! identity, timestamps and the soft-delete flag.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};

/// How `delete` treats a record. Declared per resource, never inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPolicy {
    /// Keep the row, flag it inactive and hide it from default listings
    Soft,
    /// Remove the row
    Hard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    /// Case-insensitive substring
    Contains,
}

/// A filterable field declared by a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterField {
    pub field: &'static str,
    pub mode: MatchMode,
}

impl FilterField {
    pub const fn exact(field: &'static str) -> Self {
        Self {
            field,
            mode: MatchMode::Exact,
        }
    }

    pub const fn contains(field: &'static str) -> Self {
        Self {
            field,
            mode: MatchMode::Contains,
        }
    }
}

/// An administrable entity.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable name used in errors and logs
    const KIND: &'static str;
    /// Backing table
    const TABLE: &'static str;
    const DELETION: DeletionPolicy;
    const FILTERS: &'static [FilterField];

    type Create: Validate + DeserializeOwned + Send + Sync + 'static;
    type Update: Validate + DeserializeOwned + Send + Sync + 'static;

    fn create(input: Self::Create) -> Self;

    fn apply(&mut self, patch: Self::Update);

    /// Cross-field rules that `validator` attributes cannot express.
    fn check(&self) -> DomainResult<()> {
        Ok(())
    }
}

/// Runs a field validator on an optional value that patches may clear.
pub fn check_optional(
    field: &str,
    value: Option<&str>,
    validate: fn(&str) -> Result<(), validator::ValidationError>,
) -> DomainResult<()> {
    match value.map(validate) {
        Some(Err(err)) => {
            let message = err
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            Err(DomainError::invalid_field(field, message))
        }
        _ => Ok(()),
    }
}

/// A stored resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: T,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<T> Record<T> {
    pub fn new(data: T, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// One normalized filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    pub field: &'static str,
    pub mode: MatchMode,
    pub value: String,
}

/// Filter applied by resource listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    pub conditions: Vec<FilterCondition>,
    /// Include soft-deleted records
    pub with_inactive: bool,
}

impl ResourceFilter {
    /// Keeps only the fields `R` declares; unknown keys and blank values are ignored.
    pub fn from_params<R: Resource>(params: &HashMap<String, String>, with_inactive: bool) -> Self {
        let conditions = R::FILTERS
            .iter()
            .filter_map(|filter| {
                let value = params.get(filter.field)?.trim();
                (!value.is_empty()).then(|| FilterCondition {
                    field: filter.field,
                    mode: filter.mode,
                    value: value.to_string(),
                })
            })
            .collect();

        Self {
            conditions,
            with_inactive,
        }
    }

    /// Evaluates the filter against a record's serialized data.
    pub fn matches(&self, is_active: bool, data: &serde_json::Value) -> bool {
        if !is_active && !self.with_inactive {
            return false;
        }

        self.conditions.iter().all(|condition| {
            let Some(actual) = data.get(condition.field).and_then(scalar_text) else {
                return false;
            };
            match condition.mode {
                MatchMode::Exact => actual == condition.value,
                MatchMode::Contains => actual
                    .to_lowercase()
                    .contains(&condition.value.to_lowercase()),
            }
        })
    }
}

/// Text form of a JSON scalar, matching PostgreSQL's `->>` operator.
fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
