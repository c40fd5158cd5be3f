//! Priority types used to rank support tickets and provider requests.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::resource::{DeletionPolicy, FilterField, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityType {
    pub name: String,
    /// 1 is the most urgent
    pub level: i32,
    /// Hex color shown in the UI
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePriorityTypeRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,
    #[validate(range(min = 1, max = 10, message = "Level must be between 1 and 10"))]
    pub level: i32,
    #[validate(length(equal = 7, message = "Color must be a #RRGGBB value"))]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePriorityTypeRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 10, message = "Level must be between 1 and 10"))]
    pub level: Option<i32>,
    #[validate(length(equal = 7, message = "Color must be a #RRGGBB value"))]
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub color: Option<Option<String>>,
}

impl Resource for PriorityType {
    const KIND: &'static str = "PriorityType";
    const TABLE: &'static str = "priority_types";
    const DELETION: DeletionPolicy = DeletionPolicy::Hard;
    const FILTERS: &'static [FilterField] =
        &[FilterField::contains("name"), FilterField::exact("level")];

    type Create = CreatePriorityTypeRequest;
    type Update = UpdatePriorityTypeRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            name: input.name,
            level: input.level,
            color: input.color,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}
