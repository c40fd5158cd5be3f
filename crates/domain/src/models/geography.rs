//! Geographic parametrization: countries, departments, cities, neighborhoods.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::resource::{DeletionPolicy, FilterField, Resource};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub name: String,
    /// ISO 3166 alpha-2 or alpha-3 code
    pub iso_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCountryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(custom(function = "shared::validation::validate_iso_code"))]
    pub iso_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCountryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_iso_code"))]
    pub iso_code: Option<String>,
}

impl Resource for Country {
    const KIND: &'static str = "Country";
    const TABLE: &'static str = "countries";
    const DELETION: DeletionPolicy = DeletionPolicy::Hard;
    const FILTERS: &'static [FilterField] =
        &[FilterField::contains("name"), FilterField::exact("iso_code")];

    type Create = CreateCountryRequest;
    type Update = UpdateCountryRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            name: input.name,
            iso_code: input.iso_code,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(iso_code) = patch.iso_code {
            self.iso_code = iso_code;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub country_id: Uuid,
    pub name: String,
    /// Official administrative code (e.g. DANE code)
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    pub country_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 10, message = "Code must be at most 10 characters"))]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    pub country_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 10, message = "Code must be at most 10 characters"))]
    #[serde(default, deserialize_with = "shared::nullable::deserialize")]
    pub code: Option<Option<String>>,
}

impl Resource for Department {
    const KIND: &'static str = "Department";
    const TABLE: &'static str = "departments";
    const DELETION: DeletionPolicy = DeletionPolicy::Hard;
    const FILTERS: &'static [FilterField] = &[
        FilterField::contains("name"),
        FilterField::exact("country_id"),
        FilterField::exact("code"),
    ];

    type Create = CreateDepartmentRequest;
    type Update = UpdateDepartmentRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            country_id: input.country_id,
            name: input.name,
            code: input.code,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(country_id) = patch.country_id {
            self.country_id = country_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub department_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCityRequest {
    pub department_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCityRequest {
    pub department_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
}

impl Resource for City {
    const KIND: &'static str = "City";
    const TABLE: &'static str = "cities";
    const DELETION: DeletionPolicy = DeletionPolicy::Hard;
    const FILTERS: &'static [FilterField] =
        &[FilterField::contains("name"), FilterField::exact("department_id")];

    type Create = CreateCityRequest;
    type Update = UpdateCityRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            department_id: input.department_id,
            name: input.name,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(department_id) = patch.department_id {
            self.department_id = department_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub city_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNeighborhoodRequest {
    pub city_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateNeighborhoodRequest {
    pub city_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
}

impl Resource for Neighborhood {
    const KIND: &'static str = "Neighborhood";
    const TABLE: &'static str = "neighborhoods";
    const DELETION: DeletionPolicy = DeletionPolicy::Hard;
    const FILTERS: &'static [FilterField] =
        &[FilterField::contains("name"), FilterField::exact("city_id")];

    type Create = CreateNeighborhoodRequest;
    type Update = UpdateNeighborhoodRequest;

    fn create(input: Self::Create) -> Self {
        Self {
            city_id: input.city_id,
            name: input.name,
        }
    }

    fn apply(&mut self, patch: Self::Update) {
        if let Some(city_id) = patch.city_id {
            self.city_id = city_id;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_request_validation() {
        let request = CreateCountryRequest {
            name: "Colombia".to_string(),
            iso_code: "CO".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = CreateCountryRequest {
            name: "Colombia".to_string(),
            iso_code: "colombia".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_department_apply_keeps_absent_fields() {
        let mut department = Department::create(CreateDepartmentRequest {
            country_id: Uuid::new_v4(),
            name: "Antioquia".to_string(),
            code: Some("05".to_string()),
        });
        department.apply(UpdateDepartmentRequest {
            name: Some("Antioquia (ANT)".to_string()),
            ..Default::default()
        });
        assert_eq!(department.name, "Antioquia (ANT)");
        assert_eq!(department.code.as_deref(), Some("05"));
    }

    #[test]
    fn test_geography_is_hard_deleted() {
        assert_eq!(Country::DELETION, DeletionPolicy::Hard);
        assert_eq!(Department::DELETION, DeletionPolicy::Hard);
        assert_eq!(City::DELETION, DeletionPolicy::Hard);
        assert_eq!(Neighborhood::DELETION, DeletionPolicy::Hard);
    }
}
