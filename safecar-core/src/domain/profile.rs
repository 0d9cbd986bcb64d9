//! Profiles domain model: person and business profiles

use super::common::StringUuid;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

lazy_static::lazy_static! {
    /// Peruvian national identity document: 8 digits
    pub static ref DNI_REGEX: regex::Regex = regex::Regex::new(r"^\d{8}$").unwrap();
    /// Peruvian mobile number: 9 digits starting with 9
    pub static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^9\d{8}$").unwrap();
    /// Peruvian taxpayer number: 11 digits starting with 10 or 20
    pub static ref RUC_REGEX: regex::Regex = regex::Regex::new(r"^(10|20)\d{9}$").unwrap();
}

/// Profile of a natural person (driver or fleet owner)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PersonProfile {
    pub id: StringUuid,
    pub user_id: StringUuid,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PersonProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Default for PersonProfile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            user_id: StringUuid::new_v4(),
            first_name: String::new(),
            last_name: String::new(),
            dni: String::new(),
            phone: String::new(),
            email: String::new(),
            address: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Profile of a company (workshop or fleet operator)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BusinessProfile {
    pub id: StringUuid,
    pub user_id: StringUuid,
    pub business_name: String,
    pub ruc: String,
    pub phone: String,
    pub address: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            user_id: StringUuid::new_v4(),
            business_name: String::new(),
            ruc: String::new(),
            phone: String::new(),
            address: String::new(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

fn validate_dni(dni: &str) -> Result<(), validator::ValidationError> {
    if DNI_REGEX.is_match(dni) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_dni"))
    }
}

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_phone"))
    }
}

fn validate_ruc(ruc: &str) -> Result<(), validator::ValidationError> {
    if RUC_REGEX.is_match(ruc) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_ruc"))
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreatePersonProfileCommand {
    pub user_id: StringUuid,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(custom(function = "validate_dni"))]
    pub dni: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdatePersonProfileCommand {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Validate)]
pub struct CreateBusinessProfileCommand {
    pub user_id: StringUuid,
    #[validate(length(min = 1, max = 150))]
    pub business_name: String,
    #[validate(custom(function = "validate_ruc"))]
    pub ruc: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateBusinessProfileCommand {
    #[validate(length(min = 1, max = 150))]
    pub business_name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}
