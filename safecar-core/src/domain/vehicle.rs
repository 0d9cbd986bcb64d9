//! Device management domain model: vehicles and drivers

use super::common::{impl_varchar_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

lazy_static::lazy_static! {
    /// License plate after upper-casing, e.g. `ABC-123` or `A1B-2345`
    pub static ref PLATE_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Z0-9]{3}-?[A-Z0-9]{3,4}$").unwrap();
}

/// Upper-case and trim a license plate before storing or looking it up
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

fn validate_plate(plate: &str) -> Result<(), validator::ValidationError> {
    if PLATE_REGEX.is_match(&normalize_plate(plate)) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_license_plate"))
    }
}

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    Active,
    InMaintenance,
    Inactive,
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(VehicleStatus::Active),
            "IN_MAINTENANCE" => Ok(VehicleStatus::InMaintenance),
            "INACTIVE" => Ok(VehicleStatus::Inactive),
            _ => Err(format!("Unknown vehicle status: {}", s)),
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleStatus::Active => write!(f, "ACTIVE"),
            VehicleStatus::InMaintenance => write!(f, "IN_MAINTENANCE"),
            VehicleStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl_varchar_enum!(VehicleStatus);

/// Vehicle entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vehicle {
    pub id: StringUuid,
    pub owner_id: StringUuid,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: Option<String>,
    pub mileage_km: i64,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Vehicle {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            owner_id: StringUuid::new_v4(),
            license_plate: String::new(),
            brand: String::new(),
            model: String::new(),
            year: 2020,
            color: None,
            mileage_km: 0,
            status: VehicleStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Read-only view of a vehicle handed to other contexts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleSnapshot {
    pub id: StringUuid,
    pub owner_id: StringUuid,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub mileage_km: i64,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id,
            owner_id: vehicle.owner_id,
            license_plate: vehicle.license_plate.clone(),
            brand: vehicle.brand.clone(),
            model: vehicle.model.clone(),
            year: vehicle.year,
            mileage_km: vehicle.mileage_km,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct RegisterVehicleCommand {
    pub owner_id: StringUuid,
    #[validate(custom(function = "validate_plate"))]
    pub license_plate: String,
    #[validate(length(min = 1, max = 60))]
    pub brand: String,
    #[validate(length(min = 1, max = 60))]
    pub model: String,
    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,
    #[validate(length(max = 30))]
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub mileage_km: i64,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateVehicleCommand {
    #[validate(length(max = 30))]
    pub color: Option<String>,
    #[validate(range(min = 0))]
    pub mileage_km: Option<i64>,
    pub status: Option<VehicleStatus>,
}

/// Driver entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Driver {
    pub id: StringUuid,
    pub user_id: StringUuid,
    pub full_name: String,
    pub dni: String,
    pub license_number: String,
    pub phone: String,
    pub vehicle_id: Option<StringUuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Driver {
    pub fn is_assigned(&self) -> bool {
        self.vehicle_id.is_some()
    }
}

impl Default for Driver {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            user_id: StringUuid::new_v4(),
            full_name: String::new(),
            dni: String::new(),
            license_number: String::new(),
            phone: String::new(),
            vehicle_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

fn validate_dni(dni: &str) -> Result<(), validator::ValidationError> {
    if super::profile::DNI_REGEX.is_match(dni) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_dni"))
    }
}

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if super::profile::PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_phone"))
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreateDriverCommand {
    pub user_id: StringUuid,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(custom(function = "validate_dni"))]
    pub dni: String,
    #[validate(length(min = 5, max = 20))]
    pub license_number: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
}
