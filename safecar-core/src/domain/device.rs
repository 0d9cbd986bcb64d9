//! Devices domain model: on-board devices and their telemetry

use super::common::{impl_varchar_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

lazy_static::lazy_static! {
    /// Six hex octets separated by `:` or `-`, or twelve bare hex digits
    static ref MAC_REGEX: regex::Regex =
        regex::Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$|^[0-9A-Fa-f]{12}$").unwrap();
}

/// Normalize a MAC address to upper-case colon form (`AA:BB:CC:DD:EE:FF`).
///
/// Returns `None` when the input is not a MAC address.
pub fn normalize_mac(mac: &str) -> Option<String> {
    let mac = mac.trim();
    if !MAC_REGEX.is_match(mac) {
        return None;
    }
    let hex: String = mac
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let octets: Vec<&str> = (0..6).map(|i| &hex[i * 2..i * 2 + 2]).collect();
    Some(octets.join(":"))
}

fn validate_mac(mac: &str) -> Result<(), validator::ValidationError> {
    match normalize_mac(mac) {
        Some(_) => Ok(()),
        None => Err(validator::ValidationError::new("invalid_mac_address")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    #[default]
    ObdTracker,
    GpsTracker,
    Dashcam,
    Sensor,
}

impl std::str::FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OBD_TRACKER" => Ok(DeviceType::ObdTracker),
            "GPS_TRACKER" => Ok(DeviceType::GpsTracker),
            "DASHCAM" => Ok(DeviceType::Dashcam),
            "SENSOR" => Ok(DeviceType::Sensor),
            _ => Err(format!("Unknown device type: {}", s)),
        }
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::ObdTracker => write!(f, "OBD_TRACKER"),
            DeviceType::GpsTracker => write!(f, "GPS_TRACKER"),
            DeviceType::Dashcam => write!(f, "DASHCAM"),
            DeviceType::Sensor => write!(f, "SENSOR"),
        }
    }
}

impl_varchar_enum!(DeviceType);

/// Lifecycle status of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl std::str::FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(DeviceStatus::Active),
            "INACTIVE" => Ok(DeviceStatus::Inactive),
            "MAINTENANCE" => Ok(DeviceStatus::Maintenance),
            _ => Err(format!("Unknown device status: {}", s)),
        }
    }
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceStatus::Active => write!(f, "ACTIVE"),
            DeviceStatus::Inactive => write!(f, "INACTIVE"),
            DeviceStatus::Maintenance => write!(f, "MAINTENANCE"),
        }
    }
}

impl_varchar_enum!(DeviceStatus);

/// On-board device entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Device {
    pub id: StringUuid,
    pub mac_address: String,
    pub device_type: DeviceType,
    pub status: DeviceStatus,
    pub firmware_version: Option<String>,
    pub vehicle_id: Option<StringUuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Only active devices bound to a vehicle may report telemetry
    pub fn can_report(&self) -> bool {
        self.status == DeviceStatus::Active && self.vehicle_id.is_some()
    }
}

impl Default for Device {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            mac_address: String::new(),
            device_type: DeviceType::default(),
            status: DeviceStatus::default(),
            firmware_version: None,
            vehicle_id: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct RegisterDeviceCommand {
    #[validate(custom(function = "validate_mac"))]
    pub mac_address: String,
    pub device_type: DeviceType,
    #[validate(length(min = 1, max = 50))]
    pub firmware_version: Option<String>,
    pub vehicle_id: Option<StringUuid>,
}

/// A single telemetry reading reported by a device
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TelemetryRecord {
    pub id: StringUuid,
    pub device_id: StringUuid,
    pub vehicle_id: StringUuid,
    pub speed_kmh: f64,
    pub rpm: i32,
    pub engine_temperature_c: f64,
    pub fuel_level_pct: f64,
    pub battery_voltage: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Default for TelemetryRecord {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            device_id: StringUuid::new_v4(),
            vehicle_id: StringUuid::new_v4(),
            speed_kmh: 0.0,
            rpm: 0,
            engine_temperature_c: 0.0,
            fuel_level_pct: 0.0,
            battery_voltage: 0.0,
            latitude: None,
            longitude: None,
            recorded_at: now,
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct RecordTelemetryCommand {
    #[validate(range(min = 0.0, max = 400.0))]
    pub speed_kmh: f64,
    #[validate(range(min = 0, max = 20000))]
    pub rpm: i32,
    #[validate(range(min = -50.0, max = 200.0))]
    pub engine_temperature_c: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub fuel_level_pct: f64,
    #[validate(range(min = 0.0, max = 60.0))]
    pub battery_voltage: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    /// Defaults to the time the reading is received
    pub recorded_at: Option<DateTime<Utc>>,
}
