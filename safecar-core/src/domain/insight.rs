//! Insights domain model: AI generated vehicle health reports

use super::common::{impl_varchar_enum, StringUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            "CRITICAL" => Ok(RiskLevel::Critical),
            _ => Err(format!("Unknown risk level: {}", s)),
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl_varchar_enum!(RiskLevel);

/// Persisted insight for a vehicle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VehicleInsight {
    pub id: StringUuid,
    pub vehicle_id: StringUuid,
    /// Plate at generation time
    pub license_plate: String,
    pub risk_level: RiskLevel,
    pub maintenance_summary: String,
    pub driving_summary: String,
    #[sqlx(json)]
    pub recommendations: Vec<String>,
    /// Number of telemetry records the report was generated from
    pub telemetry_samples: i32,
    pub created_at: DateTime<Utc>,
}

impl Default for VehicleInsight {
    fn default() -> Self {
        Self {
            id: StringUuid::new_v4(),
            vehicle_id: StringUuid::new_v4(),
            license_plate: String::new(),
            risk_level: RiskLevel::default(),
            maintenance_summary: String::new(),
            driving_summary: String::new(),
            recommendations: vec![],
            telemetry_samples: 0,
            created_at: Utc::now(),
        }
    }
}

/// Structured answer expected from the generative model
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InsightDraft {
    pub risk_level: RiskLevel,
    pub maintenance_summary: String,
    pub driving_summary: String,
    #[serde(default)]
    pub recommendations: Vec<String>,
}
