//! Workshop domain model: workshops and service appointments

use super::common::{impl_varchar_enum, StringUuid};
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Workshop entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Workshop {
    pub id: StringUuid,
    pub owner_id: StringUuid,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Workshop {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            owner_id: StringUuid::new_v4(),
            name: String::new(),
            address: String::new(),
            phone: String::new(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }
}

fn validate_phone(phone: &str) -> std::result::Result<(), validator::ValidationError> {
    if super::profile::PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_phone"))
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreateWorkshopCommand {
    pub owner_id: StringUuid,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(length(min = 1, max = 255))]
    pub address: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateWorkshopCommand {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub address: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Appointment lifecycle.
///
/// ```text
/// PENDING ──> CONFIRMED ──> IN_PROGRESS ──> COMPLETED
///    │            │
///    └────────────┴──> CANCELLED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn can_transition_to(self, target: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    /// Only appointments that have not started may be moved
    pub fn is_reschedulable(self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(AppointmentStatus::Pending),
            "CONFIRMED" => Ok(AppointmentStatus::Confirmed),
            "IN_PROGRESS" => Ok(AppointmentStatus::InProgress),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            _ => Err(format!("Unknown appointment status: {}", s)),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "PENDING"),
            AppointmentStatus::Confirmed => write!(f, "CONFIRMED"),
            AppointmentStatus::InProgress => write!(f, "IN_PROGRESS"),
            AppointmentStatus::Completed => write!(f, "COMPLETED"),
            AppointmentStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl_varchar_enum!(AppointmentStatus);

/// Service appointment entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: StringUuid,
    pub workshop_id: StringUuid,
    pub vehicle_id: StringUuid,
    pub customer_id: StringUuid,
    pub scheduled_at: DateTime<Utc>,
    pub service_type: String,
    pub description: Option<String>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Move to `target`, or fail with `Conflict` when the lifecycle forbids it
    pub fn transition_to(&mut self, target: AppointmentStatus) -> Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(AppError::Conflict(format!(
                "Cannot transition appointment from {} to {}",
                self.status, target
            )));
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl Default for Appointment {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: StringUuid::new_v4(),
            workshop_id: StringUuid::new_v4(),
            vehicle_id: StringUuid::new_v4(),
            customer_id: StringUuid::new_v4(),
            scheduled_at: now,
            service_type: String::new(),
            description: None,
            status: AppointmentStatus::default(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct CreateAppointmentCommand {
    pub workshop_id: StringUuid,
    pub vehicle_id: StringUuid,
    pub customer_id: StringUuid,
    pub scheduled_at: DateTime<Utc>,
    #[validate(length(min = 1, max = 100))]
    pub service_type: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}
