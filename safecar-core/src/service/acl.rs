//! Cross-context facades.
//!
//! A context never touches another context's repositories. It asks the
//! owning context through one of these traits instead.

use crate::domain::{StringUuid, TelemetryRecord, VehicleSnapshot};
use crate::error::Result;
use async_trait::async_trait;

/// Read access to IAM users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IamContextFacade: Send + Sync {
    async fn user_exists(&self, user_id: StringUuid) -> Result<bool>;
    async fn fetch_username(&self, user_id: StringUuid) -> Result<Option<String>>;
}

/// Read access to fleet vehicles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceManagementContextFacade: Send + Sync {
    async fn vehicle_exists(&self, vehicle_id: StringUuid) -> Result<bool>;
    async fn fetch_vehicle(&self, vehicle_id: StringUuid) -> Result<Option<VehicleSnapshot>>;
}

/// Read access to device telemetry
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DevicesContextFacade: Send + Sync {
    /// Newest first, at most `limit` records
    async fn recent_telemetry_for_vehicle(
        &self,
        vehicle_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>>;
}
