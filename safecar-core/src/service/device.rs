//! Devices business logic: device registry and telemetry intake

use crate::domain::{
    normalize_mac, Device, DeviceStatus, RecordTelemetryCommand, RegisterDeviceCommand,
    StringUuid, TelemetryRecord,
};
use crate::error::{AppError, Result};
use crate::repository::{DeviceRepository, TelemetryRepository};
use crate::service::acl::{DeviceManagementContextFacade, DevicesContextFacade};
use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// Upper bound on telemetry rows returned by a single query
pub const MAX_TELEMETRY_LIMIT: i64 = 500;

pub struct DeviceService<D: DeviceRepository, T: TelemetryRepository> {
    repo: Arc<D>,
    telemetry_repo: Arc<T>,
    vehicles: Arc<dyn DeviceManagementContextFacade>,
}

impl<D: DeviceRepository, T: TelemetryRepository> DeviceService<D, T> {
    pub fn new(
        repo: Arc<D>,
        telemetry_repo: Arc<T>,
        vehicles: Arc<dyn DeviceManagementContextFacade>,
    ) -> Self {
        Self {
            repo,
            telemetry_repo,
            vehicles,
        }
    }

    async fn ensure_vehicle_exists(&self, vehicle_id: StringUuid) -> Result<()> {
        if !self.vehicles.vehicle_exists(vehicle_id).await? {
            return Err(AppError::NotFound(format!("Vehicle {} not found", vehicle_id)));
        }
        Ok(())
    }

    pub async fn register(&self, cmd: RegisterDeviceCommand) -> Result<Device> {
        cmd.validate()?;
        let mac_address = normalize_mac(&cmd.mac_address)
            .ok_or_else(|| AppError::Validation("mac_address: invalid_mac_address".to_string()))?;

        if self.repo.find_by_mac(&mac_address).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Device with MAC '{}' already exists",
                mac_address
            )));
        }
        if let Some(vehicle_id) = cmd.vehicle_id {
            self.ensure_vehicle_exists(vehicle_id).await?;
        }

        let now = Utc::now();
        let device = Device {
            id: StringUuid::new_v4(),
            mac_address,
            device_type: cmd.device_type,
            status: DeviceStatus::Active,
            firmware_version: cmd.firmware_version,
            vehicle_id: cmd.vehicle_id,
            created_at: now,
            updated_at: now,
        };
        let device = self.repo.create(&device).await?;
        info!(device_id = %device.id, mac = %device.mac_address, "Device registered");
        Ok(device)
    }

    pub async fn get(&self, id: StringUuid) -> Result<Device> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))
    }

    pub async fn get_by_mac(&self, mac_address: &str) -> Result<Device> {
        let mac = normalize_mac(mac_address)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid MAC address '{}'", mac_address)))?;
        self.repo
            .find_by_mac(&mac)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device with MAC '{}' not found", mac)))
    }

    pub async fn list(
        &self,
        vehicle_id: Option<StringUuid>,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Device>, i64)> {
        let offset = super::page_offset(page, per_page);
        let devices = self.repo.list(vehicle_id, offset, per_page).await?;
        let total = self.repo.count(vehicle_id).await?;
        Ok((devices, total))
    }

    pub async fn assign_to_vehicle(
        &self,
        device_id: StringUuid,
        vehicle_id: StringUuid,
    ) -> Result<Device> {
        self.get(device_id).await?;
        self.ensure_vehicle_exists(vehicle_id).await?;
        let device = self.repo.set_vehicle(device_id, Some(vehicle_id)).await?;
        info!(device_id = %device_id, vehicle_id = %vehicle_id, "Device assigned to vehicle");
        Ok(device)
    }

    pub async fn unassign(&self, device_id: StringUuid) -> Result<Device> {
        let device = self.get(device_id).await?;
        if device.vehicle_id.is_none() {
            return Ok(device);
        }
        self.repo.set_vehicle(device_id, None).await
    }

    pub async fn release_vehicle(&self, vehicle_id: StringUuid) -> Result<u64> {
        let released = self.repo.clear_vehicle(vehicle_id).await?;
        if released > 0 {
            info!(vehicle_id = %vehicle_id, released, "Devices released from vehicle");
        }
        Ok(released)
    }

    pub async fn update_status(&self, device_id: StringUuid, status: DeviceStatus) -> Result<Device> {
        let device = self.get(device_id).await?;
        if device.status == status {
            return Ok(device);
        }
        let device = self.repo.set_status(device_id, status).await?;
        info!(device_id = %device_id, status = %status, "Device status changed");
        Ok(device)
    }

    pub async fn delete(&self, id: StringUuid) -> Result<()> {
        self.repo.delete(id).await
    }

    pub async fn record_telemetry(
        &self,
        device_id: StringUuid,
        cmd: RecordTelemetryCommand,
    ) -> Result<TelemetryRecord> {
        cmd.validate()?;
        let device = self.get(device_id).await?;

        if device.status != DeviceStatus::Active {
            return Err(AppError::Conflict(format!(
                "Device {} is {} and cannot report telemetry",
                device_id, device.status
            )));
        }
        let vehicle_id = device.vehicle_id.ok_or_else(|| {
            AppError::Conflict(format!(
                "Device {} is not assigned to a vehicle",
                device_id
            ))
        })?;

        let now = Utc::now();
        let record = TelemetryRecord {
            id: StringUuid::new_v4(),
            device_id,
            vehicle_id,
            speed_kmh: cmd.speed_kmh,
            rpm: cmd.rpm,
            engine_temperature_c: cmd.engine_temperature_c,
            fuel_level_pct: cmd.fuel_level_pct,
            battery_voltage: cmd.battery_voltage,
            latitude: cmd.latitude,
            longitude: cmd.longitude,
            recorded_at: cmd.recorded_at.unwrap_or(now),
            created_at: now,
        };
        let record = self.telemetry_repo.create(&record).await?;
        counter!("safecar_telemetry_records_total").increment(1);
        debug!(device_id = %device_id, vehicle_id = %vehicle_id, "Telemetry recorded");
        Ok(record)
    }

    pub async fn list_telemetry(
        &self,
        device_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>> {
        self.get(device_id).await?;
        self.telemetry_repo
            .list_by_device(device_id, limit.clamp(1, MAX_TELEMETRY_LIMIT))
            .await
    }
}

#[async_trait]
impl<D, T> DevicesContextFacade for DeviceService<D, T>
where
    D: DeviceRepository + 'static,
    T: TelemetryRepository + 'static,
{
    async fn recent_telemetry_for_vehicle(
        &self,
        vehicle_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>> {
        self.telemetry_repo
            .list_by_vehicle(vehicle_id, limit.clamp(1, MAX_TELEMETRY_LIMIT))
            .await
    }
}
