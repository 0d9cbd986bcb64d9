//! Device repository

use super::conflict_on_duplicate;
use crate::domain::{Device, DeviceStatus, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    async fn create(&self, device: &Device) -> Result<Device>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Device>>;
    async fn find_by_mac(&self, mac_address: &str) -> Result<Option<Device>>;
    async fn list(
        &self,
        vehicle_id: Option<StringUuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Device>>;
    async fn count(&self, vehicle_id: Option<StringUuid>) -> Result<i64>;
    async fn set_vehicle(&self, id: StringUuid, vehicle_id: Option<StringUuid>) -> Result<Device>;
    async fn set_status(&self, id: StringUuid, status: DeviceStatus) -> Result<Device>;
    /// Detach every device from a vehicle, returning how many were detached
    async fn clear_vehicle(&self, vehicle_id: StringUuid) -> Result<u64>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct DeviceRepositoryImpl {
    pool: MySqlPool,
}

impl DeviceRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn reload(&self, id: StringUuid) -> Result<Device> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device {} not found", id)))
    }
}

#[async_trait]
impl DeviceRepository for DeviceRepositoryImpl {
    async fn create(&self, device: &Device) -> Result<Device> {
        sqlx::query(
            r#"
            INSERT INTO devices
                (id, mac_address, device_type, status, firmware_version, vehicle_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(device.id)
        .bind(&device.mac_address)
        .bind(device.device_type)
        .bind(device.status)
        .bind(&device.firmware_version)
        .bind(device.vehicle_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_duplicate(
                e,
                format!("Device with MAC '{}' already exists", device.mac_address),
            )
        })?;

        self.reload(device.id).await
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            SELECT id, mac_address, device_type, status, firmware_version, vehicle_id,
                   created_at, updated_at
            FROM devices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(device)
    }

    async fn find_by_mac(&self, mac_address: &str) -> Result<Option<Device>> {
        let device = sqlx::query_as::<_, Device>(
            r#"
            SELECT id, mac_address, device_type, status, firmware_version, vehicle_id,
                   created_at, updated_at
            FROM devices
            WHERE mac_address = ?
            "#,
        )
        .bind(mac_address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(device)
    }

    async fn list(
        &self,
        vehicle_id: Option<StringUuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            r#"
            SELECT id, mac_address, device_type, status, firmware_version, vehicle_id,
                   created_at, updated_at
            FROM devices
            WHERE (? IS NULL OR vehicle_id = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(vehicle_id)
        .bind(vehicle_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }

    async fn count(&self, vehicle_id: Option<StringUuid>) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM devices WHERE (? IS NULL OR vehicle_id = ?)")
                .bind(vehicle_id)
                .bind(vehicle_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    async fn set_vehicle(&self, id: StringUuid, vehicle_id: Option<StringUuid>) -> Result<Device> {
        let result =
            sqlx::query("UPDATE devices SET vehicle_id = ?, updated_at = NOW() WHERE id = ?")
                .bind(vehicle_id)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Device {} not found", id)));
        }

        self.reload(id).await
    }

    async fn clear_vehicle(&self, vehicle_id: StringUuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE devices SET vehicle_id = NULL, updated_at = NOW() WHERE vehicle_id = ?",
        )
        .bind(vehicle_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn set_status(&self, id: StringUuid, status: DeviceStatus) -> Result<Device> {
        let result = sqlx::query("UPDATE devices SET status = ?, updated_at = NOW() WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Device {} not found", id)));
        }

        self.reload(id).await
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM devices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Device {} not found", id)));
        }

        Ok(())
    }
}
