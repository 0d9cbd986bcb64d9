//! Telemetry repository

use crate::domain::{StringUuid, TelemetryRecord};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetryRepository: Send + Sync {
    async fn create(&self, record: &TelemetryRecord) -> Result<TelemetryRecord>;
    /// Most recent readings of a device, newest first
    async fn list_by_device(&self, device_id: StringUuid, limit: i64)
        -> Result<Vec<TelemetryRecord>>;
    /// Most recent readings of a vehicle across all its devices, newest first
    async fn list_by_vehicle(
        &self,
        vehicle_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>>;
}

pub struct TelemetryRepositoryImpl {
    pool: MySqlPool,
}

impl TelemetryRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TelemetryRepository for TelemetryRepositoryImpl {
    async fn create(&self, record: &TelemetryRecord) -> Result<TelemetryRecord> {
        sqlx::query(
            r#"
            INSERT INTO telemetry_records
                (id, device_id, vehicle_id, speed_kmh, rpm, engine_temperature_c, fuel_level_pct,
                 battery_voltage, latitude, longitude, recorded_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id)
        .bind(record.device_id)
        .bind(record.vehicle_id)
        .bind(record.speed_kmh)
        .bind(record.rpm)
        .bind(record.engine_temperature_c)
        .bind(record.fuel_level_pct)
        .bind(record.battery_voltage)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.recorded_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record.clone())
    }

    async fn list_by_device(
        &self,
        device_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>> {
        let records = sqlx::query_as::<_, TelemetryRecord>(
            r#"
            SELECT id, device_id, vehicle_id, speed_kmh, rpm, engine_temperature_c, fuel_level_pct,
                   battery_voltage, latitude, longitude, recorded_at, created_at
            FROM telemetry_records
            WHERE device_id = ?
            ORDER BY recorded_at DESC
            LIMIT ?
            "#,
        )
        .bind(device_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_by_vehicle(
        &self,
        vehicle_id: StringUuid,
        limit: i64,
    ) -> Result<Vec<TelemetryRecord>> {
        let records = sqlx::query_as::<_, TelemetryRecord>(
            r#"
            SELECT id, device_id, vehicle_id, speed_kmh, rpm, engine_temperature_c, fuel_level_pct,
                   battery_voltage, latitude, longitude, recorded_at, created_at
            FROM telemetry_records
            WHERE vehicle_id = ?
            ORDER BY recorded_at DESC
            LIMIT ?
            "#,
        )
        .bind(vehicle_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
