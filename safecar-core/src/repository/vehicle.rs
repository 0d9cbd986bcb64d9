//! Vehicle repository

use super::conflict_on_duplicate;
use crate::domain::{StringUuid, Vehicle};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Vehicle>>;
    async fn find_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>>;
    async fn list(
        &self,
        owner_id: Option<StringUuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Vehicle>>;
    async fn count(&self, owner_id: Option<StringUuid>) -> Result<i64>;
    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

pub struct VehicleRepositoryImpl {
    pool: MySqlPool,
}

impl VehicleRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for VehicleRepositoryImpl {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        sqlx::query(
            r#"
            INSERT INTO vehicles
                (id, owner_id, license_plate, brand, model, year, color, mileage_km, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(vehicle.id)
        .bind(vehicle.owner_id)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.color)
        .bind(vehicle.mileage_km)
        .bind(vehicle.status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_duplicate(
                e,
                format!("Vehicle with plate '{}' already exists", vehicle.license_plate),
            )
        })?;

        self.find_by_id(vehicle.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create vehicle")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, owner_id, license_plate, brand, model, year, color, mileage_km, status,
                   created_at, updated_at
            FROM vehicles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn find_by_plate(&self, license_plate: &str) -> Result<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, owner_id, license_plate, brand, model, year, color, mileage_km, status,
                   created_at, updated_at
            FROM vehicles
            WHERE license_plate = ?
            "#,
        )
        .bind(license_plate)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    async fn list(
        &self,
        owner_id: Option<StringUuid>,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, owner_id, license_plate, brand, model, year, color, mileage_km, status,
                   created_at, updated_at
            FROM vehicles
            WHERE (? IS NULL OR owner_id = ?)
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(owner_id)
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    async fn count(&self, owner_id: Option<StringUuid>) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE (? IS NULL OR owner_id = ?)")
                .bind(owner_id)
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET color = ?, mileage_km = ?, status = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&vehicle.color)
        .bind(vehicle.mileage_km)
        .bind(vehicle.status)
        .bind(vehicle.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Vehicle {} not found",
                vehicle.id
            )));
        }

        self.find_by_id(vehicle.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update vehicle")))
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Vehicle {} not found", id)));
        }

        Ok(())
    }
}
