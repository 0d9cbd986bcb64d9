//! Driver repository

use super::conflict_on_duplicate;
use crate::domain::{Driver, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn create(&self, driver: &Driver) -> Result<Driver>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Driver>>;
    async fn find_by_dni(&self, dni: &str) -> Result<Option<Driver>>;
    async fn find_by_license_number(&self, license_number: &str) -> Result<Option<Driver>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Driver>>;
    async fn count(&self) -> Result<i64>;
    /// Set or clear the vehicle a driver is assigned to
    async fn set_vehicle(&self, id: StringUuid, vehicle_id: Option<StringUuid>) -> Result<Driver>;
    async fn clear_vehicle(&self, vehicle_id: StringUuid) -> Result<u64>;
    async fn delete(&self, id: StringUuid) -> Result<()>;
}

const DRIVER_COLUMNS: &str =
    "id, user_id, full_name, dni, license_number, phone, vehicle_id, created_at, updated_at";

pub struct DriverRepositoryImpl {
    pool: MySqlPool,
}

impl DriverRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<Driver>> {
        let sql = format!("SELECT {} FROM drivers WHERE {} = ?", DRIVER_COLUMNS, column);
        let driver = sqlx::query_as::<_, Driver>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(driver)
    }
}

#[async_trait]
impl DriverRepository for DriverRepositoryImpl {
    async fn create(&self, driver: &Driver) -> Result<Driver> {
        sqlx::query(
            r#"
            INSERT INTO drivers
                (id, user_id, full_name, dni, license_number, phone, vehicle_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(driver.id)
        .bind(driver.user_id)
        .bind(&driver.full_name)
        .bind(&driver.dni)
        .bind(&driver.license_number)
        .bind(&driver.phone)
        .bind(driver.vehicle_id)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_on_duplicate(e, "Driver with this DNI or license already exists"))?;

        self.find_by_id(driver.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create driver")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Driver>> {
        self.find_one("id", id.to_string()).await
    }

    async fn find_by_dni(&self, dni: &str) -> Result<Option<Driver>> {
        self.find_one("dni", dni.to_string()).await
    }

    async fn find_by_license_number(&self, license_number: &str) -> Result<Option<Driver>> {
        self.find_one("license_number", license_number.to_string())
            .await
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Driver>> {
        let sql = format!(
            "SELECT {} FROM drivers ORDER BY created_at DESC LIMIT ? OFFSET ?",
            DRIVER_COLUMNS
        );
        let drivers = sqlx::query_as::<_, Driver>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(drivers)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM drivers")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn set_vehicle(&self, id: StringUuid, vehicle_id: Option<StringUuid>) -> Result<Driver> {
        let result =
            sqlx::query("UPDATE drivers SET vehicle_id = ?, updated_at = NOW() WHERE id = ?")
                .bind(vehicle_id)
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Driver {} not found", id)));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update driver")))
    }

    async fn clear_vehicle(&self, vehicle_id: StringUuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE drivers SET vehicle_id = NULL, updated_at = NOW() WHERE vehicle_id = ?",
        )
        .bind(vehicle_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: StringUuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Driver {} not found", id)));
        }

        Ok(())
    }
}
