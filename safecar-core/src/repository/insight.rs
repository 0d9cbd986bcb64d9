//! Vehicle insight repository

use crate::domain::{StringUuid, VehicleInsight};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InsightRepository: Send + Sync {
    async fn create(&self, insight: &VehicleInsight) -> Result<VehicleInsight>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<VehicleInsight>>;
    /// Newest first
    async fn list_by_vehicle(
        &self,
        vehicle_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VehicleInsight>>;
    async fn count_by_vehicle(&self, vehicle_id: StringUuid) -> Result<i64>;
}

pub struct InsightRepositoryImpl {
    pool: MySqlPool,
}

impl InsightRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsightRepository for InsightRepositoryImpl {
    async fn create(&self, insight: &VehicleInsight) -> Result<VehicleInsight> {
        sqlx::query(
            r#"
            INSERT INTO vehicle_insights
                (id, vehicle_id, license_plate, risk_level, maintenance_summary, driving_summary,
                 recommendations, telemetry_samples, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW())
            "#,
        )
        .bind(insight.id)
        .bind(insight.vehicle_id)
        .bind(&insight.license_plate)
        .bind(insight.risk_level)
        .bind(&insight.maintenance_summary)
        .bind(&insight.driving_summary)
        .bind(Json(&insight.recommendations))
        .bind(insight.telemetry_samples)
        .execute(&self.pool)
        .await?;

        self.find_by_id(insight.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create insight")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<VehicleInsight>> {
        let insight = sqlx::query_as::<_, VehicleInsight>(
            r#"
            SELECT id, vehicle_id, license_plate, risk_level, maintenance_summary, driving_summary,
                   recommendations, telemetry_samples, created_at
            FROM vehicle_insights
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(insight)
    }

    async fn list_by_vehicle(
        &self,
        vehicle_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<VehicleInsight>> {
        let insights = sqlx::query_as::<_, VehicleInsight>(
            r#"
            SELECT id, vehicle_id, license_plate, risk_level, maintenance_summary, driving_summary,
                   recommendations, telemetry_samples, created_at
            FROM vehicle_insights
            WHERE vehicle_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(vehicle_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(insights)
    }

    async fn count_by_vehicle(&self, vehicle_id: StringUuid) -> Result<i64> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vehicle_insights WHERE vehicle_id = ?")
                .bind(vehicle_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(row.0)
    }
}
