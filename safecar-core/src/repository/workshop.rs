//! Workshop repository

use crate::domain::{StringUuid, Workshop};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkshopRepository: Send + Sync {
    async fn create(&self, workshop: &Workshop) -> Result<Workshop>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Workshop>>;
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Workshop>>;
    async fn count(&self) -> Result<i64>;
    async fn update(&self, workshop: &Workshop) -> Result<Workshop>;
}

pub struct WorkshopRepositoryImpl {
    pool: MySqlPool,
}

impl WorkshopRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkshopRepository for WorkshopRepositoryImpl {
    async fn create(&self, workshop: &Workshop) -> Result<Workshop> {
        sqlx::query(
            r#"
            INSERT INTO workshops (id, owner_id, name, address, phone, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(workshop.id)
        .bind(workshop.owner_id)
        .bind(&workshop.name)
        .bind(&workshop.address)
        .bind(&workshop.phone)
        .bind(&workshop.description)
        .execute(&self.pool)
        .await?;

        self.find_by_id(workshop.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create workshop")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Workshop>> {
        let workshop = sqlx::query_as::<_, Workshop>(
            r#"
            SELECT id, owner_id, name, address, phone, description, created_at, updated_at
            FROM workshops
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workshop)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Workshop>> {
        let workshops = sqlx::query_as::<_, Workshop>(
            r#"
            SELECT id, owner_id, name, address, phone, description, created_at, updated_at
            FROM workshops
            ORDER BY name ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(workshops)
    }

    async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workshops")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }

    async fn update(&self, workshop: &Workshop) -> Result<Workshop> {
        let result = sqlx::query(
            r#"
            UPDATE workshops
            SET name = ?, address = ?, phone = ?, description = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(&workshop.name)
        .bind(&workshop.address)
        .bind(&workshop.phone)
        .bind(&workshop.description)
        .bind(workshop.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Workshop {} not found",
                workshop.id
            )));
        }

        self.find_by_id(workshop.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update workshop")))
    }
}
