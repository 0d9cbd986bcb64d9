//! Appointment repository

use crate::domain::{Appointment, StringUuid};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment>;
    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Appointment>>;
    async fn list_by_workshop(
        &self,
        workshop_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Appointment>>;
    async fn count_by_workshop(&self, workshop_id: StringUuid) -> Result<i64>;
    async fn list_by_customer(
        &self,
        customer_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Appointment>>;
    async fn count_by_customer(&self, customer_id: StringUuid) -> Result<i64>;
    /// Persist schedule, status and notes
    async fn update(&self, appointment: &Appointment) -> Result<Appointment>;
}

const APPOINTMENT_COLUMNS: &str = "id, workshop_id, vehicle_id, customer_id, scheduled_at, \
     service_type, description, status, notes, created_at, updated_at";

pub struct AppointmentRepositoryImpl {
    pool: MySqlPool,
}

impl AppointmentRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        column: &str,
        value: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Appointment>> {
        let sql = format!(
            "SELECT {} FROM appointments WHERE {} = ? ORDER BY scheduled_at ASC LIMIT ? OFFSET ?",
            APPOINTMENT_COLUMNS, column
        );
        let appointments = sqlx::query_as::<_, Appointment>(&sql)
            .bind(value)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(appointments)
    }

    async fn count_where(&self, column: &str, value: StringUuid) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM appointments WHERE {} = ?", column);
        let row: (i64,) = sqlx::query_as(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

#[async_trait]
impl AppointmentRepository for AppointmentRepositoryImpl {
    async fn create(&self, appointment: &Appointment) -> Result<Appointment> {
        sqlx::query(
            r#"
            INSERT INTO appointments
                (id, workshop_id, vehicle_id, customer_id, scheduled_at, service_type, description,
                 status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, NOW(), NOW())
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.workshop_id)
        .bind(appointment.vehicle_id)
        .bind(appointment.customer_id)
        .bind(appointment.scheduled_at)
        .bind(&appointment.service_type)
        .bind(&appointment.description)
        .bind(appointment.status)
        .bind(&appointment.notes)
        .execute(&self.pool)
        .await?;

        self.find_by_id(appointment.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create appointment")))
    }

    async fn find_by_id(&self, id: StringUuid) -> Result<Option<Appointment>> {
        let sql = format!("SELECT {} FROM appointments WHERE id = ?", APPOINTMENT_COLUMNS);
        let appointment = sqlx::query_as::<_, Appointment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(appointment)
    }

    async fn list_by_workshop(
        &self,
        workshop_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Appointment>> {
        self.list_where("workshop_id", workshop_id, offset, limit)
            .await
    }

    async fn count_by_workshop(&self, workshop_id: StringUuid) -> Result<i64> {
        self.count_where("workshop_id", workshop_id).await
    }

    async fn list_by_customer(
        &self,
        customer_id: StringUuid,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Appointment>> {
        self.list_where("customer_id", customer_id, offset, limit)
            .await
    }

    async fn count_by_customer(&self, customer_id: StringUuid) -> Result<i64> {
        self.count_where("customer_id", customer_id).await
    }

    async fn update(&self, appointment: &Appointment) -> Result<Appointment> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET scheduled_at = ?, status = ?, notes = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(appointment.scheduled_at)
        .bind(appointment.status)
        .bind(&appointment.notes)
        .bind(appointment.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Appointment {} not found",
                appointment.id
            )));
        }

        self.find_by_id(appointment.id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update appointment")))
    }
}
