//! Workshop business logic: workshops and appointment scheduling

use crate::domain::{
    Appointment, AppointmentStatus, CreateAppointmentCommand, CreateWorkshopCommand, StringUuid,
    UpdateWorkshopCommand, Workshop,
};
use crate::error::{AppError, Result};
use crate::repository::{AppointmentRepository, WorkshopRepository};
use crate::service::acl::{DeviceManagementContextFacade, IamContextFacade};
use chrono::{DateTime, Utc};
use metrics::counter;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct WorkshopService<W: WorkshopRepository, A: AppointmentRepository> {
    repo: Arc<W>,
    appointment_repo: Arc<A>,
    iam: Arc<dyn IamContextFacade>,
    vehicles: Arc<dyn DeviceManagementContextFacade>,
}

impl<W: WorkshopRepository, A: AppointmentRepository> WorkshopService<W, A> {
    pub fn new(
        repo: Arc<W>,
        appointment_repo: Arc<A>,
        iam: Arc<dyn IamContextFacade>,
        vehicles: Arc<dyn DeviceManagementContextFacade>,
    ) -> Self {
        Self {
            repo,
            appointment_repo,
            iam,
            vehicles,
        }
    }

    // ==================== Workshops ====================

    pub async fn create(&self, cmd: CreateWorkshopCommand) -> Result<Workshop> {
        cmd.validate()?;
        if !self.iam.user_exists(cmd.owner_id).await? {
            return Err(AppError::NotFound(format!("User {} not found", cmd.owner_id)));
        }

        let now = Utc::now();
        let workshop = Workshop {
            id: StringUuid::new_v4(),
            owner_id: cmd.owner_id,
            name: cmd.name,
            address: cmd.address,
            phone: cmd.phone,
            description: cmd.description,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&workshop).await
    }

    pub async fn get(&self, id: StringUuid) -> Result<Workshop> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Workshop {} not found", id)))
    }

    pub async fn list(&self, page: i64, per_page: i64) -> Result<(Vec<Workshop>, i64)> {
        let offset = super::page_offset(page, per_page);
        let workshops = self.repo.list(offset, per_page).await?;
        let total = self.repo.count().await?;
        Ok((workshops, total))
    }

    pub async fn update(&self, id: StringUuid, cmd: UpdateWorkshopCommand) -> Result<Workshop> {
        cmd.validate()?;
        let mut workshop = self.get(id).await?;

        if let Some(name) = cmd.name {
            workshop.name = name;
        }
        if let Some(address) = cmd.address {
            workshop.address = address;
        }
        if let Some(phone) = cmd.phone {
            workshop.phone = phone;
        }
        if cmd.description.is_some() {
            workshop.description = cmd.description;
        }

        self.repo.update(&workshop).await
    }

    // ==================== Appointments ====================

    pub async fn create_appointment(&self, cmd: CreateAppointmentCommand) -> Result<Appointment> {
        cmd.validate()?;
        ensure_future(cmd.scheduled_at)?;

        self.get(cmd.workshop_id).await?;
        if !self.vehicles.vehicle_exists(cmd.vehicle_id).await? {
            return Err(AppError::NotFound(format!(
                "Vehicle {} not found",
                cmd.vehicle_id
            )));
        }
        if !self.iam.user_exists(cmd.customer_id).await? {
            return Err(AppError::NotFound(format!(
                "User {} not found",
                cmd.customer_id
            )));
        }

        let now = Utc::now();
        let appointment = Appointment {
            id: StringUuid::new_v4(),
            workshop_id: cmd.workshop_id,
            vehicle_id: cmd.vehicle_id,
            customer_id: cmd.customer_id,
            scheduled_at: cmd.scheduled_at,
            service_type: cmd.service_type,
            description: cmd.description,
            status: AppointmentStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let appointment = self.appointment_repo.create(&appointment).await?;
        info!(
            appointment_id = %appointment.id,
            workshop_id = %appointment.workshop_id,
            scheduled_at = %appointment.scheduled_at,
            "Appointment created"
        );
        Ok(appointment)
    }

    pub async fn get_appointment(&self, id: StringUuid) -> Result<Appointment> {
        self.appointment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    pub async fn list_by_workshop(
        &self,
        workshop_id: StringUuid,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Appointment>, i64)> {
        self.get(workshop_id).await?;
        let offset = super::page_offset(page, per_page);
        let appointments = self
            .appointment_repo
            .list_by_workshop(workshop_id, offset, per_page)
            .await?;
        let total = self.appointment_repo.count_by_workshop(workshop_id).await?;
        Ok((appointments, total))
    }

    pub async fn list_by_customer(
        &self,
        customer_id: StringUuid,
        page: i64,
        per_page: i64,
    ) -> Result<(Vec<Appointment>, i64)> {
        let offset = super::page_offset(page, per_page);
        let appointments = self
            .appointment_repo
            .list_by_customer(customer_id, offset, per_page)
            .await?;
        let total = self.appointment_repo.count_by_customer(customer_id).await?;
        Ok((appointments, total))
    }

    pub async fn reschedule(
        &self,
        id: StringUuid,
        scheduled_at: DateTime<Utc>,
    ) -> Result<Appointment> {
        let mut appointment = self.get_appointment(id).await?;
        if !appointment.status.is_reschedulable() {
            return Err(AppError::Conflict(format!(
                "Cannot reschedule appointment in status {}",
                appointment.status
            )));
        }
        ensure_future(scheduled_at)?;

        appointment.scheduled_at = scheduled_at;
        appointment.updated_at = Utc::now();
        self.appointment_repo.update(&appointment).await
    }

    pub async fn confirm(&self, id: StringUuid) -> Result<Appointment> {
        self.transition(id, AppointmentStatus::Confirmed, None).await
    }

    pub async fn start(&self, id: StringUuid) -> Result<Appointment> {
        self.transition(id, AppointmentStatus::InProgress, None)
            .await
    }

    pub async fn complete(&self, id: StringUuid, notes: Option<String>) -> Result<Appointment> {
        self.transition(id, AppointmentStatus::Completed, notes)
            .await
    }

    pub async fn cancel(&self, id: StringUuid, reason: Option<String>) -> Result<Appointment> {
        self.transition(id, AppointmentStatus::Cancelled, reason)
            .await
    }

    async fn transition(
        &self,
        id: StringUuid,
        target: AppointmentStatus,
        notes: Option<String>,
    ) -> Result<Appointment> {
        let mut appointment = self.get_appointment(id).await?;
        let from = appointment.status;
        appointment.transition_to(target)?;
        if notes.is_some() {
            appointment.notes = notes;
        }

        let appointment = self.appointment_repo.update(&appointment).await?;
        counter!("safecar_appointment_transitions_total", "to" => target.to_string()).increment(1);
        info!(appointment_id = %id, from = %from, to = %target, "Appointment status changed");
        Ok(appointment)
    }
}

fn ensure_future(scheduled_at: DateTime<Utc>) -> Result<()> {
    if scheduled_at <= Utc::now() {
        return Err(AppError::BadRequest(
            "Appointment must be scheduled in the future".to_string(),
        ));
    }
    Ok(())
}
