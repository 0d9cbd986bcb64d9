//! Appointment booking and lifecycle endpoints

use super::WORKSHOP_STAFF;
use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Appointment, CreateAppointmentCommand, StringUuid};
use crate::domains::workshop::context::WorkshopContext;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::state::HasWorkshops;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAppointmentResource {
    pub workshop_id: Uuid,
    pub vehicle_id: Uuid,
    /// Defaults to the authenticated user
    pub customer_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub service_type: String,
    pub description: Option<String>,
}

impl CreateAppointmentResource {
    pub fn into_command(self, caller: StringUuid) -> CreateAppointmentCommand {
        CreateAppointmentCommand {
            workshop_id: self.workshop_id.into(),
            vehicle_id: self.vehicle_id.into(),
            customer_id: self.customer_id.map(StringUuid::from).unwrap_or(caller),
            scheduled_at: self.scheduled_at,
            service_type: self.service_type.trim().to_string(),
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RescheduleAppointmentResource {
    pub scheduled_at: DateTime<Utc>,
}

/// Optional free text stored on the appointment
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AppointmentNoteResource {
    #[serde(default)]
    pub notes: Option<String>,
}

/// The customer who booked the appointment, or workshop staff
fn require_customer_or_staff(auth: &AuthUser, appointment: &Appointment) -> Result<()> {
    if appointment.customer_id == auth.id() || auth.require_any_role(WORKSHOP_STAFF).is_ok() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the customer or workshop staff can change this appointment".to_string(),
        ))
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments",
    tag = "Workshop",
    request_body = CreateAppointmentResource,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Scheduled time is in the past"),
        (status = 404, description = "Workshop, vehicle or customer not found")
    )
)]
pub async fn create_appointment<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<CreateAppointmentResource>,
) -> Result<impl IntoResponse> {
    let cmd = resource.into_command(auth.id());
    auth.require_self_or_admin(cmd.customer_id)?;
    let appointment = state.workshop_service().create_appointment(cmd).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(appointment))))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let appointment = state.workshop_service().get_appointment(id.into()).await?;
    require_customer_or_staff(&auth, &appointment)?;
    Ok(Json(SuccessResponse::new(appointment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/workshops/{id}/appointments",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Paginated appointments"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn list_workshop_appointments<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(WORKSHOP_STAFF)?;
    let (appointments, total) = state
        .workshop_service()
        .list_by_workshop(id.into(), pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        appointments,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/appointments/customer/{customer_id}",
    tag = "Workshop",
    params(("customer_id" = Uuid, Path, description = "Customer user ID")),
    responses((status = 200, description = "Paginated appointments"))
)]
pub async fn list_customer_appointments<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(customer_id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let customer_id = StringUuid::from(customer_id);
    auth.require_self_or_admin(customer_id)?;
    let (appointments, total) = state
        .workshop_service()
        .list_by_customer(customer_id, pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        appointments,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/appointments/{id}/reschedule",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = RescheduleAppointmentResource,
    responses(
        (status = 200, description = "Appointment moved", body = Appointment),
        (status = 400, description = "New time is in the past"),
        (status = 409, description = "Appointment can no longer be rescheduled")
    )
)]
pub async fn reschedule_appointment<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<RescheduleAppointmentResource>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.workshop_service().get_appointment(id).await?;
    require_customer_or_staff(&auth, &existing)?;
    let appointment = state
        .workshop_service()
        .reschedule(id, resource.scheduled_at)
        .await?;
    Ok(Json(SuccessResponse::new(appointment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/confirm",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment confirmed", body = Appointment),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn confirm_appointment<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(WORKSHOP_STAFF)?;
    let appointment = state.workshop_service().confirm(id.into()).await?;
    Ok(Json(SuccessResponse::new(appointment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/start",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Work started", body = Appointment),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn start_appointment<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(WORKSHOP_STAFF)?;
    let appointment = state.workshop_service().start(id.into()).await?;
    Ok(Json(SuccessResponse::new(appointment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/complete",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = AppointmentNoteResource,
    responses(
        (status = 200, description = "Work completed", body = Appointment),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn complete_appointment<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<AppointmentNoteResource>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(WORKSHOP_STAFF)?;
    let appointment = state
        .workshop_service()
        .complete(id.into(), resource.notes)
        .await?;
    Ok(Json(SuccessResponse::new(appointment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/cancel",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = AppointmentNoteResource,
    responses(
        (status = 200, description = "Appointment cancelled", body = Appointment),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn cancel_appointment<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<AppointmentNoteResource>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.workshop_service().get_appointment(id).await?;
    require_customer_or_staff(&auth, &existing)?;
    let appointment = state.workshop_service().cancel(id, resource.notes).await?;
    Ok(Json(SuccessResponse::new(appointment)))
}
