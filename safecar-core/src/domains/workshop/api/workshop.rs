//! Workshop endpoints

use super::WORKSHOP_STAFF;
use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{CreateWorkshopCommand, StringUuid, UpdateWorkshopCommand, Workshop};
use crate::domains::workshop::context::WorkshopContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasWorkshops;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateWorkshopResource {
    /// Defaults to the authenticated user
    pub owner_id: Option<Uuid>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub description: Option<String>,
}

impl CreateWorkshopResource {
    pub fn into_command(self, caller: StringUuid) -> CreateWorkshopCommand {
        CreateWorkshopCommand {
            owner_id: self.owner_id.map(StringUuid::from).unwrap_or(caller),
            name: self.name.trim().to_string(),
            address: self.address,
            phone: self.phone,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateWorkshopResource {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateWorkshopResource> for UpdateWorkshopCommand {
    fn from(resource: UpdateWorkshopResource) -> Self {
        Self {
            name: resource.name,
            address: resource.address,
            phone: resource.phone,
            description: resource.description,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/workshops",
    tag = "Workshop",
    request_body = CreateWorkshopResource,
    responses(
        (status = 201, description = "Workshop created", body = Workshop),
        (status = 403, description = "Caller is not workshop staff")
    )
)]
pub async fn create_workshop<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<CreateWorkshopResource>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(WORKSHOP_STAFF)?;
    let cmd = resource.into_command(auth.id());
    auth.require_self_or_admin(cmd.owner_id)?;
    let workshop = state.workshop_service().create(cmd).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(workshop))))
}

#[utoipa::path(
    get,
    path = "/api/v1/workshops",
    tag = "Workshop",
    responses((status = 200, description = "Paginated workshops"))
)]
pub async fn list_workshops<S: WorkshopContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (workshops, total) = state
        .workshop_service()
        .list(pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        workshops,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/workshops/{id}",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    responses(
        (status = 200, description = "Workshop", body = Workshop),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn get_workshop<S: WorkshopContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let workshop = state.workshop_service().get(id.into()).await?;
    Ok(Json(SuccessResponse::new(workshop)))
}

#[utoipa::path(
    put,
    path = "/api/v1/workshops/{id}",
    tag = "Workshop",
    params(("id" = Uuid, Path, description = "Workshop ID")),
    request_body = UpdateWorkshopResource,
    responses(
        (status = 200, description = "Workshop updated", body = Workshop),
        (status = 403, description = "Workshop belongs to someone else"),
        (status = 404, description = "Workshop not found")
    )
)]
pub async fn update_workshop<S: WorkshopContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<UpdateWorkshopResource>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.workshop_service().get(id).await?;
    auth.require_self_or_admin(existing.owner_id)?;
    let workshop = state
        .workshop_service()
        .update(id, resource.into())
        .await?;
    Ok(Json(SuccessResponse::new(workshop)))
}
