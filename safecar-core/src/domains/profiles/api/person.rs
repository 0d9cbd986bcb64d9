//! Person profile endpoints

use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{
    CreatePersonProfileCommand, PersonProfile, StringUuid, UpdatePersonProfileCommand,
};
use crate::domains::profiles::context::ProfilesContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasProfiles;
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
pub struct CreatePersonProfileResource {
    /// Defaults to the authenticated user
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub phone: String,
    pub email: String,
    pub address: Option<String>,
}

impl CreatePersonProfileResource {
    pub fn into_command(self, caller: StringUuid) -> CreatePersonProfileCommand {
        CreatePersonProfileCommand {
            user_id: self.user_id.map(StringUuid::from).unwrap_or(caller),
            first_name: self.first_name,
            last_name: self.last_name,
            dni: self.dni,
            phone: self.phone,
            email: self.email,
            address: self.address,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePersonProfileResource {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl From<UpdatePersonProfileResource> for UpdatePersonProfileCommand {
    fn from(resource: UpdatePersonProfileResource) -> Self {
        Self {
            first_name: resource.first_name,
            last_name: resource.last_name,
            phone: resource.phone,
            email: resource.email,
            address: resource.address,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/person-profiles",
    tag = "Profiles",
    request_body = CreatePersonProfileResource,
    responses(
        (status = 201, description = "Profile created", body = PersonProfile),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already has a profile or DNI in use")
    )
)]
pub async fn create_person_profile<S: ProfilesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<CreatePersonProfileResource>,
) -> Result<impl IntoResponse> {
    let cmd = resource.into_command(auth.id());
    auth.require_self_or_admin(cmd.user_id)?;
    let profile = state.profile_service().create_person(cmd).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(profile))))
}

#[utoipa::path(
    get,
    path = "/api/v1/person-profiles",
    tag = "Profiles",
    responses((status = 200, description = "Paginated person profiles"))
)]
pub async fn list_person_profiles<S: ProfilesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (profiles, total) = state
        .profile_service()
        .list_persons(pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        profiles,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/person-profiles/{id}",
    tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Person profile", body = PersonProfile),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_person_profile<S: ProfilesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service().get_person(id.into()).await?;
    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/person-profiles/user/{user_id}",
    tag = "Profiles",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Person profile", body = PersonProfile),
        (status = 404, description = "User has no person profile")
    )
)]
pub async fn get_person_profile_by_user<S: ProfilesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state
        .profile_service()
        .get_person_by_user(user_id.into())
        .await?;
    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    put,
    path = "/api/v1/person-profiles/{id}",
    tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = UpdatePersonProfileResource,
    responses(
        (status = 200, description = "Profile updated", body = PersonProfile),
        (status = 403, description = "Profile belongs to another user"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_person_profile<S: ProfilesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<UpdatePersonProfileResource>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.profile_service().get_person(id).await?;
    auth.require_self_or_admin(existing.user_id)?;
    let profile = state
        .profile_service()
        .update_person(id, resource.into())
        .await?;
    Ok(Json(SuccessResponse::new(profile)))
}
