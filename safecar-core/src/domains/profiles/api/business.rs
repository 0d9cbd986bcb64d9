//! Business profile endpoints

use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{
    BusinessProfile, CreateBusinessProfileCommand, StringUuid, UpdateBusinessProfileCommand,
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
pub struct CreateBusinessProfileResource {
    pub user_id: Option<Uuid>,
    pub business_name: String,
    pub ruc: String,
    pub phone: String,
    pub address: String,
    pub description: Option<String>,
}

impl CreateBusinessProfileResource {
    pub fn into_command(self, caller: StringUuid) -> CreateBusinessProfileCommand {
        CreateBusinessProfileCommand {
            user_id: self.user_id.map(StringUuid::from).unwrap_or(caller),
            business_name: self.business_name,
            ruc: self.ruc,
            phone: self.phone,
            address: self.address,
            description: self.description,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateBusinessProfileResource {
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateBusinessProfileResource> for UpdateBusinessProfileCommand {
    fn from(resource: UpdateBusinessProfileResource) -> Self {
        Self {
            business_name: resource.business_name,
            phone: resource.phone,
            address: resource.address,
            description: resource.description,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/business-profiles",
    tag = "Profiles",
    request_body = CreateBusinessProfileResource,
    responses(
        (status = 201, description = "Profile created", body = BusinessProfile),
        (status = 404, description = "User not found"),
        (status = 409, description = "User already has a profile or RUC in use")
    )
)]
pub async fn create_business_profile<S: ProfilesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<CreateBusinessProfileResource>,
) -> Result<impl IntoResponse> {
    let cmd = resource.into_command(auth.id());
    auth.require_self_or_admin(cmd.user_id)?;
    let profile = state.profile_service().create_business(cmd).await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(profile))))
}

#[utoipa::path(
    get,
    path = "/api/v1/business-profiles",
    tag = "Profiles",
    responses((status = 200, description = "Paginated business profiles"))
)]
pub async fn list_business_profiles<S: ProfilesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (profiles, total) = state
        .profile_service()
        .list_businesses(pagination.page, pagination.per_page)
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
    path = "/api/v1/business-profiles/{id}",
    tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Business profile", body = BusinessProfile),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_business_profile<S: ProfilesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service().get_business(id.into()).await?;
    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/business-profiles/user/{user_id}",
    tag = "Profiles",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Business profile", body = BusinessProfile),
        (status = 404, description = "User has no business profile")
    )
)]
pub async fn get_business_profile_by_user<S: ProfilesContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state
        .profile_service()
        .get_business_by_user(user_id.into())
        .await?;
    Ok(Json(SuccessResponse::new(profile)))
}

#[utoipa::path(
    put,
    path = "/api/v1/business-profiles/{id}",
    tag = "Profiles",
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = UpdateBusinessProfileResource,
    responses(
        (status = 200, description = "Profile updated", body = BusinessProfile),
        (status = 403, description = "Profile belongs to another user"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_business_profile<S: ProfilesContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(resource): Json<UpdateBusinessProfileResource>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.profile_service().get_business(id).await?;
    auth.require_self_or_admin(existing.user_id)?;
    let profile = state
        .profile_service()
        .update_business(id, resource.into())
        .await?;
    Ok(Json(SuccessResponse::new(profile)))
}
