//! User queries

use super::UserResource;
use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::{Role, StringUuid};
use crate::domains::iam::context::IamContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasIam;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// List users (administrators only)
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "IAM",
    responses(
        (status = 200, description = "Paginated users"),
        (status = 403, description = "Caller is not an administrator")
    )
)]
pub async fn list_users<S: IamContext>(
    State(state): State<S>,
    auth: AuthUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    auth.require_any_role(&[Role::Admin])?;
    let (users, total) = state
        .user_service()
        .list(pagination.page, pagination.per_page)
        .await?;
    let data = users.into_iter().map(UserResource::from).collect();
    Ok(Json(PaginatedResponse::new(
        data,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "IAM",
    responses((status = 200, description = "Current user", body = UserResource))
)]
pub async fn get_current_user<S: IamContext>(
    State(state): State<S>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let user = state.user_service().get(auth.id()).await?;
    Ok(Json(SuccessResponse::new(UserResource::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "IAM",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResource),
        (status = 403, description = "Not the caller's account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user<S: IamContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    auth.require_self_or_admin(id)?;
    let user = state.user_service().get(id).await?;
    Ok(Json(SuccessResponse::new(UserResource::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/username/{username}",
    tag = "IAM",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User", body = UserResource),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_username<S: IamContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().get_by_username(&username).await?;
    auth.require_self_or_admin(user.id)?;
    Ok(Json(SuccessResponse::new(UserResource::from(user))))
}
