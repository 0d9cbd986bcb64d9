//! Sign-up and sign-in endpoints

use super::UserResource;
use crate::api::SuccessResponse;
use crate::domain::{SignInCommand, SignUpCommand, StringUuid};
use crate::domains::iam::context::IamContext;
use crate::error::Result;
use crate::state::HasIam;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignUpResource {
    pub username: String,
    pub password: String,
    /// Role names such as `ROLE_OWNER`; defaults to `ROLE_DRIVER`
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<SignUpResource> for SignUpCommand {
    fn from(resource: SignUpResource) -> Self {
        Self {
            username: resource.username.trim().to_string(),
            password: resource.password,
            roles: resource.roles,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SignInResource {
    pub username: String,
    pub password: String,
}

impl From<SignInResource> for SignInCommand {
    fn from(resource: SignInResource) -> Self {
        Self {
            username: resource.username.trim().to_string(),
            password: resource.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUserResource {
    pub id: StringUuid,
    pub username: String,
    pub roles: Vec<String>,
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/authentication/sign-up",
    tag = "IAM",
    request_body = SignUpResource,
    responses(
        (status = 201, description = "User created", body = UserResource),
        (status = 400, description = "Unknown role"),
        (status = 403, description = "Admin role requested"),
        (status = 409, description = "Username taken"),
        (status = 422, description = "Invalid username or password")
    )
)]
pub async fn sign_up<S: IamContext>(
    State(state): State<S>,
    Json(resource): Json<SignUpResource>,
) -> Result<impl IntoResponse> {
    let user = state.user_service().sign_up(resource.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(UserResource::from(user))),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/authentication/sign-in",
    tag = "IAM",
    request_body = SignInResource,
    responses(
        (status = 200, description = "Signed in", body = AuthenticatedUserResource),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn sign_in<S: IamContext>(
    State(state): State<S>,
    Json(resource): Json<SignInResource>,
) -> Result<impl IntoResponse> {
    let authenticated = state.user_service().sign_in(resource.into()).await?;
    let roles = authenticated.user.role_names();
    Ok(Json(SuccessResponse::new(AuthenticatedUserResource {
        id: authenticated.user.id,
        username: authenticated.user.username,
        roles,
        token: authenticated.token,
    })))
}
