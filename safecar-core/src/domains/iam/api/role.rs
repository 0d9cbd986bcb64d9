use crate::api::SuccessResponse;
use crate::domain::RoleRecord;
use crate::domains::iam::context::IamContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasIam;
use axum::{extract::State, response::IntoResponse, Json};

#[utoipa::path(
    get,
    path = "/api/v1/roles",
    tag = "IAM",
    responses((status = 200, description = "All roles", body = [RoleRecord]))
)]
pub async fn list_roles<S: IamContext>(
    State(state): State<S>,
    _auth: AuthUser,
) -> Result<impl IntoResponse> {
    let roles = state.role_service().list().await?;
    Ok(Json(SuccessResponse::new(roles)))
}
