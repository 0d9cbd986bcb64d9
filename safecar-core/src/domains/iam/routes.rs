use crate::domains::iam::api as iam_api;
use crate::domains::iam::context::IamContext;
use axum::{
    routing::{get, post},
    Router,
};

pub fn public_routes<S>() -> Router<S>
where
    S: IamContext,
{
    Router::new()
        .route(
            "/api/v1/authentication/sign-up",
            post(iam_api::authentication::sign_up::<S>),
        )
        .route(
            "/api/v1/authentication/sign-in",
            post(iam_api::authentication::sign_in::<S>),
        )
}

pub fn protected_routes<S>() -> Router<S>
where
    S: IamContext,
{
    Router::new()
        .route("/api/v1/users", get(iam_api::user::list_users::<S>))
        .route("/api/v1/users/me", get(iam_api::user::get_current_user::<S>))
        .route(
            "/api/v1/users/username/{username}",
            get(iam_api::user::get_user_by_username::<S>),
        )
        .route("/api/v1/users/{id}", get(iam_api::user::get_user::<S>))
        .route("/api/v1/roles", get(iam_api::role::list_roles::<S>))
}
