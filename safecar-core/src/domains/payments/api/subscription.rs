//! Checkout and subscription endpoints

use crate::api::SuccessResponse;
use crate::domain::{CheckoutResult, CreateCheckoutCommand, Plan, StringUuid, Subscription};
use crate::domains::payments::context::PaymentsContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasPayments;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCheckoutResource {
    pub plan: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CreateCheckoutResource {
    pub fn into_command(self, user_id: StringUuid) -> CreateCheckoutCommand {
        CreateCheckoutCommand {
            user_id,
            plan: self.plan,
            success_url: self.success_url,
            cancel_url: self.cancel_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResource {
    pub subscription_id: StringUuid,
    pub session_id: String,
    pub checkout_url: Option<String>,
}

impl From<CheckoutResult> for CheckoutResource {
    fn from(result: CheckoutResult) -> Self {
        Self {
            subscription_id: result.subscription.id,
            session_id: result.session_id,
            checkout_url: result.checkout_url,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/plans",
    tag = "Payments",
    responses((status = 200, description = "Configured plans", body = [Plan]))
)]
pub async fn list_plans<S: PaymentsContext>(State(state): State<S>) -> impl IntoResponse {
    Json(SuccessResponse::new(state.subscription_service().list_plans()))
}

/// Start a Stripe Checkout session for the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/payments/checkout",
    tag = "Payments",
    request_body = CreateCheckoutResource,
    responses(
        (status = 201, description = "Checkout session created", body = CheckoutResource),
        (status = 400, description = "Unknown plan"),
        (status = 409, description = "User already has an active subscription"),
        (status = 502, description = "Stripe request failed")
    )
)]
pub async fn create_checkout<S: PaymentsContext>(
    State(state): State<S>,
    auth: AuthUser,
    Json(resource): Json<CreateCheckoutResource>,
) -> Result<impl IntoResponse> {
    let result = state
        .subscription_service()
        .create_checkout(resource.into_command(auth.id()))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::new(CheckoutResource::from(result))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/{id}",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Subscription", body = Subscription),
        (status = 404, description = "Subscription not found")
    )
)]
pub async fn get_subscription<S: PaymentsContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let subscription = state.subscription_service().get(id.into()).await?;
    auth.require_self_or_admin(subscription.user_id)?;
    Ok(Json(SuccessResponse::new(subscription)))
}

/// Latest subscription of a user
#[utoipa::path(
    get,
    path = "/api/v1/subscriptions/user/{user_id}",
    tag = "Payments",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Subscription", body = Subscription),
        (status = 404, description = "User has no subscription")
    )
)]
pub async fn get_user_subscription<S: PaymentsContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user_id = StringUuid::from(user_id);
    auth.require_self_or_admin(user_id)?;
    let subscription = state.subscription_service().get_by_user(user_id).await?;
    Ok(Json(SuccessResponse::new(subscription)))
}

#[utoipa::path(
    post,
    path = "/api/v1/subscriptions/{id}/cancel",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "Subscription ID")),
    responses(
        (status = 200, description = "Subscription cancelled", body = Subscription),
        (status = 404, description = "Subscription not found"),
        (status = 409, description = "Already cancelled")
    )
)]
pub async fn cancel_subscription<S: PaymentsContext>(
    State(state): State<S>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let id = StringUuid::from(id);
    let existing = state.subscription_service().get(id).await?;
    auth.require_self_or_admin(existing.user_id)?;
    let subscription = state.subscription_service().cancel(id).await?;
    Ok(Json(SuccessResponse::new(subscription)))
}
