//! Stripe webhook receiver

use crate::domains::payments::context::PaymentsContext;
use crate::error::Result;
use crate::state::HasPayments;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebhookAck {
    pub received: bool,
}

/// The raw body is needed for signature verification, so it is read as bytes
#[utoipa::path(
    post,
    path = "/api/v1/payments/webhook",
    tag = "Payments",
    request_body(content = String, description = "Stripe event payload"),
    responses(
        (status = 200, description = "Event acknowledged", body = WebhookAck),
        (status = 400, description = "Missing or invalid signature")
    )
)]
pub async fn stripe_webhook<S: PaymentsContext>(
    State(state): State<S>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    state
        .subscription_service()
        .handle_webhook(&body, signature)
        .await?;
    Ok(Json(WebhookAck { received: true }))
}
