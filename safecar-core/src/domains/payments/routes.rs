use crate::domains::payments::api as payments_api;
use crate::domains::payments::context::PaymentsContext;
use axum::{
    routing::{get, post},
    Router,
};

/// Stripe calls the webhook without a bearer token; the payload signature authenticates it
pub fn public_routes<S>() -> Router<S>
where
    S: PaymentsContext,
{
    Router::new()
        .route(
            "/api/v1/payments/plans",
            get(payments_api::subscription::list_plans::<S>),
        )
        .route(
            "/api/v1/payments/webhook",
            post(payments_api::webhook::stripe_webhook::<S>),
        )
}

pub fn protected_routes<S>() -> Router<S>
where
    S: PaymentsContext,
{
    Router::new()
        .route(
            "/api/v1/payments/checkout",
            post(payments_api::subscription::create_checkout::<S>),
        )
        .route(
            "/api/v1/subscriptions/user/{user_id}",
            get(payments_api::subscription::get_user_subscription::<S>),
        )
        .route(
            "/api/v1/subscriptions/{id}",
            get(payments_api::subscription::get_subscription::<S>),
        )
        .route(
            "/api/v1/subscriptions/{id}/cancel",
            post(payments_api::subscription::cancel_subscription::<S>),
        )
}
