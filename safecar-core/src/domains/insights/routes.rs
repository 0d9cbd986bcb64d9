use crate::domains::insights::api as insights_api;
use crate::domains::insights::context::InsightsContext;
use axum::{routing::get, Router};

pub fn protected_routes<S>() -> Router<S>
where
    S: InsightsContext,
{
    Router::new()
        .route(
            "/api/v1/insights/vehicles/{vehicle_id}",
            get(insights_api::insight::list_vehicle_insights::<S>)
                .post(insights_api::insight::generate_insight::<S>),
        )
        .route(
            "/api/v1/insights/vehicles/{vehicle_id}/latest",
            get(insights_api::insight::latest_vehicle_insight::<S>),
        )
        .route(
            "/api/v1/insights/{id}",
            get(insights_api::insight::get_insight::<S>),
        )
}
