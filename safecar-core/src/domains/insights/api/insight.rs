use crate::api::{PaginatedResponse, PaginationQuery, SuccessResponse};
use crate::domain::VehicleInsight;
use crate::domains::insights::context::InsightsContext;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasInsights;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

/// Analyse the vehicle's recent telemetry and store the result
#[utoipa::path(
    post,
    path = "/api/v1/insights/vehicles/{vehicle_id}",
    tag = "Insights",
    params(("vehicle_id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 201, description = "Insight generated", body = VehicleInsight),
        (status = 400, description = "Vehicle has no telemetry"),
        (status = 404, description = "Vehicle not found"),
        (status = 502, description = "AI provider failed")
    )
)]
pub async fn generate_insight<S: InsightsContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let insight = state
        .insight_service()
        .generate_for_vehicle(vehicle_id.into())
        .await?;
    Ok((StatusCode::CREATED, Json(SuccessResponse::new(insight))))
}

#[utoipa::path(
    get,
    path = "/api/v1/insights/{id}",
    tag = "Insights",
    params(("id" = Uuid, Path, description = "Insight ID")),
    responses(
        (status = 200, description = "Insight", body = VehicleInsight),
        (status = 404, description = "Insight not found")
    )
)]
pub async fn get_insight<S: InsightsContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let insight = state.insight_service().get(id.into()).await?;
    Ok(Json(SuccessResponse::new(insight)))
}

#[utoipa::path(
    get,
    path = "/api/v1/insights/vehicles/{vehicle_id}",
    tag = "Insights",
    params(("vehicle_id" = Uuid, Path, description = "Vehicle ID")),
    responses((status = 200, description = "Paginated insights, newest first"))
)]
pub async fn list_vehicle_insights<S: InsightsContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(vehicle_id): Path<Uuid>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let (insights, total) = state
        .insight_service()
        .list_for_vehicle(vehicle_id.into(), pagination.page, pagination.per_page)
        .await?;
    Ok(Json(PaginatedResponse::new(
        insights,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/insights/vehicles/{vehicle_id}/latest",
    tag = "Insights",
    params(("vehicle_id" = Uuid, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Most recent insight", body = VehicleInsight),
        (status = 404, description = "No insight for this vehicle")
    )
)]
pub async fn latest_vehicle_insight<S: InsightsContext>(
    State(state): State<S>,
    _auth: AuthUser,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let insight = state
        .insight_service()
        .latest_for_vehicle(vehicle_id.into())
        .await?;
    Ok(Json(SuccessResponse::new(insight)))
}
