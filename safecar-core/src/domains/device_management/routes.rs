use crate::domains::device_management::api as fleet_api;
use crate::domains::device_management::context::DeviceManagementContext;
use axum::{routing::get, Router};

pub fn protected_routes<S>() -> Router<S>
where
    S: DeviceManagementContext,
{
    Router::new()
        .route(
            "/api/v1/vehicles",
            get(fleet_api::vehicle::list_vehicles::<S>)
                .post(fleet_api::vehicle::register_vehicle::<S>),
        )
        .route(
            "/api/v1/vehicles/{id}",
            get(fleet_api::vehicle::get_vehicle::<S>)
                .put(fleet_api::vehicle::update_vehicle::<S>)
                .delete(fleet_api::vehicle::delete_vehicle::<S>),
        )
        .route(
            "/api/v1/drivers",
            get(fleet_api::driver::list_drivers::<S>).post(fleet_api::driver::create_driver::<S>),
        )
        .route(
            "/api/v1/drivers/{id}",
            get(fleet_api::driver::get_driver::<S>).delete(fleet_api::driver::delete_driver::<S>),
        )
        .route(
            "/api/v1/drivers/{id}/vehicle",
            axum::routing::put(fleet_api::driver::assign_driver::<S>)
                .delete(fleet_api::driver::unassign_driver::<S>),
        )
}
