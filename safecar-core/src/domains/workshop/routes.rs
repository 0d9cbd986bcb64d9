use crate::domains::workshop::api as workshop_api;
use crate::domains::workshop::context::WorkshopContext;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn protected_routes<S>() -> Router<S>
where
    S: WorkshopContext,
{
    Router::new()
        .route(
            "/api/v1/workshops",
            get(workshop_api::workshop::list_workshops::<S>)
                .post(workshop_api::workshop::create_workshop::<S>),
        )
        .route(
            "/api/v1/workshops/{id}",
            get(workshop_api::workshop::get_workshop::<S>)
                .put(workshop_api::workshop::update_workshop::<S>),
        )
        .route(
            "/api/v1/workshops/{id}/appointments",
            get(workshop_api::appointment::list_workshop_appointments::<S>),
        )
        .route(
            "/api/v1/appointments",
            post(workshop_api::appointment::create_appointment::<S>),
        )
        .route(
            "/api/v1/appointments/customer/{customer_id}",
            get(workshop_api::appointment::list_customer_appointments::<S>),
        )
        .route(
            "/api/v1/appointments/{id}",
            get(workshop_api::appointment::get_appointment::<S>),
        )
        .route(
            "/api/v1/appointments/{id}/reschedule",
            put(workshop_api::appointment::reschedule_appointment::<S>),
        )
        .route(
            "/api/v1/appointments/{id}/confirm",
            post(workshop_api::appointment::confirm_appointment::<S>),
        )
        .route(
            "/api/v1/appointments/{id}/start",
            post(workshop_api::appointment::start_appointment::<S>),
        )
        .route(
            "/api/v1/appointments/{id}/complete",
            post(workshop_api::appointment::complete_appointment::<S>),
        )
        .route(
            "/api/v1/appointments/{id}/cancel",
            post(workshop_api::appointment::cancel_appointment::<S>),
        )
}
