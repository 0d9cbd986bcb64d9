use crate::domains::profiles::api as profiles_api;
use crate::domains::profiles::context::ProfilesContext;
use axum::{routing::get, Router};

pub fn protected_routes<S>() -> Router<S>
where
    S: ProfilesContext,
{
    Router::new()
        .route(
            "/api/v1/person-profiles",
            get(profiles_api::person::list_person_profiles::<S>)
                .post(profiles_api::person::create_person_profile::<S>),
        )
        .route(
            "/api/v1/person-profiles/user/{user_id}",
            get(profiles_api::person::get_person_profile_by_user::<S>),
        )
        .route(
            "/api/v1/person-profiles/{id}",
            get(profiles_api::person::get_person_profile::<S>)
                .put(profiles_api::person::update_person_profile::<S>),
        )
        .route(
            "/api/v1/business-profiles",
            get(profiles_api::business::list_business_profiles::<S>)
                .post(profiles_api::business::create_business_profile::<S>),
        )
        .route(
            "/api/v1/business-profiles/user/{user_id}",
            get(profiles_api::business::get_business_profile_by_user::<S>),
        )
        .route(
            "/api/v1/business-profiles/{id}",
            get(profiles_api::business::get_business_profile::<S>)
                .put(profiles_api::business::update_business_profile::<S>),
        )
}
