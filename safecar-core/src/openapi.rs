//! OpenAPI 3.0 document
//!
//! Collects the handler path annotations and schemas of every bounded
//! context. Served as JSON at `/api-docs/openapi.json` behind Swagger UI.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SafeCar Core API",
        version = "0.1.0",
        description = "Fleet management backend: vehicles, IoT telemetry, workshops, billing and AI insights",
        license(name = "Proprietary"),
        contact(name = "SafeCar Team")
    ),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "IAM", description = "Sign-up, sign-in, users and roles"),
        (name = "Profiles", description = "Person and business profiles"),
        (name = "DeviceManagement", description = "Vehicles and drivers"),
        (name = "Devices", description = "IoT devices and telemetry"),
        (name = "Payments", description = "Stripe subscriptions"),
        (name = "Insights", description = "AI vehicle insights"),
        (name = "Workshop", description = "Workshops and appointments"),
    ),
    security(
        ("bearer_jwt" = [])
    ),
    components(
        schemas(
            crate::api::PaginationQuery,
            crate::api::PaginationMeta,
            crate::api::MessageResponse,
            crate::api::health::HealthResponse,
            crate::domain::StringUuid,

            // IAM
            crate::domain::Role,
            crate::domain::RoleRecord,
            crate::domains::iam::api::UserResource,
            crate::domains::iam::api::authentication::SignUpResource,
            crate::domains::iam::api::authentication::SignInResource,
            crate::domains::iam::api::authentication::AuthenticatedUserResource,

            // Profiles
            crate::domain::PersonProfile,
            crate::domain::BusinessProfile,
            crate::domains::profiles::api::person::CreatePersonProfileResource,
            crate::domains::profiles::api::person::UpdatePersonProfileResource,
            crate::domains::profiles::api::business::CreateBusinessProfileResource,
            crate::domains::profiles::api::business::UpdateBusinessProfileResource,

            // DeviceManagement
            crate::domain::Vehicle,
            crate::domain::VehicleStatus,
            crate::domain::Driver,
            crate::domains::device_management::api::vehicle::RegisterVehicleResource,
            crate::domains::device_management::api::vehicle::UpdateVehicleResource,
            crate::domains::device_management::api::driver::CreateDriverResource,
            crate::domains::device_management::api::driver::AssignVehicleResource,

            // Devices
            crate::domain::Device,
            crate::domain::DeviceType,
            crate::domain::DeviceStatus,
            crate::domain::TelemetryRecord,
            crate::domains::devices::api::device::RegisterDeviceResource,
            crate::domains::devices::api::device::AssignDeviceResource,
            crate::domains::devices::api::device::UpdateDeviceStatusResource,
            crate::domains::devices::api::telemetry::RecordTelemetryResource,

            // Payments
            crate::domain::Plan,
            crate::domain::Subscription,
            crate::domain::SubscriptionStatus,
            crate::domains::payments::api::subscription::CreateCheckoutResource,
            crate::domains::payments::api::subscription::CheckoutResource,
            crate::domains::payments::api::webhook::WebhookAck,

            // Insights
            crate::domain::VehicleInsight,
            crate::domain::RiskLevel,

            // Workshop
            crate::domain::Workshop,
            crate::domain::Appointment,
            crate::domain::AppointmentStatus,
            crate::domains::workshop::api::workshop::CreateWorkshopResource,
            crate::domains::workshop::api::workshop::UpdateWorkshopResource,
            crate::domains::workshop::api::appointment::CreateAppointmentResource,
            crate::domains::workshop::api::appointment::RescheduleAppointmentResource,
            crate::domains::workshop::api::appointment::AppointmentNoteResource,
        ),
    ),
    paths(
        crate::api::health::health,
        crate::api::health::ready,

        crate::domains::iam::api::authentication::sign_up,
        crate::domains::iam::api::authentication::sign_in,
        crate::domains::iam::api::user::list_users,
        crate::domains::iam::api::user::get_current_user,
        crate::domains::iam::api::user::get_user,
        crate::domains::iam::api::user::get_user_by_username,
        crate::domains::iam::api::role::list_roles,

        crate::domains::profiles::api::person::create_person_profile,
        crate::domains::profiles::api::person::list_person_profiles,
        crate::domains::profiles::api::person::get_person_profile,
        crate::domains::profiles::api::person::get_person_profile_by_user,
        crate::domains::profiles::api::person::update_person_profile,
        crate::domains::profiles::api::business::create_business_profile,
        crate::domains::profiles::api::business::list_business_profiles,
        crate::domains::profiles::api::business::get_business_profile,
        crate::domains::profiles::api::business::get_business_profile_by_user,
        crate::domains::profiles::api::business::update_business_profile,

        crate::domains::device_management::api::vehicle::register_vehicle,
        crate::domains::device_management::api::vehicle::list_vehicles,
        crate::domains::device_management::api::vehicle::get_vehicle,
        crate::domains::device_management::api::vehicle::update_vehicle,
        crate::domains::device_management::api::vehicle::delete_vehicle,
        crate::domains::device_management::api::driver::create_driver,
        crate::domains::device_management::api::driver::list_drivers,
        crate::domains::device_management::api::driver::get_driver,
        crate::domains::device_management::api::driver::assign_driver,
        crate::domains::device_management::api::driver::unassign_driver,
        crate::domains::device_management::api::driver::delete_driver,

        crate::domains::devices::api::device::register_device,
        crate::domains::devices::api::device::list_devices,
        crate::domains::devices::api::device::get_device,
        crate::domains::devices::api::device::get_device_by_mac,
        crate::domains::devices::api::device::assign_device,
        crate::domains::devices::api::device::unassign_device,
        crate::domains::devices::api::device::update_device_status,
        crate::domains::devices::api::device::delete_device,
        crate::domains::devices::api::telemetry::record_telemetry,
        crate::domains::devices::api::telemetry::list_telemetry,

        crate::domains::payments::api::subscription::list_plans,
        crate::domains::payments::api::subscription::create_checkout,
        crate::domains::payments::api::subscription::get_subscription,
        crate::domains::payments::api::subscription::get_user_subscription,
        crate::domains::payments::api::subscription::cancel_subscription,
        crate::domains::payments::api::webhook::stripe_webhook,

        crate::domains::insights::api::insight::generate_insight,
        crate::domains::insights::api::insight::get_insight,
        crate::domains::insights::api::insight::list_vehicle_insights,
        crate::domains::insights::api::insight::latest_vehicle_insight,

        crate::domains::workshop::api::workshop::create_workshop,
        crate::domains::workshop::api::workshop::list_workshops,
        crate::domains::workshop::api::workshop::get_workshop,
        crate::domains::workshop::api::workshop::update_workshop,
        crate::domains::workshop::api::appointment::create_appointment,
        crate::domains::workshop::api::appointment::get_appointment,
        crate::domains::workshop::api::appointment::list_workshop_appointments,
        crate::domains::workshop::api::appointment::list_customer_appointments,
        crate::domains::workshop::api::appointment::reschedule_appointment,
        crate::domains::workshop::api::appointment::confirm_appointment,
        crate::domains::workshop::api::appointment::start_appointment,
        crate::domains::workshop::api::appointment::complete_appointment,
        crate::domains::workshop::api::appointment::cancel_appointment,
    ),
)]
pub struct ApiDoc;

impl ApiDoc {
    /// The generated document plus the bearer JWT security scheme
    pub fn build() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(c) = doc.components.as_mut() {
            c.security_schemes.insert(
                "bearer_jwt".to_string(),
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            );
        }
        doc
    }
}
