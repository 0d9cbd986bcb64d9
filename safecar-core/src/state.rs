//! Application state traits for dependency injection
//!
//! Handlers are generic over these traits so the same code runs against
//! the production `AppState` and the in-memory state used by HTTP tests.

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::repository::{
    AppointmentRepository, BusinessProfileRepository, DeviceRepository, DriverRepository,
    InsightRepository, PersonProfileRepository, RoleRepository, SubscriptionRepository,
    TelemetryRepository, UserRepository, VehicleRepository, WorkshopRepository,
};
use crate::service::{
    DeviceService, DriverService, InsightService, ProfileService, RoleService,
    SubscriptionService, UserService, VehicleService, WorkshopService,
};

/// Base state shared by every bounded context.
pub trait HasServices: Clone + Send + Sync + 'static {
    /// Get the application configuration
    fn config(&self) -> &Config;

    /// Get the JWT manager
    fn jwt_manager(&self) -> &JwtManager;

    /// Check if the database is reachable
    fn check_ready(&self) -> impl std::future::Future<Output = bool> + Send;
}

/// Identity and access management
pub trait HasIam: HasServices {
    type UserRepo: UserRepository;
    type RoleRepo: RoleRepository;

    fn user_service(&self) -> &UserService<Self::UserRepo>;

    fn role_service(&self) -> &RoleService<Self::RoleRepo>;
}

/// Person and business profiles
pub trait HasProfiles: HasServices {
    type PersonProfileRepo: PersonProfileRepository;
    type BusinessProfileRepo: BusinessProfileRepository;

    fn profile_service(
        &self,
    ) -> &ProfileService<Self::PersonProfileRepo, Self::BusinessProfileRepo>;
}

/// Vehicles and drivers
pub trait HasFleet: HasServices {
    type VehicleRepo: VehicleRepository;
    type DriverRepo: DriverRepository;

    fn vehicle_service(&self) -> &VehicleService<Self::VehicleRepo>;

    fn driver_service(&self) -> &DriverService<Self::DriverRepo, Self::VehicleRepo>;
}

/// IoT devices and their telemetry
pub trait HasDevices: HasServices {
    type DeviceRepo: DeviceRepository;
    type TelemetryRepo: TelemetryRepository;

    fn device_service(&self) -> &DeviceService<Self::DeviceRepo, Self::TelemetryRepo>;
}

/// Stripe subscriptions
pub trait HasPayments: HasServices {
    type SubscriptionRepo: SubscriptionRepository;

    fn subscription_service(&self) -> &SubscriptionService<Self::SubscriptionRepo>;
}

/// AI generated vehicle insights
pub trait HasInsights: HasServices {
    type InsightRepo: InsightRepository;

    fn insight_service(&self) -> &InsightService<Self::InsightRepo>;
}

/// Workshops and appointments
pub trait HasWorkshops: HasServices {
    type WorkshopRepo: WorkshopRepository;
    type AppointmentRepo: AppointmentRepository;

    fn workshop_service(&self) -> &WorkshopService<Self::WorkshopRepo, Self::AppointmentRepo>;
}
