//! Data access layer (Repository pattern)

pub mod appointment;
pub mod device;
pub mod driver;
pub mod insight;
pub mod profile;
pub mod role;
pub mod subscription;
pub mod telemetry;
pub mod user;
pub mod vehicle;
pub mod workshop;

pub use appointment::AppointmentRepository;
pub use device::DeviceRepository;
pub use driver::DriverRepository;
pub use insight::InsightRepository;
pub use profile::{BusinessProfileRepository, PersonProfileRepository};
pub use role::RoleRepository;
pub use subscription::SubscriptionRepository;
pub use telemetry::TelemetryRepository;
pub use user::UserRepository;
pub use vehicle::VehicleRepository;
pub use workshop::WorkshopRepository;

use crate::error::AppError;

/// Map a unique-index violation to `Conflict`, anything else to `Database`
pub(crate) fn conflict_on_duplicate(e: sqlx::Error, message: impl Into<String>) -> AppError {
    let is_duplicate = e
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());
    if is_duplicate {
        AppError::Conflict(message.into())
    } else {
        AppError::Database(e)
    }
}
