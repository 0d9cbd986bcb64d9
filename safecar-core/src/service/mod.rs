//! Business logic layer

pub mod acl;
pub mod device;
pub mod insight;
pub mod profile;
pub mod role;
pub mod subscription;
pub mod user;
pub mod vehicle;
pub mod workshop;

pub use device::DeviceService;
pub use insight::InsightService;
pub use profile::ProfileService;
pub use role::RoleService;
pub use subscription::SubscriptionService;
pub use user::UserService;
pub use vehicle::{DriverService, VehicleService};
pub use workshop::WorkshopService;

/// Row offset for a 1-based page. Saturates instead of overflowing on huge pages.
pub(crate) fn page_offset(page: i64, per_page: i64) -> i64 {
    page.saturating_sub(1).max(0).saturating_mul(per_page)
}
