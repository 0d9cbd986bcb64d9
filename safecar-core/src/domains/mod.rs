//! Bounded contexts, each grouping its HTTP handlers and routes.

pub mod device_management;
pub mod devices;
pub mod iam;
pub mod insights;
pub mod payments;
pub mod profiles;
pub mod workshop;

/// Aggregate bound for building the full HTTP router from the context route modules.
pub trait DomainRouterState:
    iam::context::IamContext
    + profiles::context::ProfilesContext
    + device_management::context::DeviceManagementContext
    + devices::context::DevicesContext
    + payments::context::PaymentsContext
    + insights::context::InsightsContext
    + workshop::context::WorkshopContext
{
}

impl<T> DomainRouterState for T where
    T: iam::context::IamContext
        + profiles::context::ProfilesContext
        + device_management::context::DeviceManagementContext
        + devices::context::DevicesContext
        + payments::context::PaymentsContext
        + insights::context::InsightsContext
        + workshop::context::WorkshopContext
{
}
