//! Fleet registry: vehicles and the drivers assigned to them

pub mod api;
pub mod context;
pub mod routes;
