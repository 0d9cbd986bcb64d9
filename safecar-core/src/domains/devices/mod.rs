//! IoT devices installed in vehicles and the telemetry they report

pub mod api;
pub mod context;
pub mod routes;
