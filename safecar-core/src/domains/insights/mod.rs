//! AI generated risk and maintenance insights built from vehicle telemetry

pub mod api;
pub mod context;
pub mod routes;
