pub mod device;
pub mod telemetry;
