//! HTTP middleware for SafeCar Core

pub mod auth;
pub mod metrics;
pub mod require_auth;
pub mod trace;

pub use auth::AuthUser;
pub use metrics::ObservabilityLayer;
pub use require_auth::{require_auth_middleware, AuthMiddlewareState};
pub use trace::SanitizedMakeSpan;
