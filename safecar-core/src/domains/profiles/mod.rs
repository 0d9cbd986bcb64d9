//! Person and business profiles attached to user accounts

pub mod api;
pub mod context;
pub mod routes;
