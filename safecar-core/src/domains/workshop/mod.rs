//! Workshops and the service appointments booked with them

pub mod api;
pub mod context;
pub mod routes;
