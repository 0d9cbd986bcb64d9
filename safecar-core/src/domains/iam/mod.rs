//! Identity and access management: sign-up, sign-in, users and roles

pub mod api;
pub mod context;
pub mod routes;
