//! Subscription plans paid through Stripe Checkout

pub mod api;
pub mod context;
pub mod routes;
