//! SafeCar Core - fleet management backend
//!
//! REST API for vehicle owners, drivers and workshops: vehicle registry,
//! IoT telemetry, Stripe subscriptions, AI insights and service appointments.

pub mod api;
pub mod config;
pub mod domain;
pub mod domains;
pub mod error;
pub mod genai;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod stripe;
pub mod telemetry;

pub use config::Config;
pub use error::{AppError, Result};
