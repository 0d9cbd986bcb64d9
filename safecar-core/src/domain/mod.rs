//! Domain models for SafeCar Core

pub mod common;
pub mod device;
pub mod insight;
pub mod profile;
pub mod subscription;
pub mod user;
pub mod vehicle;
pub mod workshop;

pub use common::*;
pub use device::*;
pub use insight::*;
pub use profile::*;
pub use subscription::*;
pub use user::*;
pub use vehicle::*;
pub use workshop::*;
