pub mod driver;
pub mod vehicle;
