pub mod business;
pub mod person;
