//! Core business logic for lisan-rs.

pub mod services;

pub use services::*;
