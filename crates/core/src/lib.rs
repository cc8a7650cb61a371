//! Core business logic for Lectro.

pub mod services;

pub use services::*;
