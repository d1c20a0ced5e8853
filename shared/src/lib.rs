//! Shared types and domain logic for the Garage Management Platform
//!
//! This crate contains types and pure business rules shared between the
//! backend and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
