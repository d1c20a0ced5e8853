//! HTTP handlers for the Garage Management Platform

pub mod alert;
pub mod health;
pub mod part;
pub mod reporting;
pub mod stock;

pub use alert::*;
pub use health::*;
pub use part::*;
pub use reporting::*;
pub use stock::*;
