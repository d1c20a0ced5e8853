//! Domain models for the Garage Management Platform

mod stock;

pub use stock::*;
