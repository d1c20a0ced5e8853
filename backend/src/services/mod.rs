//! Business logic services for the Garage Management Platform

pub mod part;
pub mod reporting;
pub mod stock;

pub use part::PartService;
pub use reporting::ReportingService;
pub use stock::StockService;
