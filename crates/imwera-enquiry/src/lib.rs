pub mod analytics;
pub mod catalog;
pub mod config;
pub mod enquiry;
pub mod error;
pub mod telemetry;
