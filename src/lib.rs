// Library exports for testing
pub mod api;
pub mod config;
pub mod errors;
pub mod health;
pub mod logging;
pub mod metrics;
