pub mod api;
pub mod app_error;
pub mod config;
pub mod models;
pub mod search;
pub mod telemetry;
pub mod view;

pub use crate::config::AppConfig;
