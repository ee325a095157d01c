//! Settings module - typed dashboard configuration consumed by core services.

mod settings_model;

pub use settings_model::DashboardSettings;
