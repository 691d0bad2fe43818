/// Database configuration and connection management
pub mod database;

/// Wizard session tunables from race_manager.toml and environment
pub mod settings;
