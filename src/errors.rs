//! Unified error types and result handling for `RaceManager`.
//!
//! Navigation rejections (missing fields, absent sessions, unknown steps) are
//! outcome values in `core::navigation`, not errors. The variants here cover
//! the failures that actually abort an operation: configuration problems,
//! database errors, and the Discord framework.

use thiserror::Error;

/// Top-level error type shared by the core and bot layers.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the configuration problem
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Event {id} not found")]
    EventNotFound {
        /// Primary key that failed to resolve
        id: i64,
    },

    #[error("An event named \"{title}\" already exists in this server")]
    DuplicateTitle {
        /// The conflicting title as submitted
        title: String,
    },

    #[error("Invalid value for {field}: {message}")]
    InvalidField {
        /// Session field the input was meant for
        field: String,
        /// Why the value was rejected
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
