//! Shared test utilities for `RaceManager`.
//!
//! Provides the in-memory database setup used by every integration test and
//! fixture constructors for event records with sensible defaults.

use crate::{entities::event, errors::Result};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a draft event `ActiveModel` with the minimum set of required
/// columns filled in.
///
/// # Defaults
/// * `event_type`: "standard"
/// * `status`: "draft", unpublished
/// * `created_by`: `"user-0"`
/// * `created_at`: now
#[must_use]
pub fn draft_event(guild_id: &str, title: &str) -> event::ActiveModel {
    event::ActiveModel {
        guild_id: Set(guild_id.to_string()),
        title: Set(title.to_string()),
        event_type: Set("standard".to_string()),
        status: Set("draft".to_string()),
        is_published: Set(false),
        is_championship: Set(false),
        created_by: Set("user-0".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}
