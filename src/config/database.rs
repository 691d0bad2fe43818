//! Database configuration module for `RaceManager`.
//!
//! Handles the `SQLite` connection and table creation using `SeaORM`. Tables
//! are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without hand-written SQL.

use crate::entities::{Event, Server};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from the `DATABASE_URL` environment variable or
/// falls back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/race_manager.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url())
        .await
        .map_err(Into::into)
}

/// Creates all necessary database tables from the entity definitions.
/// Idempotent: existing tables are left alone, so this runs on every start.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut event_table = schema.create_table_from_entity(Event);
    let mut server_table = schema.create_table_from_entity(Server);

    db.execute(builder.build(event_table.if_not_exists())).await?;
    db.execute(builder.build(server_table.if_not_exists())).await?;

    Ok(())
}
