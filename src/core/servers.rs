//! Per-guild settings - the default timezone.
//!
//! The scheduler wizard pre-fills its timezone from here when a resumed
//! draft does not carry one of its own.

use crate::{
    entities::{Server, server},
    errors::Result,
};
use sea_orm::{Set, prelude::*};

/// Retrieves a guild's settings row, if any.
pub async fn get_server(
    db: &DatabaseConnection,
    guild_id: &str,
) -> Result<Option<server::Model>> {
    Server::find_by_id(guild_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// The guild's default timezone, if configured.
pub async fn get_timezone(db: &DatabaseConnection, guild_id: &str) -> Result<Option<String>> {
    Ok(get_server(db, guild_id).await?.and_then(|s| s.timezone))
}

/// Sets (or replaces) the guild's default timezone.
pub async fn set_timezone(db: &DatabaseConnection, guild_id: &str, timezone: &str) -> Result<()> {
    match get_server(db, guild_id).await? {
        Some(existing) => {
            let mut model: server::ActiveModel = existing.into();
            model.timezone = Set(Some(timezone.to_string()));
            model.update(db).await?;
        }
        None => {
            let model = server::ActiveModel {
                guild_id: Set(guild_id.to_string()),
                timezone: Set(Some(timezone.to_string())),
            };
            model.insert(db).await?;
        }
    }
    Ok(())
}
