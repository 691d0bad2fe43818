//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests saved draft titles for the scheduler entry point and timezone
//! names from the curated catalogue.

use crate::{bot::BotData, core::events, core::timezones, errors::Error};

/// Provides autocomplete suggestions for draft event titles in the guild.
///
/// Queries the drafts for the current guild and returns up to 25 titles
/// matching the user's partial input, newest drafts first.
pub async fn autocomplete_draft_title(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Some(guild_id) = ctx.guild_id() else {
        return Vec::new();
    };

    let db = &ctx.data().database;
    let Ok(drafts) = events::list_drafts(db, &guild_id.to_string()).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    drafts
        .into_iter()
        .filter(|event| event.title.to_lowercase().contains(&partial_lower))
        .map(|event| event.title)
        .take(25) // Discord autocomplete limit
        .collect()
}

/// Provides autocomplete suggestions for timezone names.
pub async fn autocomplete_timezone(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();

    let mut matching: Vec<String> = timezones::all_zone_names()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .take(25)
        .collect();

    matching.sort();
    matching.dedup();
    matching
}
