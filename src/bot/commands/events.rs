//! Event management commands - list, delete, archive, restore.
//!
//! Thin wrappers over `core::events`; the wizards own creation and
//! scheduling.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::events::{self, EventStatus},
        errors::Result,
    };
    use std::fmt::Write;

    #[derive(poise::ChoiceParameter)]
    pub enum StatusChoice {
        #[name = "draft"]
        Draft,
        #[name = "scheduled"]
        Scheduled,
        #[name = "active"]
        Active,
        #[name = "archived"]
        Archived,
        #[name = "closed"]
        Closed,
    }

    impl StatusChoice {
        const fn as_status(&self) -> EventStatus {
            match self {
                Self::Draft => EventStatus::Draft,
                Self::Scheduled => EventStatus::Scheduled,
                Self::Active => EventStatus::Active,
                Self::Archived => EventStatus::Archived,
                Self::Closed => EventStatus::Closed,
            }
        }
    }

    /// Lists this server's events by status.
    #[poise::command(slash_command, guild_only)]
    pub async fn list_events(
        ctx: Context<'_>,
        #[description = "Status to filter by"] status: StatusChoice,
    ) -> Result<()> {
        let guild_id = ctx.guild_id().map(|g| g.to_string()).unwrap_or_default();
        let status = status.as_status();

        let events =
            events::list_events(&ctx.data().database, &guild_id, Some(status), None, None).await?;

        if events.is_empty() {
            ctx.say(format!("⚠️ No events with status **{status}**.")).await?;
            return Ok(());
        }

        let mut reply = format!("📋 **Events — {status}**\n");
        for event in &events {
            writeln!(
                &mut reply,
                "📝 **{}** (id `{}`) — created {}",
                event.title,
                event.id,
                event.created_at.format("%Y-%m-%d %H:%M")
            )?;
        }
        ctx.say(reply).await?;
        Ok(())
    }

    /// Deletes an event permanently.
    #[poise::command(slash_command, guild_only)]
    pub async fn delete_event(
        ctx: Context<'_>,
        #[description = "Id of the event to delete"] event_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(event) = events::get_event(db, event_id).await? else {
            ctx.say("❌ No event with that id exists.").await?;
            return Ok(());
        };

        events::delete_event(db, event_id).await?;
        ctx.say(format!("🗑️ Event **{}** deleted.", event.title)).await?;
        Ok(())
    }

    /// Archives an event; it expires 30 days later.
    #[poise::command(slash_command, guild_only)]
    pub async fn archive_event(
        ctx: Context<'_>,
        #[description = "Id of the event to archive"] event_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(event) = events::get_event(db, event_id).await? else {
            ctx.say("❌ Event not found.").await?;
            return Ok(());
        };

        events::archive_event(db, event_id, &ctx.author().id.to_string()).await?;
        ctx.say(format!("📦 Event **{}** archived.", event.title)).await?;
        Ok(())
    }

    /// Restores an archived event.
    #[poise::command(slash_command, guild_only)]
    pub async fn restore_event(
        ctx: Context<'_>,
        #[description = "Id of the event to restore"] event_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let event = events::get_event(db, event_id).await?;
        let Some(event) = event.filter(|e| e.status == EventStatus::Archived.as_str()) else {
            ctx.say("⚠️ That event is not archived.").await?;
            return Ok(());
        };

        events::restore_event(db, event_id).await?;
        ctx.say(format!("✅ Event **{}** restored.", event.title)).await?;
        Ok(())
    }
}

pub use inner::*;
