//! Event persistence logic - CRUD and status transitions for the events table.
//!
//! The wizards treat this module as their persistence collaborator: finalize
//! hands a fully assembled record to [`insert_event`] or [`update_event`],
//! and the management commands drive the status transitions. `status` is the
//! source of truth for the lifecycle (`draft` → `scheduled` → `active` →
//! `archived`/`closed`); `is_published` is kept in sync as a derived flag.

use crate::{
    entities::{Event, event},
    errors::{Error, Result},
};
use chrono::{Duration, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveValue, QueryOrder, Set, prelude::*};
use std::fmt;
use std::str::FromStr;

/// Number of days an archived event is kept before it expires.
pub const ARCHIVE_RETENTION_DAYS: i64 = 30;

/// Lifecycle status of an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventStatus {
    /// Saved but not published; can be resumed by the scheduler wizard
    Draft,
    /// Queued for automatic publication at `publish_datetime_utc`
    Scheduled,
    /// Published; registration and reminders are live
    Active,
    /// In the trash; expires after [`ARCHIVE_RETENTION_DAYS`]
    Archived,
    /// Finished, manually or automatically
    Closed,
}

impl EventStatus {
    /// The status string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "draft" => Ok(Self::Draft),
            "scheduled" => Ok(Self::Scheduled),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "closed" => Ok(Self::Closed),
            other => Err(Error::Config {
                message: format!("Unknown event status: {other}"),
            }),
        }
    }
}

/// Finds an event by title within a guild, case-insensitively.
pub async fn find_by_title(
    db: &DatabaseConnection,
    guild_id: &str,
    title: &str,
) -> Result<Option<event::Model>> {
    Event::find()
        .filter(event::Column::GuildId.eq(guild_id))
        .filter(
            Expr::expr(Func::lower(Expr::col(event::Column::Title)))
                .eq(title.trim().to_lowercase()),
        )
        .one(db)
        .await
        .map_err(Into::into)
}

/// Whether no event with this title exists yet in the guild. The check is
/// case-insensitive so "Spa Night" and "spa night" collide.
pub async fn check_title_unique(
    db: &DatabaseConnection,
    guild_id: &str,
    title: &str,
) -> Result<bool> {
    Ok(find_by_title(db, guild_id, title).await?.is_none())
}

/// Inserts a new event, or patches the existing one when `overwrite` is set.
///
/// The model must carry `guild_id` and `title`; duplicates within the guild
/// are rejected with [`Error::DuplicateTitle`] unless overwriting. A
/// championship event without a series root becomes its own root.
///
/// Returns the event id.
pub async fn insert_event(
    db: &DatabaseConnection,
    model: event::ActiveModel,
    overwrite: bool,
) -> Result<i64> {
    let guild_id = match &model.guild_id {
        ActiveValue::Set(v) => v.clone(),
        _ => {
            return Err(Error::Config {
                message: "insert_event requires guild_id".to_string(),
            });
        }
    };
    let title = match &model.title {
        ActiveValue::Set(v) => v.clone(),
        _ => {
            return Err(Error::Config {
                message: "insert_event requires a title".to_string(),
            });
        }
    };

    if let Some(existing) = find_by_title(db, &guild_id, &title).await? {
        if !overwrite {
            return Err(Error::DuplicateTitle { title });
        }
        update_event(db, existing.id, model).await?;
        tracing::info!(event_id = existing.id, %title, "event overwritten");
        return Ok(existing.id);
    }

    let inserted = model.insert(db).await?;
    tracing::info!(event_id = inserted.id, %title, "event inserted");

    // Championship auto-root: the first round of a series points at itself.
    if inserted.is_championship && inserted.championship_id.is_none() {
        let root = event::ActiveModel {
            id: Set(inserted.id),
            championship_id: Set(Some(inserted.id)),
            ..Default::default()
        };
        root.update(db).await?;
    }

    Ok(inserted.id)
}

/// Retrieves an event by id.
pub async fn get_event(db: &DatabaseConnection, event_id: i64) -> Result<Option<event::Model>> {
    Event::find_by_id(event_id).one(db).await.map_err(Into::into)
}

/// Lists a guild's events, optionally filtered by status, type and a minimum
/// event date, ordered by event date.
pub async fn list_events(
    db: &DatabaseConnection,
    guild_id: &str,
    status: Option<EventStatus>,
    event_type: Option<&str>,
    after: Option<DateTimeUtc>,
) -> Result<Vec<event::Model>> {
    let mut query = Event::find().filter(event::Column::GuildId.eq(guild_id));

    if let Some(status) = status {
        query = query.filter(event::Column::Status.eq(status.as_str()));
    }
    if let Some(event_type) = event_type {
        query = query.filter(event::Column::EventType.eq(event_type));
    }
    if let Some(after) = after {
        query = query.filter(event::Column::EventDatetimeUtc.gte(after));
    }

    query
        .order_by_asc(event::Column::EventDatetimeUtc)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists a guild's draft events, newest first. Feeds the scheduler wizard's
/// "pick a saved draft" entry point.
pub async fn list_drafts(db: &DatabaseConnection, guild_id: &str) -> Result<Vec<event::Model>> {
    Event::find()
        .filter(event::Column::GuildId.eq(guild_id))
        .filter(event::Column::Status.eq(EventStatus::Draft.as_str()))
        .order_by_desc(event::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Patches fields on an existing event and stamps `last_edited_date`.
/// Returns false when the event does not exist.
pub async fn update_event(
    db: &DatabaseConnection,
    event_id: i64,
    fields: event::ActiveModel,
) -> Result<bool> {
    if get_event(db, event_id).await?.is_none() {
        return Ok(false);
    }

    let mut fields = fields;
    fields.id = Set(event_id);
    fields.last_edited_date = Set(Some(Utc::now()));
    fields.update(db).await?;
    Ok(true)
}

/// Queues an event for publication at `publish_dt` (status `scheduled`).
pub async fn schedule_event(
    db: &DatabaseConnection,
    event_id: i64,
    actor: &str,
    publish_dt: DateTimeUtc,
) -> Result<()> {
    let updated = update_event(
        db,
        event_id,
        event::ActiveModel {
            status: Set(EventStatus::Scheduled.as_str().to_string()),
            is_published: Set(false),
            publish_datetime_utc: Set(Some(publish_dt)),
            last_edited_by: Set(Some(actor.to_string())),
            ..Default::default()
        },
    )
    .await?;

    if !updated {
        return Err(Error::EventNotFound { id: event_id });
    }
    tracing::info!(event_id, %publish_dt, "event scheduled");
    Ok(())
}

/// Publishes an event immediately (status `active`).
pub async fn publish_event(db: &DatabaseConnection, event_id: i64, actor: &str) -> Result<()> {
    let now = Utc::now();
    let updated = update_event(
        db,
        event_id,
        event::ActiveModel {
            status: Set(EventStatus::Active.as_str().to_string()),
            is_published: Set(true),
            published_at: Set(Some(now)),
            last_edited_by: Set(Some(actor.to_string())),
            ..Default::default()
        },
    )
    .await?;

    if !updated {
        return Err(Error::EventNotFound { id: event_id });
    }
    tracing::info!(event_id, "event published");
    Ok(())
}

/// Sends an event to the trash (status `archived`); the record expires
/// [`ARCHIVE_RETENTION_DAYS`] days later.
pub async fn archive_event(db: &DatabaseConnection, event_id: i64, actor: &str) -> Result<()> {
    let now = Utc::now();
    let updated = update_event(
        db,
        event_id,
        event::ActiveModel {
            status: Set(EventStatus::Archived.as_str().to_string()),
            is_published: Set(false),
            archived_at: Set(Some(now)),
            archive_expires_at: Set(Some(now + Duration::days(ARCHIVE_RETENTION_DAYS))),
            last_edited_by: Set(Some(actor.to_string())),
            ..Default::default()
        },
    )
    .await?;

    if !updated {
        return Err(Error::EventNotFound { id: event_id });
    }
    tracing::info!(event_id, "event archived");
    Ok(())
}

/// Restores an archived event to `active` and clears the archive markers.
pub async fn restore_event(db: &DatabaseConnection, event_id: i64) -> Result<()> {
    let updated = update_event(
        db,
        event_id,
        event::ActiveModel {
            status: Set(EventStatus::Active.as_str().to_string()),
            is_published: Set(true),
            archived_at: Set(None),
            archive_expires_at: Set(None),
            ..Default::default()
        },
    )
    .await?;

    if !updated {
        return Err(Error::EventNotFound { id: event_id });
    }
    Ok(())
}

/// Closes a finished event (status `closed`).
pub async fn close_event(db: &DatabaseConnection, event_id: i64, actor: &str) -> Result<()> {
    let updated = update_event(
        db,
        event_id,
        event::ActiveModel {
            status: Set(EventStatus::Closed.as_str().to_string()),
            is_published: Set(false),
            last_edited_by: Set(Some(actor.to_string())),
            ..Default::default()
        },
    )
    .await?;

    if !updated {
        return Err(Error::EventNotFound { id: event_id });
    }
    Ok(())
}

/// Deletes an event outright. Returns false when it did not exist.
pub async fn delete_event(db: &DatabaseConnection, event_id: i64) -> Result<bool> {
    let result = Event::delete_by_id(event_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_insert_and_get_event() -> Result<()> {
        let db = setup_test_db().await?;

        let id = insert_event(&db, draft_event("guild-1", "Spa GT3 Night"), false).await?;
        let event = get_event(&db, id).await?.unwrap();

        assert_eq!(event.title, "Spa GT3 Night");
        assert_eq!(event.status, "draft");
        assert!(!event.is_published);

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected_case_insensitively() -> Result<()> {
        let db = setup_test_db().await?;

        insert_event(&db, draft_event("guild-1", "Spa GT3 Night"), false).await?;
        let result = insert_event(&db, draft_event("guild-1", "spa gt3 night"), false).await;

        assert!(matches!(result, Err(Error::DuplicateTitle { .. })));

        // The same title in a different guild is fine.
        insert_event(&db, draft_event("guild-2", "Spa GT3 Night"), false).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_overwrite_patches_existing_event() -> Result<()> {
        let db = setup_test_db().await?;

        let id = insert_event(&db, draft_event("guild-1", "Monza 500"), false).await?;

        let mut patch = draft_event("guild-1", "Monza 500");
        patch.weather = Set(Some("Rain".to_string()));
        let second_id = insert_event(&db, patch, true).await?;

        assert_eq!(second_id, id);
        let event = get_event(&db, id).await?.unwrap();
        assert_eq!(event.weather.as_deref(), Some("Rain"));
        assert!(event.last_edited_date.is_some());

        Ok(())
    }

    #[tokio::test]
    async fn test_championship_becomes_its_own_root() -> Result<()> {
        let db = setup_test_db().await?;

        let mut model = draft_event("guild-1", "Winter Championship");
        model.is_championship = Set(true);
        let id = insert_event(&db, model, false).await?;

        let event = get_event(&db, id).await?.unwrap();
        assert_eq!(event.championship_id, Some(id));

        Ok(())
    }

    #[tokio::test]
    async fn test_status_transitions() -> Result<()> {
        let db = setup_test_db().await?;
        let id = insert_event(&db, draft_event("guild-1", "Imola Enduro"), false).await?;

        schedule_event(&db, id, "user-1", Utc::now() + Duration::hours(2)).await?;
        let event = get_event(&db, id).await?.unwrap();
        assert_eq!(event.status, "scheduled");
        assert!(!event.is_published);
        assert!(event.publish_datetime_utc.is_some());

        publish_event(&db, id, "user-1").await?;
        let event = get_event(&db, id).await?.unwrap();
        assert_eq!(event.status, "active");
        assert!(event.is_published);
        assert!(event.published_at.is_some());

        archive_event(&db, id, "user-2").await?;
        let event = get_event(&db, id).await?.unwrap();
        assert_eq!(event.status, "archived");
        assert_eq!(event.last_edited_by.as_deref(), Some("user-2"));
        let expires = event.archive_expires_at.unwrap();
        assert!(expires > Utc::now() + Duration::days(ARCHIVE_RETENTION_DAYS - 1));

        restore_event(&db, id).await?;
        let event = get_event(&db, id).await?.unwrap();
        assert_eq!(event.status, "active");
        assert!(event.archived_at.is_none());

        close_event(&db, id, "user-1").await?;
        assert_eq!(get_event(&db, id).await?.unwrap().status, "closed");

        Ok(())
    }

    #[tokio::test]
    async fn test_transition_on_missing_event_fails() -> Result<()> {
        let db = setup_test_db().await?;

        let result = publish_event(&db, 999, "user-1").await;
        assert!(matches!(result, Err(Error::EventNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_drafts_newest_first() -> Result<()> {
        let db = setup_test_db().await?;

        let mut first = draft_event("guild-1", "Older Draft");
        first.created_at = Set(Utc::now() - Duration::hours(2));
        insert_event(&db, first, false).await?;
        insert_event(&db, draft_event("guild-1", "Newer Draft"), false).await?;

        let published = insert_event(&db, draft_event("guild-1", "Published"), false).await?;
        publish_event(&db, published, "user-1").await?;

        let drafts = list_drafts(&db, "guild-1").await?;
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Newer Draft");
        assert_eq!(drafts[1].title, "Older Draft");

        Ok(())
    }

    #[tokio::test]
    async fn test_list_events_filters() -> Result<()> {
        let db = setup_test_db().await?;

        let mut league = draft_event("guild-1", "League Round 1");
        league.event_type = Set("league".to_string());
        insert_event(&db, league, false).await?;
        insert_event(&db, draft_event("guild-1", "Open Race"), false).await?;
        insert_event(&db, draft_event("guild-2", "Elsewhere"), false).await?;

        let all = list_events(&db, "guild-1", None, None, None).await?;
        assert_eq!(all.len(), 2);

        let leagues =
            list_events(&db, "guild-1", Some(EventStatus::Draft), Some("league"), None).await?;
        assert_eq!(leagues.len(), 1);
        assert_eq!(leagues[0].title, "League Round 1");

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_event() -> Result<()> {
        let db = setup_test_db().await?;
        let id = insert_event(&db, draft_event("guild-1", "Short-lived"), false).await?;

        assert!(delete_event(&db, id).await?);
        assert!(get_event(&db, id).await?.is_none());
        assert!(!delete_event(&db, id).await?);

        Ok(())
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            EventStatus::Draft,
            EventStatus::Scheduled,
            EventStatus::Active,
            EventStatus::Archived,
            EventStatus::Closed,
        ] {
            assert_eq!(status.as_str().parse::<EventStatus>().unwrap(), status);
        }
        assert!("published".parse::<EventStatus>().is_err());
    }
}
