//! Semantic validation for the scheduler wizard.
//!
//! These checks run at capture time and again before the scheduler's finalize
//! writes anything - the navigation gate itself stays purely structural.
//! Every function returns human-readable problem descriptions; an empty list
//! means the data is acceptable.

use crate::core::field::FieldValue;
use crate::core::timezones;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;

/// Minimum title length after trimming.
pub const MIN_TITLE_LEN: usize = 3;

/// Reminders further out than 72 hours before the event are rejected.
pub const MAX_REMINDER_MINUTES: i64 = 4320;

/// Grace window for the "must be in the future" checks. An instant-publish
/// capture stamps the current time, which is already in the past by the time
/// finalize re-validates; anything within this window still counts as future.
pub const DATETIME_GRACE_MINUTES: i64 = 5;

/// Validates the event title: long enough and unique within the guild.
/// The uniqueness check is case-insensitive, so the duplicate surfaces here
/// at the naming step instead of failing the final insert.
pub async fn validate_title(
    db: &DatabaseConnection,
    guild_id: &str,
    title: &str,
) -> crate::errors::Result<Vec<String>> {
    let trimmed = title.trim();
    if trimmed.len() < MIN_TITLE_LEN {
        return Ok(vec![format!(
            "The event title must be at least {MIN_TITLE_LEN} characters long."
        )]);
    }

    if !crate::core::events::check_title_unique(db, guild_id, trimmed).await? {
        return Ok(vec![format!(
            "An event named \"{trimmed}\" already exists in this server."
        )]);
    }

    Ok(Vec::new())
}

/// Validates a timezone name against the curated catalogue.
#[must_use]
pub fn validate_timezone(timezone: &str) -> Vec<String> {
    if timezones::is_valid_zone(timezone) {
        Vec::new()
    } else {
        vec![format!("Unknown timezone: {timezone}")]
    }
}

/// Validates the publication and registration dates: both must be in the
/// future (within [`DATETIME_GRACE_MINUTES`]), and registration cannot open
/// after the event is published.
#[must_use]
pub fn validate_datetimes(
    publish: DateTime<Utc>,
    registration_open: Option<DateTime<Utc>>,
) -> Vec<String> {
    let mut problems = Vec::new();
    let cutoff = Utc::now() - chrono::Duration::minutes(DATETIME_GRACE_MINUTES);

    if publish < cutoff {
        problems.push("The publication date must be in the future.".to_string());
    }
    if let Some(open) = registration_open {
        if open < cutoff {
            problems.push("The registration opening date must be in the future.".to_string());
        }
        if open > publish {
            problems.push(
                "Registration cannot open after the event is published.".to_string(),
            );
        }
    }

    problems
}

/// Validates reminder lead times: positive and at most 72 hours.
#[must_use]
pub fn validate_reminders(reminders: &[i64]) -> Vec<String> {
    let mut problems = Vec::new();
    for &minutes in reminders {
        if minutes <= 0 {
            problems.push(format!(
                "Invalid reminder: {minutes} minutes (must be positive)."
            ));
        } else if minutes > MAX_REMINDER_MINUTES {
            problems.push(format!(
                "Reminder too far out: {minutes} minutes (maximum is 72 hours)."
            ));
        }
    }
    problems
}

/// Extracts the reminder lead times from session data. Non-numeric entries
/// are reported by [`validate_reminders`] via a sentinel of zero.
#[must_use]
pub fn reminder_minutes(data: &BTreeMap<String, FieldValue>) -> Vec<i64> {
    match data.get("reminders") {
        Some(FieldValue::List(items)) => items
            .iter()
            .map(|item| item.trim().parse::<i64>().unwrap_or(0))
            .collect(),
        Some(FieldValue::Integer(minutes)) => vec![*minutes],
        _ => Vec::new(),
    }
}

/// Runs the full scheduler validation over a session's data and collects
/// every problem found. A duplicate title is tolerated here when the session
/// is editing an existing draft (`event_id` present) - the title it carries
/// is its own.
pub async fn validate_schedule(
    db: &DatabaseConnection,
    guild_id: &str,
    data: &BTreeMap<String, FieldValue>,
) -> crate::errors::Result<Vec<String>> {
    let mut problems = Vec::new();

    match data.get("title").and_then(FieldValue::as_text) {
        Some(title) => {
            let resuming_draft = data.get("event_id").is_some();
            if title.trim().len() < MIN_TITLE_LEN {
                problems.push(format!(
                    "The event title must be at least {MIN_TITLE_LEN} characters long."
                ));
            } else if !resuming_draft {
                problems.extend(validate_title(db, guild_id, title).await?);
            }
        }
        None => problems.push("No event title has been set.".to_string()),
    }

    if let Some(tz) = data.get("timezone").and_then(FieldValue::as_text) {
        problems.extend(validate_timezone(tz));
    }

    match data.get("publish_datetime_utc").and_then(FieldValue::as_timestamp) {
        Some(publish) => {
            let registration = data
                .get("registration_open_utc")
                .and_then(FieldValue::as_timestamp);
            problems.extend(validate_datetimes(publish, registration));
        }
        None => problems.push("No publication date has been set.".to_string()),
    }

    let reminders = reminder_minutes(data);
    if !reminders.is_empty() {
        problems.extend(validate_reminders(&reminders));
    }

    Ok(problems)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;

    fn base_data() -> BTreeMap<String, FieldValue> {
        let mut data = BTreeMap::new();
        data.insert("title".to_string(), FieldValue::from("Spa GT3 Night"));
        data.insert(
            "publish_datetime_utc".to_string(),
            FieldValue::from(Utc::now() + Duration::hours(6)),
        );
        data
    }

    #[tokio::test]
    async fn test_short_title_rejected() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;

        let problems = validate_title(&db, "guild-1", "ab").await?;
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("at least"));

        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_title_surfaces_at_naming() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        crate::core::events::insert_event(&db, draft_event("guild-1", "Spa GT3 Night"), false)
            .await?;

        let problems = validate_title(&db, "guild-1", "spa gt3 night").await?;
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("already exists"));

        // Same title in another guild is acceptable.
        assert!(validate_title(&db, "guild-2", "spa gt3 night").await?.is_empty());

        Ok(())
    }

    #[test]
    fn test_timezone_validation() {
        assert!(validate_timezone("Europe/Madrid").is_empty());
        assert_eq!(validate_timezone("Narnia/Lantern").len(), 1);
    }

    #[test]
    fn test_datetime_ordering() {
        let publish = Utc::now() + Duration::hours(4);

        assert!(validate_datetimes(publish, None).is_empty());
        assert!(validate_datetimes(publish, Some(publish - Duration::hours(1))).is_empty());

        // Registration after publication is inconsistent.
        let problems = validate_datetimes(publish, Some(publish + Duration::hours(1)));
        assert_eq!(problems.len(), 1);

        // A past publication date is rejected, but a just-captured "publish
        // now" timestamp stays inside the grace window.
        let problems = validate_datetimes(Utc::now() - Duration::hours(1), None);
        assert_eq!(problems.len(), 1);
        assert!(validate_datetimes(Utc::now() - Duration::minutes(1), None).is_empty());
    }

    #[test]
    fn test_reminder_bounds() {
        assert!(validate_reminders(&[180, 1440, 2880]).is_empty());
        assert_eq!(validate_reminders(&[0]).len(), 1);
        assert_eq!(validate_reminders(&[-30]).len(), 1);
        assert_eq!(validate_reminders(&[4321]).len(), 1);
    }

    #[tokio::test]
    async fn test_full_validation_aggregates_problems() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;

        let mut data = base_data();
        data.insert("timezone".to_string(), FieldValue::from("Narnia/Lantern"));
        data.insert(
            "reminders".to_string(),
            FieldValue::List(vec!["180".to_string(), "9999".to_string()]),
        );

        let problems = validate_schedule(&db, "guild-1", &data).await?;
        assert_eq!(problems.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_full_validation_accepts_good_data() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;

        let mut data = base_data();
        data.insert("timezone".to_string(), FieldValue::from("Europe/Madrid"));
        data.insert(
            "reminders".to_string(),
            FieldValue::List(vec!["180".to_string(), "1440".to_string()]),
        );

        assert!(validate_schedule(&db, "guild-1", &data).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_resumed_draft_keeps_its_own_title() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let id = crate::core::events::insert_event(
            &db,
            draft_event("guild-1", "Spa GT3 Night"),
            false,
        )
        .await?;

        let mut data = base_data();
        data.insert("event_id".to_string(), FieldValue::Integer(id));

        // The draft being scheduled owns the "duplicate" row.
        assert!(validate_schedule(&db, "guild-1", &data).await?.is_empty());

        Ok(())
    }
}
