//! Wizard coordinators - one per wizard kind.
//!
//! A coordinator owns the step plan and the session store for its wizard and
//! exposes the four operations the command layer drives: `start`,
//! `handle_step_input`, `navigate` and `finalize`. It is also where a
//! completed session's loose field map is assembled into an event record and
//! handed to the persistence layer, with audit fields stamped and the status
//! chosen by the user's terminal action.

use crate::core::events::{self, EventStatus};
use crate::core::field::FieldValue;
use crate::core::navigation::{NavAction, NavOutcome, NavigationController};
use crate::core::plan::WizardPlan;
use crate::core::session::{SessionStore, WizardKind};
use crate::core::validator;
use crate::entities::event;
use crate::errors::Result;
use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, Set};
use std::collections::BTreeMap;

/// What the user chose on the final step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TerminalAction {
    /// Publish immediately (status `active`)
    PublishNow,
    /// Keep as a draft for later editing or scheduling
    SaveDraft,
    /// Queue for automatic publication (status `scheduled`)
    Schedule,
    /// Send straight to the archive
    Archive,
}

impl TerminalAction {
    /// The event status this action results in.
    #[must_use]
    pub const fn status(self) -> EventStatus {
        match self {
            Self::PublishNow => EventStatus::Active,
            Self::SaveDraft => EventStatus::Draft,
            Self::Schedule => EventStatus::Scheduled,
            Self::Archive => EventStatus::Archived,
        }
    }
}

/// Result of a finalize attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// The event was persisted and the session destroyed.
    Saved {
        /// Id of the inserted or updated event
        event_id: i64,
        /// Status the event ended up in
        status: EventStatus,
    },
    /// The user has no active session for this wizard.
    NoSession,
    /// Semantic validation refused the data; the session is untouched.
    Rejected(Vec<String>),
}

/// Coordinator for one wizard kind: plan + session store + finalize handoff.
#[derive(Debug)]
pub struct WizardCoordinator {
    plan: WizardPlan,
    store: SessionStore,
}

impl WizardCoordinator {
    /// Creates a coordinator with a fresh session store for the plan's kind.
    #[must_use]
    pub fn new(plan: WizardPlan) -> Self {
        let store = SessionStore::new(plan.kind());
        Self { plan, store }
    }

    /// The coordinator's step plan.
    #[must_use]
    pub const fn plan(&self) -> &WizardPlan {
        &self.plan
    }

    /// The coordinator's session store.
    #[must_use]
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Starts (or restarts) a wizard session over the given initial data and
    /// returns the entry step: the first step whose required fields the data
    /// does not already satisfy. Resuming a half-known draft therefore skips
    /// the steps the user has effectively completed.
    pub async fn start(&self, user_id: u64, initial: BTreeMap<String, FieldValue>) -> u32 {
        let entry = validator::first_incomplete_step(&self.plan, &initial);
        self.store.start(user_id, initial).await;
        if entry > 1 {
            self.store.set_step(user_id, entry).await;
        }
        tracing::info!(user_id, kind = %self.plan.kind(), entry, "wizard started");
        entry
    }

    /// Merges a step's submitted fields into the session. Creates an empty
    /// session first if none exists (documented upsert contract).
    pub async fn handle_step_input(&self, user_id: u64, fields: BTreeMap<String, FieldValue>) {
        self.store.bulk_update(user_id, fields).await;
    }

    /// Resolves a navigation action against the session.
    pub async fn navigate(&self, user_id: u64, action: NavAction) -> NavOutcome {
        NavigationController::new(&self.plan, &self.store)
            .navigate(user_id, action)
            .await
    }

    /// Persists the completed wizard.
    ///
    /// Assembles the session's fields into an event record, stamps audit
    /// columns and the status for `action`, then inserts a new event - or
    /// patches the existing one when the session carries an `event_id` from a
    /// resumed draft. On success the session is deleted; on a persistence
    /// error it is preserved so the user can retry, losing nothing.
    pub async fn finalize(
        &self,
        db: &DatabaseConnection,
        user_id: u64,
        action: TerminalAction,
        actor: &str,
        guild_id: &str,
    ) -> Result<FinalizeOutcome> {
        let Some(session) = self.store.snapshot(user_id).await else {
            return Ok(FinalizeOutcome::NoSession);
        };
        let data = session.data;

        if self.plan.kind() == WizardKind::Scheduler {
            let problems = crate::core::schedule::validate_schedule(db, guild_id, &data).await?;
            if !problems.is_empty() {
                return Ok(FinalizeOutcome::Rejected(problems));
            }
        }

        let now = Utc::now();
        let status = action.status();
        let mut model = active_model_from_fields(&data);
        model.guild_id = Set(guild_id.to_string());
        model.status = Set(status.as_str().to_string());
        model.is_published = Set(action == TerminalAction::PublishNow);
        model.last_edited_by = Set(Some(actor.to_string()));
        match action {
            TerminalAction::PublishNow => {
                model.published_at = Set(Some(now));
                model.publish_datetime_utc = Set(Some(now));
            }
            TerminalAction::Archive => {
                model.archived_at = Set(Some(now));
                model.archive_expires_at =
                    Set(Some(now + Duration::days(events::ARCHIVE_RETENTION_DAYS)));
            }
            TerminalAction::SaveDraft | TerminalAction::Schedule => {}
        }

        let existing_id = data.get("event_id").and_then(FieldValue::as_integer);
        let persisted = match existing_id {
            Some(event_id) => {
                if events::update_event(db, event_id, model).await? {
                    Ok(event_id)
                } else {
                    Err(crate::errors::Error::EventNotFound { id: event_id })
                }
            }
            None => {
                model.created_by = Set(actor.to_string());
                model.created_at = Set(now);
                events::insert_event(db, model, false).await
            }
        };

        match persisted {
            Ok(event_id) => {
                self.store.delete(user_id).await;
                tracing::info!(
                    user_id,
                    kind = %self.plan.kind(),
                    event_id,
                    %status,
                    "wizard finalized"
                );
                Ok(FinalizeOutcome::Saved { event_id, status })
            }
            Err(error) => {
                // Session intentionally preserved: the user retries manually.
                tracing::error!(
                    user_id,
                    kind = %self.plan.kind(),
                    %error,
                    "finalize failed; session preserved"
                );
                Err(error)
            }
        }
    }
}

/// Assembles an event `ActiveModel` from a session's field map. Unknown keys
/// and wizard bookkeeping (`event_id`) are ignored; audit and status columns
/// are the coordinator's job.
#[must_use]
pub fn active_model_from_fields(data: &BTreeMap<String, FieldValue>) -> event::ActiveModel {
    let text = |key: &str| data.get(key).and_then(FieldValue::as_text).map(str::to_string);
    let int32 = |key: &str| {
        data.get(key)
            .and_then(FieldValue::as_integer)
            .and_then(|n| i32::try_from(n).ok())
    };
    let int64 = |key: &str| data.get(key).and_then(FieldValue::as_integer);
    let timestamp = |key: &str| data.get(key).and_then(FieldValue::as_timestamp);

    let mut model = event::ActiveModel {
        title: Set(text("title").unwrap_or_default().trim().to_string()),
        description: Set(text("description")),
        event_type: Set(text("event_type").unwrap_or_else(|| "standard".to_string())),
        is_championship: Set(data
            .get("is_championship")
            .and_then(FieldValue::as_boolean)
            .unwrap_or(false)),
        championship_id: Set(int64("championship_id")),
        track_name: Set(text("track_name")),
        track_list_id: Set(int64("track_list_id")),
        vehicle_text: Set(text("vehicle_text")),
        vehicle_list_id: Set(int64("vehicle_list_id")),
        practice_time: Set(int32("practice_time")),
        qualy_time: Set(int32("qualy_time")),
        race_time: Set(int32("race_time")),
        fuel_rate: Set(int32("fuel_rate")),
        tire_wear_rate: Set(int32("tire_wear_rate")),
        damage_multiplier: Set(int32("damage_multiplier")),
        weather: Set(text("weather")),
        assists: Set(text("assists")),
        rules_text: Set(text("rules_text")),
        regulation_link: Set(text("regulation_link")),
        timezone: Set(text("timezone")),
        event_datetime_utc: Set(timestamp("event_datetime_utc")),
        publish_datetime_utc: Set(timestamp("publish_datetime_utc")),
        registration_open_utc: Set(timestamp("registration_open_utc")),
        registration_close_utc: Set(timestamp("registration_close_utc")),
        ..Default::default()
    };

    if let Some(FieldValue::List(reminders)) = data.get("reminders") {
        model.reminders = Set(Some(reminders.join(",")));
    }

    model
}

/// The inverse of [`active_model_from_fields`]: loads a persisted event into
/// a session field map so a draft can re-enter a wizard. The `event_id` entry
/// routes finalize to `update_event` instead of a fresh insert.
#[must_use]
pub fn session_fields_from_event(event: &event::Model) -> BTreeMap<String, FieldValue> {
    let mut data = BTreeMap::new();
    let mut put = |key: &str, value: Option<FieldValue>| {
        if let Some(value) = value {
            data.insert(key.to_string(), value);
        }
    };

    put("event_id", Some(FieldValue::Integer(event.id)));
    put("title", Some(FieldValue::from(event.title.clone())));
    put("description", event.description.clone().map(FieldValue::from));
    put("event_type", Some(FieldValue::from(event.event_type.clone())));
    put("is_championship", Some(FieldValue::from(event.is_championship)));
    put("championship_id", event.championship_id.map(FieldValue::from));
    put("track_name", event.track_name.clone().map(FieldValue::from));
    put("track_list_id", event.track_list_id.map(FieldValue::from));
    put("vehicle_text", event.vehicle_text.clone().map(FieldValue::from));
    put("vehicle_list_id", event.vehicle_list_id.map(FieldValue::from));
    put("practice_time", event.practice_time.map(|n| FieldValue::Integer(n.into())));
    put("qualy_time", event.qualy_time.map(|n| FieldValue::Integer(n.into())));
    put("race_time", event.race_time.map(|n| FieldValue::Integer(n.into())));
    put("fuel_rate", event.fuel_rate.map(|n| FieldValue::Integer(n.into())));
    put("tire_wear_rate", event.tire_wear_rate.map(|n| FieldValue::Integer(n.into())));
    put(
        "damage_multiplier",
        event.damage_multiplier.map(|n| FieldValue::Integer(n.into())),
    );
    put("weather", event.weather.clone().map(FieldValue::from));
    put("assists", event.assists.clone().map(FieldValue::from));
    put("rules_text", event.rules_text.clone().map(FieldValue::from));
    put("regulation_link", event.regulation_link.clone().map(FieldValue::from));
    put("timezone", event.timezone.clone().map(FieldValue::from));
    put("event_datetime_utc", event.event_datetime_utc.map(FieldValue::from));
    put("publish_datetime_utc", event.publish_datetime_utc.map(FieldValue::from));
    put("registration_open_utc", event.registration_open_utc.map(FieldValue::from));
    put("registration_close_utc", event.registration_close_utc.map(FieldValue::from));
    put(
        "reminders",
        event.reminders.as_deref().map(|joined| {
            FieldValue::List(joined.split(',').map(|s| s.trim().to_string()).collect())
        }),
    );

    data
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::plan::{event_creation_plan, scheduler_plan};
    use crate::test_utils::*;

    fn event_coordinator() -> WizardCoordinator {
        WizardCoordinator::new(event_creation_plan().unwrap())
    }

    fn scheduler_coordinator() -> WizardCoordinator {
        WizardCoordinator::new(scheduler_plan().unwrap())
    }

    fn text(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    fn one(key: &str, value: FieldValue) -> BTreeMap<String, FieldValue> {
        let mut map = BTreeMap::new();
        map.insert(key.to_string(), value);
        map
    }

    #[tokio::test]
    async fn test_title_then_advance_reaches_step_two() {
        let wizard = event_coordinator();

        assert_eq!(wizard.start(42, BTreeMap::new()).await, 1);
        wizard
            .handle_step_input(42, one("title", text("Spa GT3 Night")))
            .await;

        let outcome = wizard.navigate(42, NavAction::Next).await;
        assert_eq!(outcome, NavOutcome::Render(2));
        assert_eq!(wizard.store().current_step(42).await, Some(2));
    }

    #[tokio::test]
    async fn test_advance_without_title_is_blocked() {
        let wizard = event_coordinator();
        wizard.start(7, BTreeMap::new()).await;

        let outcome = wizard.navigate(7, NavAction::Next).await;
        assert_eq!(
            outcome,
            NavOutcome::Blocked {
                step: 1,
                missing: vec!["title".to_string()],
            }
        );
        assert_eq!(wizard.store().current_step(7).await, Some(1));
    }

    #[tokio::test]
    async fn test_cancel_flow_destroys_session_once_confirmed() {
        let wizard = event_coordinator();
        wizard.start(9, BTreeMap::new()).await;
        wizard.handle_step_input(9, one("title", text("X"))).await;

        assert_eq!(
            wizard.navigate(9, NavAction::Cancel { confirmed: false }).await,
            NavOutcome::ConfirmCancel
        );
        assert_eq!(
            wizard.navigate(9, NavAction::Cancel { confirmed: true }).await,
            NavOutcome::Cancelled
        );
        assert!(!wizard.store().exists(9).await);
    }

    fn complete_event_fields() -> BTreeMap<String, FieldValue> {
        let mut data = BTreeMap::new();
        data.insert("title".to_string(), text("Spa GT3 Night"));
        data.insert("event_type".to_string(), text("standard"));
        data.insert("track_name".to_string(), text("Spa-Francorchamps"));
        data.insert("vehicle_text".to_string(), text("GT3 class"));
        data.insert("race_time".to_string(), FieldValue::Integer(45));
        data.insert(
            "event_datetime_utc".to_string(),
            FieldValue::from(Utc::now() + Duration::days(7)),
        );
        data
    }

    #[tokio::test]
    async fn test_completed_wizard_finalizes_exactly_once() -> Result<()> {
        let db = setup_test_db().await?;
        let wizard = event_coordinator();

        // Starting over complete data lands on the final review step.
        let entry = wizard.start(11, complete_event_fields()).await;
        assert_eq!(entry, wizard.plan().total_steps());

        assert_eq!(wizard.navigate(11, NavAction::Next).await, NavOutcome::Completed);

        let outcome = wizard
            .finalize(&db, 11, TerminalAction::PublishNow, "user-11", "guild-1")
            .await?;
        let FinalizeOutcome::Saved { event_id, status } = outcome else {
            panic!("expected a saved event, got {outcome:?}");
        };
        assert_eq!(status, EventStatus::Active);

        let all = events::list_events(&db, "guild-1", None, None, None).await?;
        assert_eq!(all.len(), 1);
        let event = &all[0];
        assert_eq!(event.id, event_id);
        assert_eq!(event.created_by, "user-11");
        assert!(event.is_published);
        assert!(event.published_at.is_some());

        // Session gone after a successful handoff.
        assert!(!wizard.store().exists(11).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_finalize_without_session() -> Result<()> {
        let db = setup_test_db().await?;
        let wizard = event_coordinator();

        let outcome = wizard
            .finalize(&db, 1, TerminalAction::SaveDraft, "user-1", "guild-1")
            .await?;
        assert_eq!(outcome, FinalizeOutcome::NoSession);
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_finalize_preserves_session() -> Result<()> {
        let db = setup_test_db().await?;
        events::insert_event(&db, draft_event("guild-1", "Spa GT3 Night"), false).await?;

        let wizard = event_coordinator();
        wizard.start(5, complete_event_fields()).await;

        // The title collides with the stored event, so persistence refuses.
        let result = wizard
            .finalize(&db, 5, TerminalAction::SaveDraft, "user-5", "guild-1")
            .await;
        assert!(result.is_err());

        // Nothing was lost: the user can rename and retry.
        assert!(wizard.store().exists(5).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_scheduler_rejects_bad_data_and_keeps_session() -> Result<()> {
        let db = setup_test_db().await?;
        let wizard = scheduler_coordinator();

        let mut data = BTreeMap::new();
        data.insert("title".to_string(), text("Spa GT3 Night"));
        data.insert(
            "publish_datetime_utc".to_string(),
            FieldValue::from(Utc::now() - Duration::hours(1)),
        );
        wizard.start(6, data).await;

        let outcome = wizard
            .finalize(&db, 6, TerminalAction::Schedule, "user-6", "guild-1")
            .await?;
        let FinalizeOutcome::Rejected(problems) = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(problems.len(), 1);
        assert!(wizard.store().exists(6).await);
        Ok(())
    }

    #[tokio::test]
    async fn test_draft_resume_updates_existing_event() -> Result<()> {
        let db = setup_test_db().await?;
        let draft_id =
            events::insert_event(&db, draft_event("guild-1", "Monza 500"), false).await?;
        let draft = events::get_event(&db, draft_id).await?.unwrap();

        let wizard = scheduler_coordinator();

        // The draft's title is known, so the wizard enters at step 2.
        let entry = wizard.start(8, session_fields_from_event(&draft)).await;
        assert_eq!(entry, 2);

        wizard
            .handle_step_input(
                8,
                one(
                    "publish_datetime_utc",
                    FieldValue::from(Utc::now() + Duration::hours(12)),
                ),
            )
            .await;

        let outcome = wizard
            .finalize(&db, 8, TerminalAction::Schedule, "user-8", "guild-1")
            .await?;
        assert_eq!(
            outcome,
            FinalizeOutcome::Saved {
                event_id: draft_id,
                status: EventStatus::Scheduled,
            }
        );

        let event = events::get_event(&db, draft_id).await?.unwrap();
        assert_eq!(event.status, "scheduled");
        assert!(event.publish_datetime_utc.is_some());
        assert_eq!(event.last_edited_by.as_deref(), Some("user-8"));
        // Creation audit is untouched by the update path.
        assert_eq!(event.created_by, "user-0");

        // Only the one event exists.
        let all = events::list_events(&db, "guild-1", None, None, None).await?;
        assert_eq!(all.len(), 1);
        Ok(())
    }

    #[test]
    fn test_field_round_trip_through_event_model() {
        let mut data = complete_event_fields();
        data.insert(
            "reminders".to_string(),
            FieldValue::List(vec!["180".to_string(), "1440".to_string()]),
        );
        data.insert("fuel_rate".to_string(), FieldValue::Integer(100));

        let model = active_model_from_fields(&data);
        let sea_orm::ActiveValue::Set(ref title) = model.title else {
            panic!("title not set");
        };
        assert_eq!(title, "Spa GT3 Night");
        assert_eq!(model.reminders, Set(Some("180,1440".to_string())));
        assert_eq!(model.fuel_rate, Set(Some(100)));
        assert_eq!(model.race_time, Set(Some(45)));
    }

    #[tokio::test]
    async fn test_session_fields_from_event_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let mut model = draft_event("guild-1", "Imola Enduro");
        model.race_time = Set(Some(60));
        model.reminders = Set(Some("180,1440".to_string()));
        let id = events::insert_event(&db, model, false).await?;
        let event = events::get_event(&db, id).await?.unwrap();

        let data = session_fields_from_event(&event);
        assert_eq!(data.get("event_id"), Some(&FieldValue::Integer(id)));
        assert_eq!(data.get("title"), Some(&text("Imola Enduro")));
        assert_eq!(data.get("race_time"), Some(&FieldValue::Integer(60)));
        assert_eq!(
            data.get("reminders"),
            Some(&FieldValue::List(vec![
                "180".to_string(),
                "1440".to_string()
            ]))
        );
        Ok(())
    }
}
