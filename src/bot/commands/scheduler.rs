//! Scheduler wizard commands.
//!
//! `/schedule_saved_event` resumes a saved draft - the wizard enters at the
//! first step whose data the draft does not already carry. The `/schedule`
//! subcommands capture the publication plan and queue the event.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::utils, handlers::autocomplete, handlers::prompts},
        core::{
            events,
            field::FieldValue,
            navigation::NavAction,
            schedule, servers, timezones,
            wizard::{FinalizeOutcome, TerminalAction, session_fields_from_event},
        },
        errors::Result,
    };
    use chrono::Utc;
    use std::collections::BTreeMap;

    /// Resumes scheduling for a saved draft event.
    #[poise::command(slash_command, guild_only)]
    pub async fn schedule_saved_event(
        ctx: Context<'_>,
        #[description = "Title of the saved draft"]
        #[autocomplete = "autocomplete::autocomplete_draft_title"]
        title: String,
    ) -> Result<()> {
        let data = ctx.data();
        let guild_id = ctx.guild_id().map(|g| g.to_string()).unwrap_or_default();

        let Some(event) = events::find_by_title(&data.database, &guild_id, &title).await? else {
            ctx.say(format!("⚠️ No saved event named **{title}** in this server."))
                .await?;
            return Ok(());
        };
        if event.status != events::EventStatus::Draft.as_str() {
            ctx.say(format!(
                "⚠️ **{}** is not a draft (status: {}).",
                event.title, event.status
            ))
            .await?;
            return Ok(());
        }

        let mut initial = session_fields_from_event(&event);
        // Drafts without a timezone inherit the guild default, if one is set.
        if !initial.contains_key("timezone") {
            if let Some(tz) = servers::get_timezone(&data.database, &guild_id).await? {
                initial.insert("timezone".to_string(), FieldValue::Text(tz));
            }
        }

        let user_id = ctx.author().id.get();
        let entry = data.scheduler.start(user_id, initial).await;

        ctx.say(format!(
            "🗓️ **Scheduling “{}”.** Already-known details are skipped.\n{}",
            event.title,
            prompts::step_prompt(data.scheduler.plan(), entry)
        ))
        .await?;
        Ok(())
    }

    /// Sets this server's default timezone for scheduled events.
    #[poise::command(slash_command, guild_only)]
    pub async fn set_server_timezone(
        ctx: Context<'_>,
        #[description = "IANA timezone name"]
        #[autocomplete = "autocomplete::autocomplete_timezone"]
        timezone: String,
    ) -> Result<()> {
        let guild_id = ctx.guild_id().map(|g| g.to_string()).unwrap_or_default();

        if !timezones::is_valid_zone(&timezone) {
            ctx.say(format!("⚠️ Unknown timezone: {timezone}")).await?;
            return Ok(());
        }

        servers::set_timezone(&ctx.data().database, &guild_id, &timezone).await?;
        ctx.say(format!("🌍 Server default timezone set to **{timezone}**."))
            .await?;
        Ok(())
    }

    /// Scheduler wizard step and navigation commands.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands("name", "publish", "registration", "reminders", "confirm", "next", "back", "cancel")
    )]
    pub async fn schedule(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Captures fields, advances and renders the outcome.
    async fn capture_and_advance(
        ctx: Context<'_>,
        confirmation: String,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<()> {
        let scheduler = &ctx.data().scheduler;
        let user_id = ctx.author().id.get();

        scheduler.handle_step_input(user_id, fields).await;
        let outcome = scheduler.navigate(user_id, NavAction::Next).await;
        ctx.say(format!(
            "{confirmation}\n{}",
            prompts::render_outcome(scheduler.plan(), &outcome)
        ))
        .await?;
        Ok(())
    }

    /// Confirms or changes the event name (step 1).
    #[poise::command(slash_command)]
    pub async fn name(
        ctx: Context<'_>,
        #[description = "Event title, unique within this server"] title: String,
    ) -> Result<()> {
        let data = ctx.data();
        let guild_id = ctx.guild_id().map(|g| g.to_string()).unwrap_or_default();
        let user_id = ctx.author().id.get();
        let title = title.trim().to_string();

        // Keeping the draft's own title is always allowed; a new title must
        // be unique so the duplicate surfaces here, not at the final insert.
        let current = data.scheduler.store().get(user_id).await.and_then(|session| {
            session
                .get("title")
                .and_then(FieldValue::as_text)
                .map(str::to_lowercase)
        });
        if current.as_deref() != Some(title.to_lowercase().as_str()) {
            let problems = schedule::validate_title(&data.database, &guild_id, &title).await?;
            if !problems.is_empty() {
                ctx.say(format!("⚠️ {}", problems.join("\n"))).await?;
                return Ok(());
            }
        }

        capture_and_advance(
            ctx,
            format!("✅ Event name: **{title}**"),
            BTreeMap::from([("title".to_string(), FieldValue::Text(title.clone()))]),
        )
        .await
    }

    #[derive(poise::ChoiceParameter)]
    pub enum PublishModeChoice {
        #[name = "now"]
        Now,
        #[name = "at"]
        At,
    }

    /// Sets when the event is published (step 2).
    #[poise::command(slash_command)]
    pub async fn publish(
        ctx: Context<'_>,
        #[description = "Publish immediately, or at a set time"] mode: PublishModeChoice,
        #[description = "Publication time, `YYYY-MM-DD HH:MM` UTC (for `at`)"] date: Option<String>,
    ) -> Result<()> {
        let (publish_dt, publish_mode, confirmation) = match mode {
            PublishModeChoice::Now => (
                Utc::now(),
                "instant",
                "✅ The event will be published **immediately** once the wizard is confirmed."
                    .to_string(),
            ),
            PublishModeChoice::At => {
                let Some(date) = date else {
                    ctx.say("⚠️ Provide a `date` when choosing scheduled publication.")
                        .await?;
                    return Ok(());
                };
                let parsed = match utils::parse_datetime_utc("publish_datetime_utc", &date) {
                    Ok(parsed) => parsed,
                    Err(error) => {
                        ctx.say(format!("⚠️ {error}")).await?;
                        return Ok(());
                    }
                };
                let problems = schedule::validate_datetimes(parsed, None);
                if !problems.is_empty() {
                    ctx.say(format!("⚠️ {}", problems.join("\n"))).await?;
                    return Ok(());
                }
                (
                    parsed,
                    "scheduled",
                    format!("✅ Publication set for **{}**.", parsed.format("%Y-%m-%d %H:%M UTC")),
                )
            }
        };

        capture_and_advance(
            ctx,
            confirmation,
            BTreeMap::from([
                (
                    "publish_datetime_utc".to_string(),
                    FieldValue::from(publish_dt),
                ),
                ("publish_mode".to_string(), FieldValue::from(publish_mode)),
            ]),
        )
        .await
    }

    /// Sets the registration window (step 3, optional).
    #[poise::command(slash_command)]
    pub async fn registration(
        ctx: Context<'_>,
        #[description = "Open registration immediately"] open_now: Option<bool>,
        #[description = "Registration opens, `YYYY-MM-DD HH:MM` UTC"] opens: Option<String>,
        #[description = "Registration closes, `YYYY-MM-DD HH:MM` UTC"] closes: Option<String>,
    ) -> Result<()> {
        let mut fields = BTreeMap::new();

        if open_now.unwrap_or(false) {
            fields.insert(
                "registration_open_utc".to_string(),
                FieldValue::from(Utc::now()),
            );
        } else if let Some(opens) = opens {
            match utils::parse_datetime_utc("registration_open_utc", &opens) {
                Ok(parsed) => {
                    fields.insert("registration_open_utc".to_string(), FieldValue::from(parsed));
                }
                Err(error) => {
                    ctx.say(format!("⚠️ {error}")).await?;
                    return Ok(());
                }
            }
        }
        if let Some(closes) = closes {
            match utils::parse_datetime_utc("registration_close_utc", &closes) {
                Ok(parsed) => {
                    fields.insert("registration_close_utc".to_string(), FieldValue::from(parsed));
                }
                Err(error) => {
                    ctx.say(format!("⚠️ {error}")).await?;
                    return Ok(());
                }
            }
        }

        let confirmation = if fields.is_empty() {
            "✅ Registration left unconfigured.".to_string()
        } else {
            "✅ Registration window saved.".to_string()
        };
        capture_and_advance(ctx, confirmation, fields).await
    }

    /// Picks reminder lead times (step 4, optional).
    #[poise::command(slash_command)]
    pub async fn reminders(
        ctx: Context<'_>,
        #[description = "Lead times in minutes, comma-separated (e.g. 2880,1440,180)"]
        minutes: String,
    ) -> Result<()> {
        let parsed = match utils::parse_reminder_list(&minutes) {
            Ok(parsed) => parsed,
            Err(error) => {
                ctx.say(format!("⚠️ {error}")).await?;
                return Ok(());
            }
        };
        let problems = schedule::validate_reminders(&parsed);
        if !problems.is_empty() {
            ctx.say(format!("⚠️ {}", problems.join("\n"))).await?;
            return Ok(());
        }

        let list: Vec<String> = parsed.iter().map(ToString::to_string).collect();
        capture_and_advance(
            ctx,
            format!("✅ Reminders: {} before the event.", list.join(", ")),
            BTreeMap::from([("reminders".to_string(), FieldValue::List(list.clone()))]),
        )
        .await
    }

    /// Confirms the schedule and queues the event (final step).
    #[poise::command(slash_command)]
    pub async fn confirm(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let guild_id = ctx.guild_id().map(|g| g.to_string()).unwrap_or_default();
        let actor = ctx.author().id.to_string();

        let result = data
            .scheduler
            .finalize(
                &data.database,
                ctx.author().id.get(),
                TerminalAction::Schedule,
                &actor,
                &guild_id,
            )
            .await;

        let reply = match result {
            Ok(FinalizeOutcome::Saved { event_id, .. }) => format!(
                "🗓️ **Event scheduled.** (id `{event_id}`) It will be published automatically."
            ),
            Ok(FinalizeOutcome::NoSession) => {
                "⚠️ You have no active scheduler wizard. Start one with `/schedule_saved_event`."
                    .to_string()
            }
            Ok(FinalizeOutcome::Rejected(problems)) => format!(
                "⚠️ The schedule cannot be saved yet:\n{}",
                problems.join("\n")
            ),
            Err(error) => format!(
                "❌ Could not save the schedule: {error}\nYour progress is kept — fix the problem and try again."
            ),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Advances to the next step.
    #[poise::command(slash_command)]
    pub async fn next(ctx: Context<'_>) -> Result<()> {
        let scheduler = &ctx.data().scheduler;
        let outcome = scheduler
            .navigate(ctx.author().id.get(), NavAction::Next)
            .await;
        ctx.say(prompts::render_outcome(scheduler.plan(), &outcome))
            .await?;
        Ok(())
    }

    /// Goes back one step.
    #[poise::command(slash_command)]
    pub async fn back(ctx: Context<'_>) -> Result<()> {
        let scheduler = &ctx.data().scheduler;
        let outcome = scheduler
            .navigate(ctx.author().id.get(), NavAction::Previous)
            .await;
        ctx.say(prompts::render_outcome(scheduler.plan(), &outcome))
            .await?;
        Ok(())
    }

    /// Cancels the scheduler wizard. Destroys your progress only when confirmed.
    #[poise::command(slash_command)]
    pub async fn cancel(
        ctx: Context<'_>,
        #[description = "Set to True to confirm throwing away your progress"] confirm: Option<bool>,
    ) -> Result<()> {
        let scheduler = &ctx.data().scheduler;
        let outcome = scheduler
            .navigate(
                ctx.author().id.get(),
                NavAction::Cancel {
                    confirmed: confirm.unwrap_or(false),
                },
            )
            .await;
        ctx.say(prompts::render_outcome(scheduler.plan(), &outcome))
            .await?;
        Ok(())
    }
}

pub use inner::*;
