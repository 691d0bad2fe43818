//! Event creation wizard commands.
//!
//! `/create_event` opens a wizard session; the `/event` subcommands capture
//! each step's fields, drive navigation and run the finalize actions. All of
//! the flow logic lives in `core::wizard` - these handlers parse input,
//! forward it and render the outcome.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::utils, handlers::prompts},
        core::{
            field::FieldValue,
            navigation::{NavAction, NavOutcome},
            schedule,
            wizard::{FinalizeOutcome, TerminalAction},
        },
        errors::Result,
    };
    use std::collections::BTreeMap;

    fn field_map<I>(fields: I) -> BTreeMap<String, FieldValue>
    where
        I: IntoIterator<Item = (&'static str, FieldValue)>,
    {
        fields
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    /// Captures a step's fields, then tries to advance and renders the result.
    async fn capture_and_advance(
        ctx: Context<'_>,
        confirmation: String,
        fields: BTreeMap<String, FieldValue>,
    ) -> Result<()> {
        let wizard = &ctx.data().event_wizard;
        let user_id = ctx.author().id.get();

        wizard.handle_step_input(user_id, fields).await;
        let outcome = wizard.navigate(user_id, NavAction::Next).await;

        let mut reply = format!("{confirmation}\n{}", prompts::render_outcome(wizard.plan(), &outcome));
        if let NavOutcome::Render(step) = outcome {
            if step == wizard.plan().total_steps() {
                if let Some(data) = wizard.store().get(user_id).await {
                    reply.push('\n');
                    reply.push_str(&prompts::event_summary(&data));
                }
            }
        }
        ctx.say(reply).await?;
        Ok(())
    }

    /// Starts the interactive event creation wizard.
    #[poise::command(slash_command, guild_only)]
    pub async fn create_event(ctx: Context<'_>) -> Result<()> {
        let wizard = &ctx.data().event_wizard;
        let entry = wizard.start(ctx.author().id.get(), BTreeMap::new()).await;

        ctx.say(format!(
            "🚀 **Event creation wizard started.**\n{}",
            prompts::step_prompt(wizard.plan(), entry)
        ))
        .await?;
        Ok(())
    }

    /// Event wizard step and navigation commands.
    #[poise::command(
        slash_command,
        guild_only,
        subcommands(
            "title", "kind", "track", "vehicles", "settings", "rules", "next", "back", "cancel",
            "publish", "draft", "schedule", "archive"
        )
    )]
    pub async fn event(_ctx: Context<'_>) -> Result<()> {
        Ok(())
    }

    /// Sets the event title (step 1).
    #[poise::command(slash_command)]
    pub async fn title(
        ctx: Context<'_>,
        #[description = "Event title, unique within this server"] title: String,
    ) -> Result<()> {
        let guild_id = ctx.guild_id().map(|g| g.to_string()).unwrap_or_default();
        let title = title.trim().to_string();

        let problems = schedule::validate_title(&ctx.data().database, &guild_id, &title).await?;
        if !problems.is_empty() {
            ctx.say(format!("⚠️ {}", problems.join("\n"))).await?;
            return Ok(());
        }

        capture_and_advance(
            ctx,
            format!("✅ Title set: **{title}**"),
            field_map([("title", FieldValue::Text(title.clone()))]),
        )
        .await
    }

    #[derive(poise::ChoiceParameter)]
    pub enum EventKindChoice {
        #[name = "standard"]
        Standard,
        #[name = "league"]
        League,
        #[name = "tournament"]
        Tournament,
        #[name = "championship"]
        Championship,
    }

    impl EventKindChoice {
        const fn as_str(&self) -> &'static str {
            match self {
                Self::Standard => "standard",
                Self::League => "league",
                Self::Tournament => "tournament",
                Self::Championship => "championship",
            }
        }
    }

    /// Picks the event type (step 2).
    #[poise::command(slash_command)]
    pub async fn kind(
        ctx: Context<'_>,
        #[description = "Type of event"] kind: EventKindChoice,
    ) -> Result<()> {
        let event_type = kind.as_str();
        let is_championship = matches!(kind, EventKindChoice::Championship);

        capture_and_advance(
            ctx,
            format!("✅ Event type: **{event_type}**"),
            field_map([
                ("event_type", FieldValue::from(event_type)),
                ("is_championship", FieldValue::Boolean(is_championship)),
            ]),
        )
        .await
    }

    /// Chooses the track (step 3) - free text or a saved track list.
    #[poise::command(slash_command)]
    pub async fn track(
        ctx: Context<'_>,
        #[description = "Track name"] name: Option<String>,
        #[description = "Saved track list id"] list_id: Option<i64>,
    ) -> Result<()> {
        let mut fields = BTreeMap::new();
        if let Some(name) = &name {
            fields.insert("track_name".to_string(), FieldValue::from(name.trim()));
        }
        if let Some(list_id) = list_id {
            fields.insert("track_list_id".to_string(), FieldValue::Integer(list_id));
        }
        if fields.is_empty() {
            ctx.say("⚠️ Provide a track name or a saved track list id.").await?;
            return Ok(());
        }

        let confirmation = match name {
            Some(name) => format!("✅ Track: **{}**", name.trim()),
            None => "✅ Track list selected.".to_string(),
        };
        capture_and_advance(ctx, confirmation, fields).await
    }

    /// Chooses the vehicles (step 4) - free text or a saved vehicle list.
    #[poise::command(slash_command)]
    pub async fn vehicles(
        ctx: Context<'_>,
        #[description = "Vehicle description (e.g. GT3 class)"] text: Option<String>,
        #[description = "Saved vehicle list id"] list_id: Option<i64>,
    ) -> Result<()> {
        let mut fields = BTreeMap::new();
        if let Some(text) = &text {
            fields.insert("vehicle_text".to_string(), FieldValue::from(text.trim()));
        }
        if let Some(list_id) = list_id {
            fields.insert("vehicle_list_id".to_string(), FieldValue::Integer(list_id));
        }
        if fields.is_empty() {
            ctx.say("⚠️ Provide a vehicle description or a saved vehicle list id.")
                .await?;
            return Ok(());
        }

        capture_and_advance(ctx, "✅ Vehicles set.".to_string(), fields).await
    }

    /// Configures the technical settings (step 5).
    #[poise::command(slash_command)]
    #[allow(clippy::too_many_arguments)] // One parameter per modal field
    pub async fn settings(
        ctx: Context<'_>,
        #[description = "Race length in minutes"] race_time: i32,
        #[description = "Race start, `YYYY-MM-DD HH:MM` UTC"] event_date: String,
        #[description = "Timezone for local-time displays"]
        #[autocomplete = "crate::bot::handlers::autocomplete::autocomplete_timezone"]
        timezone: Option<String>,
        #[description = "Practice length in minutes"] practice_time: Option<i32>,
        #[description = "Qualifying length in minutes"] qualy_time: Option<i32>,
        #[description = "Fuel consumption rate in percent"] fuel_rate: Option<i32>,
        #[description = "Tire wear rate in percent"] tire_wear_rate: Option<i32>,
        #[description = "Damage multiplier in percent"] damage_multiplier: Option<i32>,
        #[description = "Weather (clear, rain, overcast...)"] weather: Option<String>,
        #[description = "Active assists (ABS, TC...)"] assists: Option<String>,
    ) -> Result<()> {
        let event_datetime = match utils::parse_datetime_utc("event_date", &event_date) {
            Ok(parsed) => parsed,
            Err(error) => {
                ctx.say(format!("⚠️ {error}")).await?;
                return Ok(());
            }
        };

        if let Some(tz) = &timezone {
            let problems = schedule::validate_timezone(tz);
            if !problems.is_empty() {
                ctx.say(format!("⚠️ {}", problems.join("\n"))).await?;
                return Ok(());
            }
        }

        let mut fields = field_map([
            ("race_time", FieldValue::Integer(race_time.into())),
            ("event_datetime_utc", FieldValue::from(event_datetime)),
        ]);
        let mut put_int = |key: &str, value: Option<i32>| {
            if let Some(value) = value {
                fields.insert(key.to_string(), FieldValue::Integer(value.into()));
            }
        };
        put_int("practice_time", practice_time);
        put_int("qualy_time", qualy_time);
        put_int("fuel_rate", fuel_rate);
        put_int("tire_wear_rate", tire_wear_rate);
        put_int("damage_multiplier", damage_multiplier);
        if let Some(tz) = timezone {
            fields.insert("timezone".to_string(), FieldValue::Text(tz));
        }
        if let Some(weather) = weather {
            fields.insert("weather".to_string(), FieldValue::Text(weather));
        }
        if let Some(assists) = assists {
            fields.insert("assists".to_string(), FieldValue::Text(assists));
        }

        capture_and_advance(ctx, "✅ Technical settings saved.".to_string(), fields).await
    }

    /// Adds rules and a regulation link (step 6).
    #[poise::command(slash_command)]
    pub async fn rules(
        ctx: Context<'_>,
        #[description = "Rules, separated by semicolons"] rules: Option<String>,
        #[description = "Link to an external regulation document"] regulation_link: Option<String>,
    ) -> Result<()> {
        let mut fields = BTreeMap::new();
        if let Some(rules) = rules {
            let formatted: Vec<String> = rules
                .split(';')
                .map(str::trim)
                .filter(|rule| !rule.is_empty())
                .map(|rule| format!("• {rule}"))
                .collect();
            fields.insert(
                "rules_text".to_string(),
                FieldValue::Text(formatted.join("\n")),
            );
        }
        if let Some(link) = regulation_link {
            fields.insert("regulation_link".to_string(), FieldValue::Text(link));
        }

        capture_and_advance(ctx, "✅ Rules saved.".to_string(), fields).await
    }

    /// Advances to the next step.
    #[poise::command(slash_command)]
    pub async fn next(ctx: Context<'_>) -> Result<()> {
        let wizard = &ctx.data().event_wizard;
        let user_id = ctx.author().id.get();

        let outcome = wizard.navigate(user_id, NavAction::Next).await;
        let mut reply = prompts::render_outcome(wizard.plan(), &outcome);
        if let NavOutcome::Render(step) = outcome {
            if step == wizard.plan().total_steps() {
                if let Some(data) = wizard.store().get(user_id).await {
                    reply.push('\n');
                    reply.push_str(&prompts::event_summary(&data));
                }
            }
        }
        ctx.say(reply).await?;
        Ok(())
    }

    /// Goes back one step.
    #[poise::command(slash_command)]
    pub async fn back(ctx: Context<'_>) -> Result<()> {
        let wizard = &ctx.data().event_wizard;
        let outcome = wizard
            .navigate(ctx.author().id.get(), NavAction::Previous)
            .await;
        ctx.say(prompts::render_outcome(wizard.plan(), &outcome)).await?;
        Ok(())
    }

    /// Cancels the wizard. Destroys your progress only when confirmed.
    #[poise::command(slash_command)]
    pub async fn cancel(
        ctx: Context<'_>,
        #[description = "Set to True to confirm throwing away your progress"] confirm: Option<bool>,
    ) -> Result<()> {
        let wizard = &ctx.data().event_wizard;
        let outcome = wizard
            .navigate(
                ctx.author().id.get(),
                NavAction::Cancel {
                    confirmed: confirm.unwrap_or(false),
                },
            )
            .await;
        ctx.say(prompts::render_outcome(wizard.plan(), &outcome)).await?;
        Ok(())
    }

    async fn run_finalize(ctx: Context<'_>, action: TerminalAction) -> Result<()> {
        let data = ctx.data();
        let wizard = &data.event_wizard;
        let guild_id = ctx.guild_id().map(|g| g.to_string()).unwrap_or_default();
        let actor = ctx.author().id.to_string();

        let result = wizard
            .finalize(&data.database, ctx.author().id.get(), action, &actor, &guild_id)
            .await;

        let reply = match result {
            Ok(FinalizeOutcome::Saved { event_id, status }) => match action {
                TerminalAction::PublishNow => {
                    format!("🟢 **Event published.** (id `{event_id}`) 🎉")
                }
                TerminalAction::SaveDraft => format!(
                    "💾 **Event saved as draft.** (id `{event_id}`) Resume scheduling any time with `/schedule_saved_event`."
                ),
                TerminalAction::Archive => {
                    format!("🗂️ **Event archived.** (id `{event_id}`, expires in 30 days)")
                }
                TerminalAction::Schedule => format!("🗓️ **Event scheduled.** (id `{event_id}`, status {status})"),
            },
            Ok(FinalizeOutcome::NoSession) => {
                "⚠️ You have no active event wizard. Start one with `/create_event`.".to_string()
            }
            Ok(FinalizeOutcome::Rejected(problems)) => {
                format!("⚠️ The event cannot be saved yet:\n{}", problems.join("\n"))
            }
            Err(error) => format!(
                "❌ Could not save the event: {error}\nYour progress is kept — fix the problem and try again."
            ),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Publishes the event immediately (final step).
    #[poise::command(slash_command)]
    pub async fn publish(ctx: Context<'_>) -> Result<()> {
        run_finalize(ctx, TerminalAction::PublishNow).await
    }

    /// Saves the event as a draft (final step).
    #[poise::command(slash_command)]
    pub async fn draft(ctx: Context<'_>) -> Result<()> {
        run_finalize(ctx, TerminalAction::SaveDraft).await
    }

    /// Archives the event without publishing it (final step).
    #[poise::command(slash_command)]
    pub async fn archive(ctx: Context<'_>) -> Result<()> {
        run_finalize(ctx, TerminalAction::Archive).await
    }

    /// Hands the event over to the scheduler wizard (final step).
    #[poise::command(slash_command)]
    pub async fn schedule(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.get();

        let Some(event_data) = data.event_wizard.store().get(user_id).await else {
            ctx.say("⚠️ You have no active event wizard to schedule.").await?;
            return Ok(());
        };

        let entry = data.scheduler.start(user_id, event_data).await;
        ctx.say(format!(
            "🗓️ **Scheduler wizard started for the current event.**\n{}",
            prompts::step_prompt(data.scheduler.plan(), entry)
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
