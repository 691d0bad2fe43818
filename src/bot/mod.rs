//! Bot layer - Discord-specific interface and command handlers.
//!
//! Binds the wizard engine and the event persistence to poise: shared
//! context, command registration, error reporting and the background sweep
//! that evicts abandoned wizard sessions.

/// Discord command implementations
pub mod commands;
/// Interaction handlers (autocomplete, prompt rendering)
pub mod handlers;

use crate::config::settings::WizardSettings;
use crate::core::plan::{event_creation_plan, scheduler_plan};
use crate::core::wizard::WizardCoordinator;
use crate::errors::Error;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands: the database connection and
/// the two wizard coordinators (event creation and scheduler), each with its
/// own session namespace.
pub struct BotData {
    /// Database connection for all persistence operations
    pub database: DatabaseConnection,
    /// Coordinator of the event creation wizard
    pub event_wizard: Arc<WizardCoordinator>,
    /// Coordinator of the publication scheduler wizard
    pub scheduler: Arc<WizardCoordinator>,
}

/// Type alias for the context poise hands to every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            // Startup cannot continue without a working framework.
            panic!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Periodically evicts wizard sessions idle beyond the configured threshold,
/// so abandoned wizards do not grow the session tables forever.
fn spawn_session_sweep(
    event_wizard: Arc<WizardCoordinator>,
    scheduler: Arc<WizardCoordinator>,
    settings: WizardSettings,
) {
    let interval = std::time::Duration::from_secs(settings.sweep_interval_minutes * 60);
    let max_idle = chrono::Duration::minutes(
        i64::try_from(settings.session_idle_minutes).unwrap_or(i64::MAX),
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a restart does not
        // race command registration.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = event_wizard.store().evict_idle(max_idle).await
                + scheduler.store().evict_idle(max_idle).await;
            if evicted > 0 {
                info!(evicted, "session sweep finished");
            }
        }
    });
}

/// Runs the bot until the gateway connection ends.
#[instrument(skip(token, database))]
pub async fn run_bot(
    token: String,
    database: DatabaseConnection,
    settings: WizardSettings,
) -> crate::errors::Result<()> {
    let event_wizard = Arc::new(WizardCoordinator::new(event_creation_plan()?));
    let scheduler = Arc::new(WizardCoordinator::new(scheduler_plan()?));

    spawn_session_sweep(Arc::clone(&event_wizard), Arc::clone(&scheduler), settings);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::general::ping(),
                commands::event_wizard::create_event(),
                commands::event_wizard::event(),
                commands::scheduler::schedule_saved_event(),
                commands::scheduler::schedule(),
                commands::scheduler::set_server_timezone(),
                commands::events::list_events(),
                commands::events::delete_event(),
                commands::events::archive_event(),
                commands::events::restore_event(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered commands globally");
                Ok(BotData {
                    database,
                    event_wizard,
                    scheduler,
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for the poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await?;

    if let Err(why) = client.start().await {
        error!("Client error: {why:?}");
        return Err(why.into());
    }
    Ok(())
}
