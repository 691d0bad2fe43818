//! `RaceManager` entry point: logging, environment, database, bot.

use race_manager::bot;
use race_manager::config;
use race_manager::errors::Result;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal: env vars can be set externally.
    dotenvy::dotenv().ok();

    let settings = config::settings::load_default_settings();
    info!(
        idle_minutes = settings.session_idle_minutes,
        sweep_minutes = settings.sweep_interval_minutes,
        "Loaded wizard settings"
    );

    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established"))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database tables ready"))
        .inspect_err(|e| error!("Failed to create tables: {e}"))?;

    // Loaded directly before use, never stored in settings.
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))?;

    bot::run_bot(token, db, settings).await
}
