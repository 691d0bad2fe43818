//! General utility commands.

use crate::{bot::Context, errors::Result};

/// Checks that the bot is alive.
#[poise::command(slash_command, prefix_command)]
pub async fn ping(ctx: Context<'_>) -> Result<()> {
    ctx.say("🏁 Pong!").await?;
    Ok(())
}
