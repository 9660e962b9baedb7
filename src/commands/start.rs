use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::components::admin_panel;
use crate::constants::messages::{GREETING, INFO_TEXT};

/// Open the admin panel, or get a greeting
#[poise::command(slash_command)]
pub async fn start(ctx: Context<'_>) -> Result<(), Error> {
    if ctx.data().is_admin(ctx.author().id.get()) {
        ctx.send(admin_panel::panel_reply()).await?;
    } else {
        ctx.say(GREETING).await?;
    }
    Ok(())
}

/// How the bot moderates
#[poise::command(slash_command)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(INFO_TEXT).await?;
    Ok(())
}
