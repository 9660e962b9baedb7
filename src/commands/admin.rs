use poise::serenity_prelude::User;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::commands::is_admin;
use crate::constants::embeds;
use crate::constants::messages::{
    BAN_PROMPT, NO_LOGS, NO_PENDING_SESSION, SESSION_CANCELLED, UNBAN_PROMPT,
};
use crate::services::moderation::admin_actions::{AdminEvent, AdminState};
use crate::services::moderation::log_formatter::format_logs;

/// Show every logged violator
#[poise::command(slash_command, check = "is_admin")]
pub async fn logs(ctx: Context<'_>) -> Result<(), Error> {
    let store = &ctx.data().store;
    let text = format_logs(&store.get_logs().await, store.default_max_warnings())
        .unwrap_or_else(|| NO_LOGS.to_string());

    ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
        .await?;
    Ok(())
}

/// Ban a logged user; send their @username or ID next
#[poise::command(slash_command, guild_only, check = "is_admin")]
pub async fn ban(ctx: Context<'_>) -> Result<(), Error> {
    open_session(ctx, AdminEvent::BanRequested, BAN_PROMPT).await
}

/// Unban a logged user; send their @username or ID next
#[poise::command(slash_command, guild_only, check = "is_admin")]
pub async fn unban(ctx: Context<'_>) -> Result<(), Error> {
    open_session(ctx, AdminEvent::UnbanRequested, UNBAN_PROMPT).await
}

/// Drop a pending ban or unban
#[poise::command(slash_command, check = "is_admin")]
pub async fn cancel(ctx: Context<'_>) -> Result<(), Error> {
    let sessions = &ctx.data().admin_sessions;
    let (channel_id, admin_id) = (ctx.channel_id(), ctx.author().id);

    let reply = if sessions.state(channel_id, admin_id) == AdminState::Idle {
        NO_PENDING_SESSION
    } else {
        sessions.apply(channel_id, admin_id, AdminEvent::Cancelled);
        SESSION_CANCELLED
    };

    ctx.send(poise::CreateReply::default().content(reply).ephemeral(true))
        .await?;
    Ok(())
}

/// Reset a user's warning count to zero
#[poise::command(slash_command, check = "is_admin")]
pub async fn resetwarnings(
    ctx: Context<'_>,
    #[description = "User whose warnings to reset"] user: User,
) -> Result<(), Error> {
    let reset = ctx.data().store.reset_count(user.id.get()).await?;

    let embed = if reset {
        embeds::success_embed()
            .title("Warnings Reset")
            .description(format!("<@{}> is back to zero warnings.", user.id))
    } else {
        embeds::error_embed()
            .title("No Record")
            .description(format!("<@{}> has no logged violations.", user.id))
    };

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}

async fn open_session(ctx: Context<'_>, event: AdminEvent, prompt: &str) -> Result<(), Error> {
    ctx.data()
        .admin_sessions
        .apply(ctx.channel_id(), ctx.author().id, event);

    let embed = embeds::warning_embed()
        .title("Waiting for Target")
        .description(format!("{}\nUse /cancel to abort.", prompt));

    ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
        .await?;
    Ok(())
}
