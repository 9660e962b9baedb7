use std::sync::Arc;

use serenity::all::{
    ButtonStyle, ChannelId, ComponentInteraction, Context, CreateActionRow, CreateButton,
    CreateInteractionResponse, CreateInteractionResponseMessage, MessageId, UserId,
};
use tracing::debug;

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::constants::messages::{ADMIN_PANEL_MENU, LOGS_BUTTON, NOT_ADMIN, NO_LOGS};
use crate::services::moderation::log_formatter::format_logs;
use crate::services::transport::{DiscordTransport, Transport};

pub const LOGS_BUTTON_ID: &str = "panel_logs";

/// What a panel button press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelOutcome {
    NotAdmin,
    UnknownButton,
    ShowedLogs,
}

/// The /start reply admins get
pub fn panel_reply() -> poise::CreateReply {
    let buttons = CreateActionRow::Buttons(vec![CreateButton::new(LOGS_BUTTON_ID)
        .label(LOGS_BUTTON)
        .style(ButtonStyle::Primary)]);

    poise::CreateReply::default()
        .content(ADMIN_PANEL_MENU)
        .components(vec![buttons])
}

/// Handle a panel button press: replace the panel text with the logs
pub async fn handle_button(
    ctx: &Context,
    data: &Arc<Data>,
    component: &ComponentInteraction,
) -> Result<(), Error> {
    let transport = DiscordTransport::new(ctx.http.clone());
    let outcome = press_button(
        &transport,
        data,
        component.user.id,
        &component.data.custom_id,
        component.channel_id,
        component.message.id,
    )
    .await?;

    let response = match outcome {
        PanelOutcome::NotAdmin => CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(NOT_ADMIN)
                .ephemeral(true),
        ),
        PanelOutcome::UnknownButton | PanelOutcome::ShowedLogs => {
            CreateInteractionResponse::Acknowledge
        }
    };
    component.create_response(ctx, response).await?;

    Ok(())
}

/// Act on a button press on the panel message `message_id`
pub async fn press_button<T: Transport + ?Sized>(
    transport: &T,
    data: &Data,
    user_id: UserId,
    custom_id: &str,
    channel_id: ChannelId,
    message_id: MessageId,
) -> Result<PanelOutcome, Error> {
    if !data.is_admin(user_id.get()) {
        return Ok(PanelOutcome::NotAdmin);
    }

    if custom_id != LOGS_BUTTON_ID {
        debug!("Unknown panel button: {}", custom_id);
        return Ok(PanelOutcome::UnknownButton);
    }

    let text = format_logs(&data.store.get_logs().await, data.store.default_max_warnings())
        .unwrap_or_else(|| NO_LOGS.to_string());

    transport
        .edit_message_text(channel_id, message_id, &text)
        .await?;

    Ok(PanelOutcome::ShowedLogs)
}
