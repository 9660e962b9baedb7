use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ChannelId, CreateMessage, EditMember, EditMessage, GuildId, Http, MessageId, UserId,
};
use tracing::{debug, error, info};

use crate::bot::error::Error;
use crate::constants::limits::RESTRICTION_DURATION;
use crate::services::transport::Transport;

/// [`Transport`] backed by the Discord REST API
#[derive(Clone)]
pub struct DiscordTransport {
    http: Arc<Http>,
}

impl DiscordTransport {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn http(&self) -> &Http {
        &self.http
    }
}

#[async_trait]
impl Transport for DiscordTransport {
    async fn send_text(
        &self,
        channel_id: ChannelId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, Error> {
        let mut message = CreateMessage::new().content(text);
        if let Some(reply_to) = reply_to {
            message = message.reference_message((channel_id, reply_to));
        }

        let sent = channel_id.send_message(self.http(), message).await?;
        Ok(sent.id)
    }

    async fn send_direct(&self, user_id: UserId, text: &str) -> Result<(), Error> {
        user_id
            .direct_message(self.http(), CreateMessage::new().content(text))
            .await?;
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), Error> {
        channel_id.delete_message(self.http(), message_id).await?;
        debug!("Deleted message {} in channel {}", message_id, channel_id);
        Ok(())
    }

    async fn restrict_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error> {
        let seconds = RESTRICTION_DURATION.as_secs() as i64;
        let restrict_until = chrono::Utc::now() + chrono::Duration::seconds(seconds);
        // Discord expects an ISO 8601 timestamp
        let timestamp_str = restrict_until.to_rfc3339();

        guild_id
            .edit_member(
                self.http(),
                user_id,
                EditMember::new().disable_communication_until(timestamp_str),
            )
            .await
            .map_err(|e| {
                error!("Failed to restrict user {} in guild {}: {:?}", user_id, guild_id, e);
                Error::Serenity(e)
            })?;

        info!("Restricted user {} in guild {}", user_id, guild_id);
        Ok(())
    }

    async fn ban_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error> {
        guild_id.ban(self.http(), user_id, 0).await?;
        info!("Banned user {} from guild {}", user_id, guild_id);
        Ok(())
    }

    async fn unban_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error> {
        // The member may not be in the guild (banned) or may have no timeout
        if let Err(e) = guild_id
            .edit_member(self.http(), user_id, EditMember::new().enable_communication())
            .await
        {
            debug!("Could not lift restriction for user {}: {:?}", user_id, e);
        }

        match guild_id.unban(self.http(), user_id).await {
            Ok(()) => {}
            // Restricted-only users have no guild ban to remove
            Err(e) if e.to_string().contains("Unknown Ban") => {
                debug!("User {} had no guild ban in {}", user_id, guild_id);
            }
            Err(e) => return Err(Error::Serenity(e)),
        }

        info!("Unbanned user {} in guild {}", user_id, guild_id);
        Ok(())
    }

    async fn edit_message_text(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), Error> {
        channel_id
            .edit_message(self.http(), message_id, EditMessage::new().content(text))
            .await?;
        Ok(())
    }
}
