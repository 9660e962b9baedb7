pub mod discord;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, MessageId, UserId};

use crate::bot::error::Error;

pub use discord::DiscordTransport;

/// Chat operations the moderation core needs from the platform
#[async_trait]
pub trait Transport: Send + Sync {
    /// Post a message, optionally as a reply. Returns the new message's ID.
    async fn send_text(
        &self,
        channel_id: ChannelId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, Error>;

    /// Send a private message to a user
    async fn send_direct(&self, user_id: UserId, text: &str) -> Result<(), Error>;

    async fn delete_message(&self, channel_id: ChannelId, message_id: MessageId)
        -> Result<(), Error>;

    /// Stop a member from sending messages
    async fn restrict_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error>;

    async fn ban_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error>;

    /// Lift a ban and any restriction
    async fn unban_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error>;

    async fn edit_message_text(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), Error>;
}
