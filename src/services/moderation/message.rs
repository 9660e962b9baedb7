use serenity::all::{ChannelId, GuildId, Message, MessageId, UserId};

use crate::db::models::UNKNOWN_USERNAME;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatKind {
    /// Direct message with the bot
    Private,
    /// Guild text channel
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sender {
    User { id: UserId, username: String },
    /// Posted on behalf of a channel (webhook or announcement crosspost)
    Channel { id: u64 },
}

/// A chat message stripped down to what moderation looks at
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat: ChatKind,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub sender: Sender,
    pub text: String,
}

impl IncomingMessage {
    /// Convert a Discord message. Returns `None` for messages moderation never
    /// looks at: bot authors and messages without text.
    pub fn from_discord(msg: &Message) -> Option<Self> {
        let sender = match msg.webhook_id {
            Some(webhook_id) => Sender::Channel {
                // Crossposts from a followed announcement channel reference their source
                id: msg
                    .message_reference
                    .as_ref()
                    .map(|r| r.channel_id.get())
                    .unwrap_or_else(|| webhook_id.get()),
            },
            None if msg.author.bot => return None,
            None => Sender::User {
                id: msg.author.id,
                username: if msg.author.name.is_empty() {
                    UNKNOWN_USERNAME.to_string()
                } else {
                    msg.author.name.clone()
                },
            },
        };

        let is_user = matches!(sender, Sender::User { .. });
        if is_user && msg.content.trim().is_empty() {
            return None;
        }

        Some(Self {
            chat: if msg.guild_id.is_some() {
                ChatKind::Group
            } else {
                ChatKind::Private
            },
            guild_id: msg.guild_id,
            channel_id: msg.channel_id,
            message_id: msg.id,
            sender,
            text: msg.content.clone(),
        })
    }

    pub fn user_id(&self) -> Option<UserId> {
        match &self.sender {
            Sender::User { id, .. } => Some(*id),
            Sender::Channel { .. } => None,
        }
    }
}

#[cfg(test)]
impl IncomingMessage {
    pub fn group(user_id: u64, username: &str, text: &str) -> Self {
        Self {
            chat: ChatKind::Group,
            guild_id: Some(GuildId::new(77)),
            channel_id: ChannelId::new(10),
            message_id: MessageId::new(300),
            sender: Sender::User {
                id: UserId::new(user_id),
                username: username.to_string(),
            },
            text: text.to_string(),
        }
    }

    pub fn private(user_id: u64, username: &str, text: &str) -> Self {
        Self {
            chat: ChatKind::Private,
            guild_id: None,
            ..Self::group(user_id, username, text)
        }
    }

    pub fn from_channel(channel: u64, text: &str) -> Self {
        Self {
            sender: Sender::Channel { id: channel },
            ..Self::group(1, "", text)
        }
    }
}
