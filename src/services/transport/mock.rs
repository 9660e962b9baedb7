use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, MessageId, UserId};

use crate::bot::error::Error;
use crate::services::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendText {
        channel_id: u64,
        text: String,
        reply_to: Option<u64>,
    },
    SendDirect {
        user_id: u64,
        text: String,
    },
    Delete {
        channel_id: u64,
        message_id: u64,
    },
    Restrict {
        guild_id: u64,
        user_id: u64,
    },
    Ban {
        guild_id: u64,
        user_id: u64,
    },
    Unban {
        guild_id: u64,
        user_id: u64,
    },
    Edit {
        channel_id: u64,
        message_id: u64,
        text: String,
    },
}

/// Records every call; individual operations or DM recipients can be made to fail
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<Call>>,
    failing_ops: Mutex<HashSet<&'static str>>,
    unreachable_users: Mutex<HashSet<u64>>,
    restrict_delay: Mutex<Option<Duration>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call of the named operation fail ("restrict", "ban", ...)
    pub fn fail(&self, op: &'static str) {
        self.failing_ops.lock().unwrap().insert(op);
    }

    /// Make direct messages to this user fail
    pub fn unreachable(&self, user_id: u64) {
        self.unreachable_users.lock().unwrap().insert(user_id);
    }

    /// Make restrictions take a while, like a slow API round trip
    pub fn slow_restrict(&self, delay: Duration) {
        *self.restrict_delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn directs(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SendDirect { user_id, text } => Some((user_id, text)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, op: &'static str, call: Call) -> Result<(), Error> {
        if self.failing_ops.lock().unwrap().contains(op) {
            return Err(Error::custom("Missing Permissions"));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        channel_id: ChannelId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageId, Error> {
        self.record(
            "send",
            Call::SendText {
                channel_id: channel_id.get(),
                text: text.to_string(),
                reply_to: reply_to.map(|m| m.get()),
            },
        )?;
        Ok(MessageId::new(9000 + self.calls.lock().unwrap().len() as u64))
    }

    async fn send_direct(&self, user_id: UserId, text: &str) -> Result<(), Error> {
        if self.unreachable_users.lock().unwrap().contains(&user_id.get()) {
            return Err(Error::custom("Cannot send messages to this user"));
        }
        self.record(
            "direct",
            Call::SendDirect {
                user_id: user_id.get(),
                text: text.to_string(),
            },
        )
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), Error> {
        self.record(
            "delete",
            Call::Delete {
                channel_id: channel_id.get(),
                message_id: message_id.get(),
            },
        )
    }

    async fn restrict_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error> {
        let delay = *self.restrict_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record(
            "restrict",
            Call::Restrict {
                guild_id: guild_id.get(),
                user_id: user_id.get(),
            },
        )
    }

    async fn ban_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error> {
        self.record(
            "ban",
            Call::Ban {
                guild_id: guild_id.get(),
                user_id: user_id.get(),
            },
        )
    }

    async fn unban_member(&self, guild_id: GuildId, user_id: UserId) -> Result<(), Error> {
        self.record(
            "unban",
            Call::Unban {
                guild_id: guild_id.get(),
                user_id: user_id.get(),
            },
        )
    }

    async fn edit_message_text(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        text: &str,
    ) -> Result<(), Error> {
        self.record(
            "edit",
            Call::Edit {
                channel_id: channel_id.get(),
                message_id: message_id.get(),
                text: text.to_string(),
            },
        )
    }
}
