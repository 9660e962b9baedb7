use dashmap::DashMap;
use serenity::all::{ChannelId, GuildId, UserId};
use tracing::{debug, error, info};

use crate::db::models::UserRecord;
use crate::db::WarningStore;
use crate::services::transport::Transport;

/// Where an admin is in the ban/unban conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminState {
    #[default]
    Idle,
    AwaitingBanTarget,
    AwaitingUnbanTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEvent {
    BanRequested,
    UnbanRequested,
    TargetNotFound,
    ActionCompleted,
    ActionFailed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanAction {
    Ban,
    Unban,
}

impl AdminState {
    /// Transition table. A new request always replaces a pending one; every
    /// outcome of a pending request returns to `Idle`.
    pub fn next(self, event: AdminEvent) -> AdminState {
        match event {
            AdminEvent::BanRequested => AdminState::AwaitingBanTarget,
            AdminEvent::UnbanRequested => AdminState::AwaitingUnbanTarget,
            AdminEvent::TargetNotFound
            | AdminEvent::ActionCompleted
            | AdminEvent::ActionFailed
            | AdminEvent::Cancelled => AdminState::Idle,
        }
    }

    /// The action waiting for a target, if any
    pub fn pending_action(self) -> Option<BanAction> {
        match self {
            AdminState::Idle => None,
            AdminState::AwaitingBanTarget => Some(BanAction::Ban),
            AdminState::AwaitingUnbanTarget => Some(BanAction::Unban),
        }
    }
}

/// In-memory admin conversations keyed by (channel, admin). Idle sessions are
/// not stored; nothing here survives a restart.
#[derive(Debug, Default)]
pub struct AdminSessions {
    states: DashMap<(u64, u64), AdminState>,
}

impl AdminSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, channel_id: ChannelId, admin_id: UserId) -> AdminState {
        self.states
            .get(&(channel_id.get(), admin_id.get()))
            .map(|s| *s)
            .unwrap_or_default()
    }

    /// Feed an event into a session and return its new state
    pub fn apply(&self, channel_id: ChannelId, admin_id: UserId, event: AdminEvent) -> AdminState {
        let key = (channel_id.get(), admin_id.get());
        let next = self.state(channel_id, admin_id).next(event);

        if next == AdminState::Idle {
            self.states.remove(&key);
        } else {
            self.states.insert(key, next);
        }

        debug!("Admin {} in channel {}: {:?} -> {:?}", admin_id, channel_id, event, next);
        next
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Reply for the admin plus the event that closes the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminOutcome {
    pub reply: String,
    pub event: AdminEvent,
}

/// Find the record an admin meant: `@name` matches a stored username,
/// anything else is read as a user ID. Only users already in the store resolve.
pub async fn resolve_target(store: &WarningStore, input: &str) -> Option<(u64, UserRecord)> {
    let input = input.trim();

    let found = match input.strip_prefix('@') {
        Some(username) => store.find_by_username(username).await,
        None => {
            let user_id = input.parse::<u64>().ok()?;
            if !store.contains(user_id).await {
                return None;
            }
            Some((user_id, store.get_user(user_id).await))
        }
    };

    found.filter(|(user_id, _)| *user_id != 0)
}

/// Run a pending ban or unban against the admin's text input.
///
/// The store is only updated after the platform call succeeded; a platform
/// error is shown to the admin as is.
pub async fn process_target<T: Transport + ?Sized>(
    transport: &T,
    store: &WarningStore,
    guild_id: GuildId,
    action: BanAction,
    input: &str,
) -> AdminOutcome {
    let Some((user_id, record)) = resolve_target(store, input).await else {
        return AdminOutcome {
            reply: format!("User {} not found.", input.trim()),
            event: AdminEvent::TargetNotFound,
        };
    };

    let target = UserId::new(user_id);
    let platform_result = match action {
        BanAction::Ban => transport.ban_member(guild_id, target).await,
        BanAction::Unban => transport.unban_member(guild_id, target).await,
    };

    if let Err(e) = platform_result {
        error!("Failed to {:?} user {}: {}", action, user_id, e);
        return AdminOutcome {
            reply: format!("Error: {}", e),
            event: AdminEvent::ActionFailed,
        };
    }

    let (store_result, verb) = match action {
        BanAction::Ban => (store.ban_user(user_id).await, "banned"),
        BanAction::Unban => (store.unban_user(user_id).await, "unbanned"),
    };

    info!("Admin action: user {} (@{}) {}", user_id, record.username, verb);

    let mut reply = format!("@{} {}.", record.username, verb);
    if let Err(e) = store_result {
        reply.push_str(&format!("\nThe change was applied but not saved: {}", e));
    }

    AdminOutcome {
        reply,
        event: AdminEvent::ActionCompleted,
    }
}
