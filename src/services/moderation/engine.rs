use serenity::all::UserId;
use tracing::{debug, error, info};

use crate::config::Settings;
use crate::constants::messages::{DM_CLEAN, DM_SPAM};
use crate::db::WarningStore;
use crate::services::classifier::{Classification, SpamClassifier};
use crate::services::moderation::message::{ChatKind, IncomingMessage, Sender};

/// What should happen to a message
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Ignore,
    /// Reply in a private chat
    Respond(String),
    /// Post the chat rules as a reply
    ReplyWithRules,
    WarnAndDelete {
        user_id: UserId,
        count: u32,
        threshold: u32,
    },
    RestrictAndBan {
        user_id: UserId,
        count: u32,
        threshold: u32,
        notifications: Vec<AdminNotice>,
    },
}

/// A message to deliver to one admin after a restriction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminNotice {
    pub admin_id: UserId,
    pub text: String,
}

/// Turns a message and its classification into an [`Action`].
///
/// Holds no state of its own; everything it remembers lives in the
/// [`WarningStore`] it is handed.
pub struct ModerationEngine<'a> {
    settings: &'a Settings,
    store: &'a WarningStore,
}

impl<'a> ModerationEngine<'a> {
    pub fn new(settings: &'a Settings, store: &'a WarningStore) -> Self {
        Self { settings, store }
    }

    /// Decisions that do not need a classification: anonymous senders and
    /// broadcasting channels
    pub fn screen(&self, message: &IncomingMessage) -> Option<Action> {
        if message.chat == ChatKind::Private {
            return None;
        }

        if self.settings.is_broadcast_channel(message.channel_id.get()) {
            return Some(Action::ReplyWithRules);
        }

        match &message.sender {
            Sender::Channel { id } if self.settings.is_broadcast_channel(*id) => {
                Some(Action::ReplyWithRules)
            }
            Sender::Channel { id } => {
                info!("Ignoring anonymous message from channel {}", id);
                Some(Action::Ignore)
            }
            Sender::User { .. } => None,
        }
    }

    /// Screen, classify if needed, then decide
    pub async fn evaluate(
        &self,
        message: &IncomingMessage,
        classifier: &dyn SpamClassifier,
    ) -> Action {
        if let Some(action) = self.screen(message) {
            return action;
        }

        let classification = classifier.classify(&message.text).await;
        info!(
            "Checked message {} from {:?}: spam={} ({:?})",
            message.message_id, message.sender, classification.is_spam, classification.probabilities
        );

        self.decide(message, &classification).await
    }

    pub async fn decide(
        &self,
        message: &IncomingMessage,
        classification: &Classification,
    ) -> Action {
        if message.chat == ChatKind::Private {
            let reply = if classification.is_spam { DM_SPAM } else { DM_CLEAN };
            return Action::Respond(reply.to_string());
        }

        if let Some(action) = self.screen(message) {
            return action;
        }

        let Sender::User { id, username } = &message.sender else {
            return Action::Ignore;
        };

        if !classification.is_spam {
            return Action::Ignore;
        }

        let user_id = id.get();
        if self.store.is_banned(user_id).await || self.store.restriction_pending(user_id) {
            debug!("Spam from already restricted user {}, ignoring", user_id);
            return Action::Ignore;
        }

        let count = match self.store.log_violation(user_id, username, &message.text).await {
            Ok(count) => count,
            Err(e) => {
                // The in-memory record was still updated
                error!("Violation for user {} not persisted: {}", user_id, e);
                self.store.get_user(user_id).await.count
            }
        };
        let (_, threshold) = self.store.warning_status(user_id).await;

        if self.settings.warnings_enabled && count < threshold {
            info!("Warning user {} ({}/{})", user_id, count, threshold);
            return Action::WarnAndDelete {
                user_id: *id,
                count,
                threshold,
            };
        }

        // Messages racing past the checks above must not restrict twice
        if !self.store.claim_restriction(user_id).await {
            debug!("Restriction of user {} already under way", user_id);
            return Action::Ignore;
        }

        info!("User {} reached {}/{}, restricting", user_id, count, threshold);
        Action::RestrictAndBan {
            user_id: *id,
            count,
            threshold,
            notifications: self.admin_notices(*id, username, &message.text),
        }
    }

    fn admin_notices(&self, user_id: UserId, username: &str, text: &str) -> Vec<AdminNotice> {
        let text = format!(
            "🚫 User @{} (ID: {}) was restricted for spam.\nMessage:\n{}",
            username, user_id, text
        );

        self.settings
            .admin_ids
            .iter()
            .map(|admin_id| AdminNotice {
                admin_id: UserId::new(*admin_id),
                text: text.clone(),
            })
            .collect()
    }
}
