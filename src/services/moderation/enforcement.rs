use tracing::{debug, info, warn};

use crate::bot::error::Error;
use crate::constants::messages::{CHAT_RULES, GROUP_SPAM, GROUP_SPAM_BAN, GROUP_SPAM_WARN};
use crate::db::WarningStore;
use crate::services::moderation::engine::{Action, AdminNotice};
use crate::services::moderation::message::IncomingMessage;
use crate::services::transport::Transport;
use crate::utils::formatting::mention_user;

/// Carry out an [`Action`] on the platform.
///
/// A restricted user is only marked banned in the store after the platform
/// restriction succeeded.
pub async fn apply<T: Transport + ?Sized>(
    transport: &T,
    store: &WarningStore,
    message: &IncomingMessage,
    action: &Action,
) -> Result<(), Error> {
    match action {
        Action::Ignore => Ok(()),

        Action::Respond(text) => {
            transport.send_text(message.channel_id, text, None).await?;
            Ok(())
        }

        Action::ReplyWithRules => {
            transport
                .send_text(message.channel_id, CHAT_RULES, Some(message.message_id))
                .await?;
            debug!("Posted rules under message {}", message.message_id);
            Ok(())
        }

        Action::WarnAndDelete {
            user_id,
            count,
            threshold,
        } => {
            let notice = format!(
                "{}, {} {} {}/{}.",
                mention_user(*user_id),
                GROUP_SPAM,
                GROUP_SPAM_WARN,
                count,
                threshold
            );
            if let Err(e) = transport.send_text(message.channel_id, &notice, None).await {
                warn!("Failed to warn user {}: {}", user_id, e);
            }

            transport
                .delete_message(message.channel_id, message.message_id)
                .await
        }

        Action::RestrictAndBan {
            user_id,
            notifications,
            ..
        } => {
            let Some(guild_id) = message.guild_id else {
                store.release_restriction(user_id.get());
                return Err(Error::InvalidOperation(
                    "restriction is only possible in a server".to_string(),
                ));
            };

            if let Err(e) = transport.restrict_member(guild_id, *user_id).await {
                store.release_restriction(user_id.get());
                return Err(e);
            }

            if let Err(e) = store.ban_user(user_id.get()).await {
                warn!("User {} restricted but ban not saved: {}", user_id, e);
            }
            store.release_restriction(user_id.get());

            let notice = format!("{} {}", mention_user(*user_id), GROUP_SPAM_BAN);
            if let Err(e) = transport.send_text(message.channel_id, &notice, None).await {
                warn!("Failed to announce restriction of user {}: {}", user_id, e);
            }

            let delivered = notify_admins(transport, notifications).await;
            info!(
                "Restricted user {} for spam, notified {}/{} admins",
                user_id,
                delivered,
                notifications.len()
            );

            Ok(())
        }
    }
}

/// Send every notice, returning how many were delivered. One unreachable admin
/// never stops the others.
pub async fn notify_admins<T: Transport + ?Sized>(
    transport: &T,
    notifications: &[AdminNotice],
) -> usize {
    let mut delivered = 0;

    for notice in notifications {
        match transport.send_direct(notice.admin_id, &notice.text).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!("Failed to notify admin {}: {}", notice.admin_id, e),
        }
    }

    delivered
}
