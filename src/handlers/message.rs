use std::sync::Arc;

use serenity::all::{Context, Message};
use tracing::debug;

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::services::moderation::admin_actions::process_target;
use crate::services::moderation::{enforcement, IncomingMessage, ModerationEngine};
use crate::services::transport::{DiscordTransport, Transport};

pub async fn handle_message(ctx: &Context, data: &Arc<Data>, msg: &Message) -> Result<(), Error> {
    let Some(incoming) = IncomingMessage::from_discord(msg) else {
        return Ok(());
    };

    let transport = DiscordTransport::new(ctx.http.clone());
    route_message(&transport, data, &incoming).await
}

/// Send a message either to a pending admin session or through moderation
pub async fn route_message<T: Transport + ?Sized>(
    transport: &T,
    data: &Data,
    incoming: &IncomingMessage,
) -> Result<(), Error> {
    if let (Some(user_id), Some(guild_id)) = (incoming.user_id(), incoming.guild_id) {
        let pending = data
            .admin_sessions
            .state(incoming.channel_id, user_id)
            .pending_action();

        if let Some(action) = pending {
            debug!("Admin {} answered a pending {:?}", user_id, action);
            let outcome =
                process_target(transport, &data.store, guild_id, action, &incoming.text).await;
            data.admin_sessions
                .apply(incoming.channel_id, user_id, outcome.event);
            transport
                .send_text(incoming.channel_id, &outcome.reply, Some(incoming.message_id))
                .await?;
            return Ok(());
        }
    }

    let engine = ModerationEngine::new(&data.settings, &data.store);
    let action = engine.evaluate(incoming, data.classifier.as_ref()).await;

    enforcement::apply(transport, &data.store, incoming, &action).await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use serenity::all::UserId;

    use super::*;
    use crate::config::Settings;
    use crate::db::WarningStore;
    use crate::services::classifier::{Classification, SpamClassifier};
    use crate::services::moderation::admin_actions::{AdminEvent, AdminState};
    use crate::services::transport::mock::{Call, RecordingTransport};

    struct AlwaysSpam;

    #[async_trait]
    impl SpamClassifier for AlwaysSpam {
        async fn classify(&self, _text: &str) -> Classification {
            Classification::new(true, vec![0.0, 1.0])
        }
    }

    async fn data(dir: &tempfile::TempDir) -> Data {
        let store = WarningStore::open(dir.path().join("warnings.json"), 3).await;
        Data::new(Settings::for_tests(), store, Box::new(AlwaysSpam))
    }

    #[tokio::test]
    async fn test_third_spam_restricts_and_notifies_admins() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir).await;
        let transport = RecordingTransport::new();
        let message = IncomingMessage::group(42, "alice", "free crypto");

        for _ in 0..3 {
            route_message(&transport, &data, &message).await.unwrap();
        }

        let deletes = transport
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Delete { .. }))
            .count();
        assert_eq!(deletes, 2);
        assert!(transport.calls().contains(&Call::Restrict {
            guild_id: 77,
            user_id: 42
        }));
        assert_eq!(transport.directs().len(), 2);
        assert!(data.store.is_banned(42).await);

        // A fourth message from the now banned user changes nothing
        let before = transport.calls().len();
        route_message(&transport, &data, &message).await.unwrap();
        assert_eq!(transport.calls().len(), before);
        assert_eq!(data.store.get_user(42).await.count, 3);
    }

    #[tokio::test]
    async fn test_spam_burst_restricts_once() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir).await;
        let transport = RecordingTransport::new();
        transport.slow_restrict(Duration::from_millis(50));
        let message = IncomingMessage::group(42, "alice", "free crypto");

        for _ in 0..2 {
            route_message(&transport, &data, &message).await.unwrap();
        }

        let (first, second) = tokio::join!(
            route_message(&transport, &data, &message),
            route_message(&transport, &data, &message)
        );
        first.unwrap();
        second.unwrap();

        let restricts = transport
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::Restrict { .. }))
            .count();
        assert_eq!(restricts, 1);
        assert_eq!(transport.directs().len(), 2);
        assert!(data.store.is_banned(42).await);
        assert!(!data.store.restriction_pending(42));
    }

    #[tokio::test]
    async fn test_pending_admin_session_takes_the_message() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir).await;
        data.store.log_violation(42, "alice", "spam").await.unwrap();
        let transport = RecordingTransport::new();

        let admin_message = IncomingMessage::group(1001, "boss", "@alice");
        data.admin_sessions.apply(
            admin_message.channel_id,
            UserId::new(1001),
            AdminEvent::BanRequested,
        );

        route_message(&transport, &data, &admin_message)
            .await
            .unwrap();

        assert!(data.store.is_banned(42).await);
        assert!(!data.store.contains(1001).await);
        assert_eq!(
            data.admin_sessions
                .state(admin_message.channel_id, UserId::new(1001)),
            AdminState::Idle
        );
        assert_eq!(
            transport.calls(),
            vec![
                Call::Ban {
                    guild_id: 77,
                    user_id: 42
                },
                Call::SendText {
                    channel_id: 10,
                    text: "@alice banned.".to_string(),
                    reply_to: Some(300),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_target_returns_session_to_idle() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir).await;
        let transport = RecordingTransport::new();

        let admin_message = IncomingMessage::group(1001, "boss", "31337");
        data.admin_sessions.apply(
            admin_message.channel_id,
            UserId::new(1001),
            AdminEvent::UnbanRequested,
        );

        route_message(&transport, &data, &admin_message)
            .await
            .unwrap();

        assert!(data.admin_sessions.is_empty());
        assert!(data.store.get_logs().await.is_empty());
        assert_eq!(
            transport.calls(),
            vec![Call::SendText {
                channel_id: 10,
                text: "User 31337 not found.".to_string(),
                reply_to: Some(300),
            }]
        );
    }

    #[tokio::test]
    async fn test_private_message_gets_verdict_only() {
        let dir = tempfile::tempdir().unwrap();
        let data = data(&dir).await;
        let transport = RecordingTransport::new();

        route_message(&transport, &data, &IncomingMessage::private(42, "alice", "promo"))
            .await
            .unwrap();

        assert_eq!(transport.calls().len(), 1);
        assert!(data.store.get_logs().await.is_empty());
    }
}
