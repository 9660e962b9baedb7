use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::db::WarningStore;
use crate::services::classifier::SpamClassifier;
use crate::services::moderation::admin_actions::AdminSessions;

/// Shared data available to all commands and handlers
pub struct Data {
    pub settings: Settings,
    /// Violation history, the only persistent state
    pub store: WarningStore,
    pub classifier: Box<dyn SpamClassifier>,
    /// Pending ban/unban conversations: (channel_id, admin_id) -> state
    pub admin_sessions: AdminSessions,
}

impl Data {
    pub fn new(settings: Settings, store: WarningStore, classifier: Box<dyn SpamClassifier>) -> Self {
        Self {
            settings,
            store,
            classifier,
            admin_sessions: AdminSessions::new(),
        }
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.settings.is_admin(user_id)
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("warnings_file", &self.store.path())
            .field("admin_sessions_count", &self.admin_sessions.len())
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
