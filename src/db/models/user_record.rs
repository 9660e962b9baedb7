use serde::{Deserialize, Serialize};

/// Username stored when the platform gave us none
pub const UNKNOWN_USERNAME: &str = "unknown";

fn unknown_username() -> String {
    UNKNOWN_USERNAME.to_string()
}

/// Violation history for a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default = "unknown_username")]
    pub username: String,
    #[serde(default)]
    pub banned: bool,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub count: u32,
    /// Per-user threshold override; the global default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_warnings: Option<u32>,
}

impl UserRecord {
    /// Zero-value record handed out for users the store has never seen
    pub fn empty(default_max_warnings: u32) -> Self {
        Self {
            username: unknown_username(),
            banned: false,
            messages: Vec::new(),
            count: 0,
            max_warnings: Some(default_max_warnings.max(1)),
        }
    }

    /// Resolved warning threshold, never below 1
    pub fn threshold(&self, default_max_warnings: u32) -> u32 {
        self.max_warnings.unwrap_or(default_max_warnings).max(1)
    }

    /// Human-readable restriction status
    pub fn status_label(&self) -> &'static str {
        if self.banned {
            "Banned"
        } else {
            "Active"
        }
    }
}
