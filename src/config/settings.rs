use std::env;
use std::path::PathBuf;

use crate::constants::limits::{DEFAULT_MAX_WARNINGS, DEFAULT_WARNINGS_FILE};

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub guild_id: Option<u64>,
    /// Users allowed to use admin commands; all of them get restriction notices
    pub admin_ids: Vec<u64>,
    /// Channels whose posts get the rules as a reply instead of spam checks
    pub broadcast_channels: Vec<u64>,
    /// Warn before restricting; when off the first violation restricts
    pub warnings_enabled: bool,
    /// Threshold for users without a per-user override
    pub default_max_warnings: u32,
    pub warnings_file: PathBuf,
    pub classifier_url: String,
    pub classifier_token: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| "DISCORD_TOKEN environment variable not set")?;

        let classifier_url = env::var("CLASSIFIER_URL")
            .map_err(|_| "CLASSIFIER_URL environment variable not set")?;

        let classifier_token = env::var("CLASSIFIER_TOKEN").ok().filter(|s| !s.is_empty());

        let guild_id = env::var("GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let admin_ids = parse_id_list("ADMIN_IDS", &env::var("ADMIN_IDS").unwrap_or_default())?;

        let broadcast_channels = parse_id_list(
            "BROADCAST_CHANNELS",
            &env::var("BROADCAST_CHANNELS").unwrap_or_default(),
        )?;

        let warnings_enabled = env::var("WARNINGS_ENABLED")
            .ok()
            .and_then(|s| parse_flag(&s))
            .unwrap_or(true);

        let default_max_warnings = env::var("DEFAULT_MAX_WARNINGS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_WARNINGS)
            .max(1);

        let warnings_file = env::var("WARNINGS_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_WARNINGS_FILE.to_string())
            .into();

        Ok(Self {
            discord_token,
            guild_id,
            admin_ids,
            broadcast_channels,
            warnings_enabled,
            default_max_warnings,
            warnings_file,
            classifier_url,
            classifier_token,
        })
    }

    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }

    pub fn is_broadcast_channel(&self, channel_id: u64) -> bool {
        self.broadcast_channels.contains(&channel_id)
    }
}

/// Parse a comma-separated list of numeric IDs
fn parse_id_list(name: &str, raw: &str) -> Result<Vec<u64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<u64>() {
            Ok(id) if id != 0 => Ok(id),
            _ => Err(format!("{} contains an invalid ID: {}", name, s)),
        })
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
impl Settings {
    /// Settings for tests: two admins, one broadcast channel, threshold 3
    pub fn for_tests() -> Self {
        Self {
            discord_token: String::new(),
            guild_id: None,
            admin_ids: vec![1001, 1002],
            broadcast_channels: vec![500],
            warnings_enabled: true,
            default_max_warnings: 3,
            warnings_file: PathBuf::from(DEFAULT_WARNINGS_FILE),
            classifier_url: String::new(),
            classifier_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_list() {
        assert_eq!(parse_id_list("X", "").unwrap(), Vec::<u64>::new());
        assert_eq!(parse_id_list("X", " 1, 2 ,3,").unwrap(), vec![1, 2, 3]);
        assert!(parse_id_list("X", "1,abc").is_err());
        assert!(parse_id_list("X", "0").is_err());
    }

    #[test]
    fn test_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
