use std::time::Duration;

/// Warnings before a spammer is restricted (default, can be overridden via env var)
pub const DEFAULT_MAX_WARNINGS: u32 = 3;

/// Where the warning store lives unless WARNINGS_FILE says otherwise
pub const DEFAULT_WARNINGS_FILE: &str = "warnings.json";

/// Discord rejects messages longer than this
pub const MAX_LOG_CHARS: usize = 2000;

/// Text sent to the classifier is cut to this many characters
pub const MAX_CLASSIFIER_INPUT_CHARS: usize = 1000;

/// How long a classifier request may take before we treat it as failed
pub const CLASSIFIER_TIMEOUT: Duration = Duration::from_secs(10);

/// Spam restriction length. Discord caps timeouts at 28 days.
pub const RESTRICTION_DURATION: Duration = Duration::from_secs(27 * 24 * 60 * 60);

/// Probabilities reported when the classifier could not give an answer
pub const NEUTRAL_PROBABILITIES: [f32; 2] = [0.5, 0.5];

/// Classes the spam model reports (ham, spam). Labels outside this range are dropped.
pub const MAX_CLASSES: usize = 2;
