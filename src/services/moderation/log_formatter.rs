use std::fmt::Write;

use crate::constants::limits::MAX_LOG_CHARS;
use crate::constants::messages::LOGS_HEADER;
use crate::db::snapshot::Snapshot;
use crate::utils::formatting::truncate_chars;

/// Render the warning store for admins, or `None` when nothing is logged.
///
/// Each user becomes a header line plus their messages as a bulleted list:
///
/// ```text
/// ID 42 (@alice): 2/3 | Active
///   - first spam
///   - second spam
/// ```
///
/// The result is hard-cut at [`MAX_LOG_CHARS`].
pub fn format_logs(records: &Snapshot, default_max_warnings: u32) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let mut text = format!("{}\n", LOGS_HEADER);
    for (user_id, record) in records {
        let _ = writeln!(
            text,
            "ID {} (@{}): {}/{} | {}",
            user_id,
            record.username,
            record.count,
            record.threshold(default_max_warnings),
            record.status_label()
        );
        for message in &record.messages {
            let _ = writeln!(text, "  - {}", message);
        }
        text.push('\n');
    }

    Some(truncate_chars(&text, MAX_LOG_CHARS).to_string())
}
