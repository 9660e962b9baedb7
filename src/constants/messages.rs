// User-facing text templates

/// /start reply for admins, shown above the panel buttons
pub const ADMIN_PANEL_MENU: &str = "Admin panel. Use /ban or /unban to act on a user, or check the logs below.";

/// /start reply for everyone else
pub const GREETING: &str = "Hi! I watch this server for spam. DM me any message and I'll tell you whether it looks like spam.";

/// /info reply
pub const INFO_TEXT: &str = "Messages are checked by a spam classifier. Spam is deleted and the sender warned; \
repeat offenders are restricted and the admins are notified.";

/// Posted under every message from a whitelisted broadcasting channel
pub const CHAT_RULES: &str = "Chat rules:\n\
• No advertising, scams or referral links\n\
• No mass mentions or flooding\n\
• Spam is removed automatically; repeat offenders are restricted";

/// Private chat replies
pub const DM_SPAM: &str = "This message looks like spam.";
pub const DM_CLEAN: &str = "This message does not look like spam.";

/// Group warning: "<mention>, <GROUP_SPAM> <GROUP_SPAM_WARN> n/max."
pub const GROUP_SPAM: &str = "your message was removed as spam.";
pub const GROUP_SPAM_WARN: &str = "Warning";

/// Group notice after restriction: "<mention> <GROUP_SPAM_BAN>"
pub const GROUP_SPAM_BAN: &str = "has been restricted for spam.";

pub const NOT_ADMIN: &str = "This command is for admins only.";
pub const NO_LOGS: &str = "No violations logged yet.";
pub const LOGS_HEADER: &str = "Logs:";
pub const LOGS_BUTTON: &str = "Logs";

pub const BAN_PROMPT: &str = "Send the @username or user ID to ban.";
pub const UNBAN_PROMPT: &str = "Send the @username or user ID to unban.";
pub const SESSION_CANCELLED: &str = "Pending action cancelled.";
pub const NO_PENDING_SESSION: &str = "Nothing to cancel.";
