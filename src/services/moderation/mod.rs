pub mod admin_actions;
pub mod enforcement;
pub mod engine;
pub mod log_formatter;
pub mod message;

pub use engine::{Action, AdminNotice, ModerationEngine};
pub use message::{ChatKind, IncomingMessage, Sender};
