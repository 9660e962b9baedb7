pub mod classifier;
pub mod moderation;
pub mod transport;
