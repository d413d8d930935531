//! API route handlers.

pub mod ai_channels;
pub mod billing;
pub mod channels;
pub mod feedback;
pub mod follows;
pub mod health;
pub mod history;
pub mod me;
pub mod soulshield;
pub mod uploads;
pub mod videos;
pub mod webhooks;
