//! Domain models for LoopEasy.

pub mod billing;
pub mod channel;
pub mod earnings;
pub mod feedback;
pub mod follow;
pub mod profile;
pub mod provider_event;
pub mod soulshield;
pub mod video;
pub mod watch_history;

pub use billing::{PlanId, Subscription, SubscriptionStatus};
pub use channel::Channel;
pub use earnings::{Earning, EarningsSummary};
pub use profile::Profile;
pub use soulshield::{ContentCategory, ShieldPreset, ShieldSettings};
pub use video::{EmbedType, Video, VideoStatus};
