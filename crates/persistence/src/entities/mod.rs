//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod channel;
pub mod earning;
pub mod feedback;
pub mod profile;
pub mod subscription;
pub mod video;
pub mod watch_history;

pub use channel::{ChannelEntity, FollowerCountEntity};
pub use earning::{EarningEntity, EarningsSummaryEntity};
pub use feedback::FeedbackEntity;
pub use profile::ProfileEntity;
pub use subscription::SubscriptionEntity;
pub use video::VideoEntity;
pub use watch_history::WatchHistoryEntity;
