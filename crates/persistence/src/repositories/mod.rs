//! Repository implementations for database operations.

pub mod channel;
pub mod earnings;
pub mod feedback;
pub mod follow;
pub mod profile;
pub mod subscription;
pub mod video;
pub mod watch_history;

pub use channel::{ChannelChanges, ChannelListFilter, ChannelRepository, NewChannel};
pub use earnings::EarningsRepository;
pub use feedback::FeedbackRepository;
pub use follow::FollowRepository;
pub use profile::ProfileRepository;
pub use subscription::SubscriptionRepository;
pub use video::{NewEmbeddedVideo, ReorderOutcome, VideoRepository};
pub use watch_history::WatchHistoryRepository;
