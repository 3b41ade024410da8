//! Bell notifications from live events
//!
//! The [`NotificationRouter`] subscribes to an event source, waits for the
//! user's preferences, then classifies each event, applies preference gates
//! and match-status deduplication, and hands notifications to a sink.

pub mod dedup;
pub mod messages;
pub mod router;
pub mod sink;

pub use dedup::DedupCache;
pub use router::{
    NotificationRouter, PreferencesLoader, RouterConfig, RouterState, RouterStats,
    StaticPreferences,
};
pub use sink::{ChannelSink, NotificationSink};
