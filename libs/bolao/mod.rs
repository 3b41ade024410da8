//! Bolão live notifications
//!
//! Listens to the backend's live event stream and turns round, match and
//! ranking events into in-app bell notifications.
//!
//! - **domain**: stream events, notifications, preferences, current user
//! - **application**: the notification router and its dedup cache
//! - **infrastructure**: stream client wiring, HTTP preferences, config, logging

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::notifications::{
    ChannelSink, DedupCache, NotificationRouter, NotificationSink, PreferencesLoader, RouterConfig,
    RouterState, RouterStats, StaticPreferences,
};
pub use domain::{
    decode_event, CurrentUser, CurrentUserProvider, DecodeError, EntityId, EventKind, EventPayload,
    Notification, NotificationKind, NotificationPreferences, PreferencesResponse, SharedUser,
    StreamEvent,
};
pub use infrastructure::{
    build_live_events_client, init_tracing, ConfigError, Heartbeat, HttpPreferencesLoader,
    LiveConfig, LiveEventDecoder, LiveEventsClient, ShutdownManager,
};
