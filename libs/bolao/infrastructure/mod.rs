//! Infrastructure Layer
//!
//! Implementations of external interfaces: the live event stream client,
//! the preferences HTTP endpoint, configuration, logging and process utilities.

pub mod client;
pub mod config;
pub mod logging;
pub mod utils;

pub use client::{
    build_live_events_client, HttpPreferencesLoader, LiveEventDecoder, LiveEventsClient,
};
pub use config::{ConfigError, LiveConfig};
pub use logging::init_tracing;
pub use utils::{Heartbeat, ShutdownManager};
