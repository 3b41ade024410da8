use crate::traits::*;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for EventStreamClient
///
/// Built by [`EventStreamClientBuilder`](crate::builder::EventStreamClientBuilder);
/// immutable once the client exists.
pub struct StreamConfig {
    /// Event stream URL (http:// or https://)
    pub(crate) url: String,

    /// Transport used for every connection attempt
    pub(crate) transport: Arc<dyn Transport>,

    /// Reconnection strategy, consulted after every failed or dropped connection
    pub(crate) reconnect_strategy: Box<dyn ReconnectionStrategy>,

    /// Default delay for `connect_delayed()`
    pub(crate) initial_connect_delay: Duration,

    /// Replay the last SSE `id` as `Last-Event-ID` when reconnecting
    pub(crate) resume_from_last_id: bool,
}

impl StreamConfig {
    /// Default delay before the first connection of a freshly mounted client
    pub const DEFAULT_INITIAL_CONNECT_DELAY: Duration = Duration::from_millis(3000);

    /// Get a reference to the URL
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn initial_connect_delay(&self) -> Duration {
        self.initial_connect_delay
    }

    /// Retry budget of the configured strategy (None = unlimited)
    pub fn max_reconnect_attempts(&self) -> Option<usize> {
        self.reconnect_strategy.max_attempts()
    }

    pub fn resumes_from_last_id(&self) -> bool {
        self.resume_from_last_id
    }
}
