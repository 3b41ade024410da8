//! Live events SSE client
//!
//! Connects to `{base_url}/matches/events` and decodes every frame into a
//! [`StreamEvent`](crate::domain::StreamEvent).

mod decoder;

pub use decoder::LiveEventDecoder;

use crate::infrastructure::config::LiveConfig;
use hyperstream::{BearerToken, EventStreamClient, FixedDelay};
use std::sync::Arc;

/// The stream client used by the app
pub type LiveEventsClient = EventStreamClient<LiveEventDecoder>;

/// Build the live events client from configuration
///
/// Nothing connects until `connect()` / `connect_delayed()` is called.
/// Must be called from within a Tokio runtime.
pub fn build_live_events_client(config: &LiveConfig) -> hyperstream::Result<LiveEventsClient> {
    let mut builder = hyperstream::builder()
        .url(config.events_url())
        .decoder(LiveEventDecoder::new())
        .reconnect_strategy(FixedDelay::new(
            config.retry_delay(),
            Some(config.stream.max_retries),
        ))
        .initial_connect_delay(config.initial_connect_delay())
        .connect_timeout(config.connect_timeout());

    if let Some(ref token) = config.auth_token {
        builder = builder.headers(Arc::new(BearerToken::new(token.clone())));
    }

    builder.build()
}
