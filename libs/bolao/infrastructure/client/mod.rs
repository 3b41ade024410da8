//! API clients
//!
//! - `live_events`: SSE client for `/matches/events`
//! - `preferences`: notification preferences endpoint

pub mod live_events;
pub mod preferences;

pub use live_events::{build_live_events_client, LiveEventDecoder, LiveEventsClient};
pub use preferences::HttpPreferencesLoader;
