//! # HyperStream core
//!
//! The event stream client, its builder and the SSE frame decoder.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hyperstream::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = hyperstream::builder()
//!         .url("http://localhost:3000/api/matches/events")
//!         .decoder(MyDecoder)
//!         .reconnect_strategy(FixedDelay::new(Duration::from_secs(3), Some(5)))
//!         .build()?;
//!
//!     client.on_event(event_handler(|event: &MyEvent| println!("{:?}", event)));
//!     client.connect_delayed();
//!
//!     while let Ok(event) = client.recv_event() {
//!         println!("Lifecycle: {:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;
pub mod sse;

// Re-export main types
pub use builder::{states, EventStreamClientBuilder};
pub use client::{ClientEvent, EventStreamClient, Metrics, StreamStatus, EVENT_QUEUE_CAPACITY};
pub use config::StreamConfig;
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
pub use sse::{SseDecoder, SseFrame};

// Re-export traits for convenience
pub use crate::traits::*;

/// Create a new event stream client builder
///
/// # Example
/// ```ignore
/// let client = hyperstream::builder()
///     .url("http://localhost:3000/api/matches/events")
///     .decoder(MyDecoder)
///     .headers(Arc::new(BearerToken::new(token)))
///     .build()?;
/// ```
pub fn builder() -> EventStreamClientBuilder<builder::states::NoUrl, builder::states::NoDecoder, ()> {
    EventStreamClientBuilder::new()
}
