//! # HyperStream
//!
//! A small, resilient Server-Sent-Events client for long-lived event streams.
//!
//! ## Features
//!
//! - **At most one connection**: `connect()` is idempotent while connecting or open
//! - **Bounded reconnection**: pluggable strategies, fixed 3s x 5 attempts by default
//! - **Latest-handler dispatch**: swap the event handler without reconnecting
//! - **Typed decoding**: frames go through an `EventDecoder` into your own event type
//! - **Scoped teardown**: dropping the client cancels every pending timer and task

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use self::core::{
    builder, client, config, connection_state, sse,
    builder::{states, EventStreamClientBuilder},
    client::{ClientEvent, EventStreamClient, Metrics, StreamStatus, EVENT_QUEUE_CAPACITY},
    config::StreamConfig,
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState},
    sse::{SseDecoder, SseFrame},
};

// Convenience function
pub use self::core::builder as client_builder;

/// Type alias for Result with StreamError
pub type Result<T> = std::result::Result<T, traits::StreamError>;
