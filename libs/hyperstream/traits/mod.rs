//! # HyperStream Traits
//!
//! Core traits and types for the HyperStream event-stream client.
//!
//! - **Transport**: Open the long-lived HTTP stream and hand back raw byte chunks
//! - **EventDecoder**: Turn an SSE frame into a typed event (or an explicit ignore)
//! - **EventSource**: Register the handler that receives every decoded event
//! - **ReconnectionStrategy**: Control retry delays and the retry budget
//! - **HeaderProvider**: Add request headers on every (re)connection
//!
//! ## Example
//!
//! ```rust,ignore
//! use hyperstream::*;
//!
//! struct JsonDecoder;
//!
//! impl EventDecoder for JsonDecoder {
//!     type Event = String;
//!
//!     fn decode(&self, frame: &SseFrame) -> Result<Decoded<String>> {
//!         Ok(Decoded::Event(frame.data.clone()))
//!     }
//! }
//! ```

pub mod decoder;
pub mod error;
pub mod headers;
pub mod reconnect;
pub mod transport;

// Re-export commonly used types
pub use decoder::{event_handler, Decoded, EventDecoder, EventHandler, EventSource};
pub use error::{Result, StreamError};
pub use headers::{BearerToken, HeaderProvider, Headers};
pub use reconnect::{ExponentialBackoff, FixedDelay, NeverReconnect, ReconnectionStrategy};
pub use transport::{ByteStream, HttpTransport, OpenRequest, Transport};
