//! Event decoding and dispatch
//!
//! ```text
//! Transport → bytes → SseDecoder → SseFrame → EventDecoder → Decoded::Event(E) → EventHandler
//!                                                          ↘ Decoded::Ignored(kind) (dropped)
//! ```
//!
//! There is exactly one handler slot per client. Replacing it takes effect
//! for the next frame; the connection is never recreated for it.

use crate::core::sse::SseFrame;
use crate::Result;
use std::fmt::Debug;
use std::sync::Arc;

/// Outcome of decoding a single frame
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<E> {
    /// A recognised event, ready for dispatch
    Event(E),
    /// A well-formed frame of a kind this decoder does not know.
    /// Dropped without error so servers can add new kinds.
    Ignored(String),
}

impl<E> Decoded<E> {
    pub fn into_event(self) -> Option<E> {
        match self {
            Decoded::Event(event) => Some(event),
            Decoded::Ignored(_) => None,
        }
    }
}

/// Decoder that turns SSE frames into typed events
///
/// Returning `Err` marks the frame as malformed: the client logs it,
/// counts it and keeps the connection open.
///
/// # Example
///
/// ```ignore
/// struct TickDecoder;
///
/// impl EventDecoder for TickDecoder {
///     type Event = u64;
///
///     fn decode(&self, frame: &SseFrame) -> Result<Decoded<u64>> {
///         match frame.event.as_deref() {
///             Some("tick") => frame.data.trim().parse()
///                 .map(Decoded::Event)
///                 .map_err(|e| StreamError::Decode(e.to_string())),
///             other => Ok(Decoded::Ignored(other.unwrap_or("message").to_string())),
///         }
///     }
/// }
/// ```
pub trait EventDecoder: Send + Sync + 'static {
    /// The decoded event type
    type Event: Clone + Send + Sync + Debug + 'static;

    /// Decode one frame
    ///
    /// Runs on the connection task for every frame, in arrival order.
    fn decode(&self, frame: &SseFrame) -> Result<Decoded<Self::Event>>;
}

/// Callback invoked for every decoded event
pub type EventHandler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Wrap a closure as an [`EventHandler`]
pub fn event_handler<E, F>(f: F) -> EventHandler<E>
where
    F: Fn(&E) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Something that delivers decoded events to a single registered handler
pub trait EventSource<E>: Send + Sync {
    /// Replace the active handler. Later writes win.
    fn on_event(&self, handler: EventHandler<E>);
}
