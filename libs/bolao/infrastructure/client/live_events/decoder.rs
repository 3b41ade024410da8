use crate::domain::{decode_event, StreamEvent};
use hyperstream::{Decoded, EventDecoder, SseFrame, StreamError};

/// Decodes `/matches/events` frames into [`StreamEvent`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveEventDecoder;

impl LiveEventDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl EventDecoder for LiveEventDecoder {
    type Event = StreamEvent;

    fn decode(&self, frame: &SseFrame) -> hyperstream::Result<Decoded<StreamEvent>> {
        decode_event(frame.event_name(), &frame.data).map_err(|e| StreamError::Decode(e.to_string()))
    }
}
