//! Incremental `text/event-stream` decoding
//!
//! Chunks may split lines, fields or even `\r\n` pairs anywhere; the decoder
//! buffers until a full line is available and emits a frame on every blank
//! line that follows at least one `data` field.

use tracing::{trace, warn};

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Longest line kept while waiting for its terminator
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// One dispatched SSE event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseFrame {
    /// `event:` field. `None` means the default `message` event.
    pub event: Option<String>,
    /// `data:` lines joined with `\n`
    pub data: String,
}

impl SseFrame {
    /// Event name as a server would see it (`message` when unnamed)
    pub fn event_name(&self) -> &str {
        self.event.as_deref().unwrap_or("message")
    }
}

/// Streaming SSE parser
///
/// Lines are split on raw bytes before UTF-8 decoding so multi-byte
/// characters cut by a chunk boundary survive intact.
///
/// The last event ID follows EventSource rules: an `id:` field fills a
/// buffer that survives across blocks, and every blank line commits it,
/// whether or not the block carried data. An empty `id:` clears it.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    pending_cr: bool,
    started: bool,
    /// Skipping the tail of an oversized line
    discarding: bool,
    /// Block cut by an oversized line; ignored up to its blank line
    skip_block: bool,
    max_line_bytes: usize,
    event: Option<String>,
    data: Vec<String>,
    id_buffer: String,
    last_event_id: String,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            pending_cr: false,
            started: false,
            discarding: false,
            skip_block: false,
            max_line_bytes: MAX_LINE_BYTES,
            event: None,
            data: Vec::new(),
            id_buffer: String::new(),
            last_event_id: String::new(),
        }
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder for a reconnection that carries over the previous stream's last event ID
    pub fn resuming(last_event_id: Option<String>) -> Self {
        let id = last_event_id.unwrap_or_default();
        Self {
            id_buffer: id.clone(),
            last_event_id: id,
            ..Self::default()
        }
    }

    /// Last committed event ID, `None` when unset or cleared by the server
    pub fn last_event_id(&self) -> Option<&str> {
        Some(self.last_event_id.as_str()).filter(|id| !id.is_empty())
    }

    /// Feed a chunk of body bytes, returning every frame completed by it
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        if !self.started && self.buffer.len() >= 3 {
            self.started = true;
            if self.buffer.starts_with(UTF8_BOM) {
                self.buffer.drain(..UTF8_BOM.len());
            }
        }

        let mut frames = Vec::new();

        loop {
            // A '\r' at the end of the previous chunk may be the first half of "\r\n"
            if self.pending_cr {
                if self.buffer.is_empty() {
                    break;
                }
                if self.buffer[0] == b'\n' {
                    self.buffer.drain(..1);
                }
                self.pending_cr = false;
            }

            let Some(idx) = self.buffer.iter().position(|&b| b == b'\n' || b == b'\r') else {
                if self.buffer.len() > self.max_line_bytes {
                    self.buffer.clear();
                    self.drop_oversized_line();
                    self.discarding = true;
                }
                break;
            };

            let terminator = self.buffer[idx];
            let line: Vec<u8> = self.buffer.drain(..=idx).take(idx).collect();

            if terminator == b'\r' {
                if self.buffer.first() == Some(&b'\n') {
                    self.buffer.drain(..1);
                } else if self.buffer.is_empty() {
                    self.pending_cr = true;
                }
            }

            if self.discarding {
                self.discarding = false;
                continue;
            }

            if line.len() > self.max_line_bytes {
                self.drop_oversized_line();
                continue;
            }

            if let Some(frame) = self.process_line(&String::from_utf8_lossy(&line)) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Drop the block an oversized line belongs to
    fn drop_oversized_line(&mut self) {
        if !self.discarding {
            warn!(
                "[Live Stream] Dropping SSE line longer than {} bytes",
                self.max_line_bytes
            );
        }
        self.event = None;
        self.data.clear();
        self.skip_block = true;
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            self.skip_block = false;
            return self.dispatch();
        }

        if self.skip_block {
            return None;
        }

        if line.starts_with(':') {
            trace!("SSE comment: {}", line);
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => {
                if !value.contains('\0') {
                    self.id_buffer = value.to_string();
                }
            }
            _ => trace!("Unknown SSE field: {}", field),
        }

        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        self.last_event_id.clone_from(&self.id_buffer);
        let event = self.event.take();

        if self.data.is_empty() {
            return None;
        }

        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame {
            event: event.filter(|e| !e.is_empty()),
            data,
        })
    }
}
