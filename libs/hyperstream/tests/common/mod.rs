//! Common test utilities for HyperStream integration tests
//!
//! - `ScriptedTransport`: in-memory transport whose connection attempts are
//!   scripted up front (fail, or open a stream fed by the test)
//! - `MockSseServer`: raw TCP server speaking just enough HTTP/1.1 to serve
//!   `text/event-stream` to the real `HttpTransport`
//! - `TestDecoder`: frames carry `kind|payload` in their data line

#![allow(dead_code)]

use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::StreamExt;
use hyperstream::*;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, Notify};

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

// =============================================================================
// Decoder
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestEvent {
    pub kind: String,
    pub payload: String,
}

/// Knows `tick` and `score`; `bad` is malformed; anything else is ignored
pub struct TestDecoder;

impl EventDecoder for TestDecoder {
    type Event = TestEvent;

    fn decode(&self, frame: &SseFrame) -> Result<Decoded<TestEvent>> {
        let (kind, payload) = frame
            .data
            .split_once('|')
            .ok_or_else(|| StreamError::Decode(format!("missing separator in '{}'", frame.data)))?;

        match kind {
            "tick" | "score" => Ok(Decoded::Event(TestEvent {
                kind: kind.to_string(),
                payload: payload.to_string(),
            })),
            "bad" => Err(StreamError::Decode("bad payload".into())),
            other => Ok(Decoded::Ignored(other.to_string())),
        }
    }
}

/// Handler that records every event it sees
pub fn recording_handler() -> (EventHandler<TestEvent>, Arc<Mutex<Vec<TestEvent>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = event_handler(move |event: &TestEvent| sink.lock().push(event.clone()));
    (handler, seen)
}

pub fn frame(kind: &str, payload: &str) -> String {
    format!("data: {}|{}\n\n", kind, payload)
}

pub fn frame_with_id(id: &str, kind: &str, payload: &str) -> String {
    format!("id: {}\ndata: {}|{}\n\n", id, kind, payload)
}

// =============================================================================
// Scripted transport
// =============================================================================

enum Attempt {
    Fail(String),
    Open(futures::channel::mpsc::UnboundedReceiver<Result<Vec<u8>>>),
}

/// Feeds body chunks into a scripted stream
pub struct StreamFeed {
    tx: UnboundedSender<Result<Vec<u8>>>,
}

impl StreamFeed {
    pub fn send_raw(&self, bytes: &[u8]) {
        let _ = self.tx.unbounded_send(Ok(bytes.to_vec()));
    }

    pub fn send(&self, kind: &str, payload: &str) {
        self.send_raw(frame(kind, payload).as_bytes());
    }

    /// Terminate the stream with a transport error
    pub fn fail(&self, message: &str) {
        let _ = self
            .tx
            .unbounded_send(Err(StreamError::Transport(message.to_string())));
    }

    /// End the stream cleanly (server closed the response)
    pub fn close(self) {
        drop(self);
    }
}

/// Transport whose attempts are scripted; unscripted attempts fail
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Attempt>>,
    opens: AtomicUsize,
    requests: Mutex<Vec<OpenRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_failure(&self, message: &str) {
        self.script.lock().push_back(Attempt::Fail(message.to_string()));
    }

    pub fn push_stream(&self) -> StreamFeed {
        let (tx, rx) = unbounded();
        self.script.lock().push_back(Attempt::Open(rx));
        StreamFeed { tx }
    }

    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<OpenRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn open(&self, request: &OpenRequest) -> Result<ByteStream> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let attempt = self.script.lock().pop_front();
        match attempt {
            Some(Attempt::Open(rx)) => Ok(rx.boxed()),
            Some(Attempt::Fail(message)) => Err(StreamError::Transport(message)),
            None => Err(StreamError::Transport("connection refused".into())),
        }
    }
}

pub const TEST_URL: &str = "http://localhost:3000/api/matches/events";

/// Client over a scripted transport with the default 3s x 5 policy
pub fn scripted_client(transport: &Arc<ScriptedTransport>) -> EventStreamClient<TestDecoder> {
    hyperstream::builder()
        .url(TEST_URL)
        .decoder(TestDecoder)
        .transport(Arc::clone(transport) as Arc<dyn Transport>)
        .build()
        .unwrap()
}

/// Let spawned tasks run without advancing meaningful time
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

/// Poll `condition` every 10ms until it holds or `timeout` elapses
pub async fn wait_for<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}

// =============================================================================
// Mock SSE server
// =============================================================================

/// A minimal HTTP/1.1 server streaming `text/event-stream`
pub struct MockSseServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
    drop_connections: Arc<Notify>,
    frames: broadcast::Sender<String>,
    connections: Arc<AtomicUsize>,
    last_event_ids: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockSseServer {
    /// Start a server answering 200 with an event stream
    pub async fn start() -> Self {
        Self::start_with_status(200).await
    }

    /// Start a server answering every request with `status`
    pub async fn start_with_status(status: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let drop_connections = Arc::new(Notify::new());
        let (frames, _) = broadcast::channel(64);
        let connections = Arc::new(AtomicUsize::new(0));
        let last_event_ids = Arc::new(Mutex::new(Vec::new()));

        {
            let shutdown = Arc::clone(&shutdown);
            let drop_connections = Arc::clone(&drop_connections);
            let frames = frames.clone();
            let connections = Arc::clone(&connections);
            let last_event_ids = Arc::clone(&last_event_ids);

            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        result = listener.accept() => {
                            match result {
                                Ok((stream, _)) => {
                                    connections.fetch_add(1, Ordering::SeqCst);
                                    let rx = frames.subscribe();
                                    let shutdown = Arc::clone(&shutdown);
                                    let drop_connections = Arc::clone(&drop_connections);
                                    let last_event_ids = Arc::clone(&last_event_ids);
                                    tokio::spawn(async move {
                                        Self::handle_connection(
                                            stream,
                                            status,
                                            rx,
                                            shutdown,
                                            drop_connections,
                                            last_event_ids,
                                        )
                                        .await;
                                    });
                                }
                                Err(e) => {
                                    eprintln!("Accept error: {}", e);
                                    break;
                                }
                            }
                        }
                        _ = shutdown.notified() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            addr,
            shutdown,
            drop_connections,
            frames,
            connections,
            last_event_ids,
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        status: u16,
        mut frames: broadcast::Receiver<String>,
        shutdown: Arc<Notify>,
        drop_connections: Arc<Notify>,
        last_event_ids: Arc<Mutex<Vec<Option<String>>>>,
    ) {
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        // Request line and headers
        let mut last_event_id = None;
        loop {
            let mut line = String::new();
            match reader.read_line(&mut line).await {
                Ok(0) | Err(_) => return,
                Ok(_) => {}
            }
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("last-event-id") {
                    last_event_id = Some(value.trim().to_string());
                }
            }
        }
        last_event_ids.lock().push(last_event_id);

        if status != 200 {
            let body = "unavailable";
            let response = format!(
                "HTTP/1.1 {} Error\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = write_half.write_all(response.as_bytes()).await;
            let _ = write_half.shutdown().await;
            return;
        }

        let headers = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n";
        if write_half.write_all(headers.as_bytes()).await.is_err() {
            return;
        }
        let _ = write_half.write_all(b": connected\n\n").await;
        let _ = write_half.flush().await;

        loop {
            tokio::select! {
                frame = frames.recv() => {
                    match frame {
                        Ok(frame) => {
                            if write_half.write_all(frame.as_bytes()).await.is_err() {
                                break;
                            }
                            let _ = write_half.flush().await;
                        }
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
                _ = drop_connections.notified() => {
                    break;
                }
                _ = shutdown.notified() => {
                    break;
                }
            }
        }

        let _ = write_half.shutdown().await;
    }

    /// Get the event stream URL for this server
    pub fn url(&self) -> String {
        format!("http://{}/api/matches/events", self.addr)
    }

    /// Push raw SSE text to every open connection
    pub fn send(&self, frame: impl Into<String>) {
        let _ = self.frames.send(frame.into());
    }

    /// Close every open response (simulates a server-side drop)
    pub fn drop_connections(&self) {
        self.drop_connections.notify_waiters();
    }

    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// `Last-Event-ID` header of each request, in arrival order
    pub fn last_event_ids(&self) -> Vec<Option<String>> {
        self.last_event_ids.lock().clone()
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockSseServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
