use crate::config::StreamConfig;
use crate::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState};
use crate::sse::{SseDecoder, SseFrame};
use crate::traits::*;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use futures::StreamExt;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Lifecycle events kept before the oldest ones are dropped
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Lifecycle notifications from the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Stream opened
    Connected,
    /// Stream closed, failed to open, or torn down
    Disconnected,
    /// Retry scheduled (attempt number, 1-based)
    Reconnecting(usize),
    /// Retry budget spent; no further automatic attempts
    RetriesExhausted(usize),
    /// Transport error that caused a disconnection
    Error(String),
}

/// Client metrics snapshot
#[derive(Debug, Clone)]
pub struct Metrics {
    pub frames_received: u64,
    pub events_dispatched: u64,
    pub frames_ignored: u64,
    pub decode_errors: u64,
    pub reconnect_count: u64,
    pub connection_state: ConnectionState,
}

/// Connection state plus the most recent decoded event
#[derive(Debug, Clone)]
pub struct StreamStatus<E> {
    pub state: ConnectionState,
    pub last_event: Option<E>,
}

/// Background tasks owned by the client. Every field is cancelled on teardown.
#[derive(Default)]
struct Tasks {
    delayed_connect: Option<JoinHandle<()>>,
    connection: Option<JoinHandle<()>>,
    retry: Option<JoinHandle<()>>,
}

impl Tasks {
    fn cancel_all(&mut self) -> bool {
        let mut cancelled = false;
        for handle in [
            self.delayed_connect.take(),
            self.connection.take(),
            self.retry.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
            cancelled = true;
        }
        cancelled
    }
}

/// Server-Sent-Events client with bounded reconnection
///
/// - At most one transport at a time: `connect()` is a no-op while
///   connecting or connected
/// - One handler slot; `on_event` swaps it without touching the connection
/// - Failed or dropped connections are retried per the reconnection
///   strategy, then the client settles in `Disconnected`
/// - Dropping the client cancels the delayed connect, the connection and
///   any pending retry
///
/// Lifecycle events queue up to [`EVENT_QUEUE_CAPACITY`]; once full the
/// oldest are dropped, so a caller that never drains only loses history.
///
/// Every scheduled task carries the connection generation it was created
/// for; `connect()`/`disconnect()` bump the generation so late timers and
/// stale connections become no-ops.
///
/// # Type Parameters
/// - `D`: EventDecoder implementation
pub struct EventStreamClient<D>
where
    D: EventDecoder,
{
    inner: Arc<Inner<D>>,
    /// Lifecycle event receiver
    event_rx: Receiver<ClientEvent>,
}

struct Inner<D>
where
    D: EventDecoder,
{
    config: StreamConfig,
    decoder: D,
    runtime: Handle,
    state: AtomicConnectionState,
    metrics: AtomicMetrics,
    handler: RwLock<Option<EventHandler<D::Event>>>,
    last_event: RwLock<Option<D::Event>>,
    last_event_id: RwLock<Option<String>>,
    /// Retries scheduled since the last successful open
    reconnect_attempt: AtomicUsize,
    /// Only modified while holding `tasks`
    generation: AtomicU64,
    tasks: Mutex<Tasks>,
    event_tx: Sender<ClientEvent>,
    /// Used to evict the oldest lifecycle event when the queue is full
    overflow_rx: Receiver<ClientEvent>,
}

impl<D> EventStreamClient<D>
where
    D: EventDecoder,
{
    /// Create a new client from configuration
    ///
    /// This is called by the builder's `build()` method.
    /// Use `hyperstream::builder()` to create a client.
    pub(crate) fn new(config: StreamConfig, decoder: D, runtime: Handle) -> Self {
        let (event_tx, event_rx) = bounded(EVENT_QUEUE_CAPACITY);

        let inner = Arc::new(Inner {
            config,
            decoder,
            runtime,
            state: AtomicConnectionState::new(ConnectionState::Disconnected),
            metrics: AtomicMetrics::new(),
            handler: RwLock::new(None),
            last_event: RwLock::new(None),
            last_event_id: RwLock::new(None),
            reconnect_attempt: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            tasks: Mutex::new(Tasks::default()),
            event_tx,
            overflow_rx: event_rx.clone(),
        });

        Self { inner, event_rx }
    }

    /// Open the stream
    ///
    /// No-op while connecting or connected. Otherwise closes any stale
    /// connection, cancels a pending retry, resets the retry budget and
    /// opens a fresh connection. Safe to call again after the retry
    /// budget is exhausted.
    pub fn connect(&self) {
        self.inner.connect();
    }

    /// Arm a cancellable connect after `delay`
    pub fn connect_after(&self, delay: Duration) {
        self.inner.connect_after(delay);
    }

    /// Arm a connect after the configured initial connect delay
    pub fn connect_delayed(&self) {
        self.inner.connect_after(self.inner.config.initial_connect_delay);
    }

    /// Close the stream and cancel every pending timer
    ///
    /// No automatic reconnection happens until `connect()` is called again.
    pub fn disconnect(&self) {
        self.inner.teardown("disconnect requested");
    }

    /// Current state and the last decoded event
    pub fn status(&self) -> StreamStatus<D::Event> {
        StreamStatus {
            state: self.inner.state.get(),
            last_event: self.inner.last_event.read().clone(),
        }
    }

    /// Get current connection state
    #[inline]
    pub fn connection_state(&self) -> ConnectionState {
        self.inner.state.get()
    }

    /// Check if connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.inner.state.is_connected()
    }

    /// Retries scheduled since the last successful open
    pub fn reconnect_attempts(&self) -> usize {
        self.inner.reconnect_attempt.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &StreamConfig {
        &self.inner.config
    }

    /// Get current metrics
    pub fn metrics(&self) -> Metrics {
        let metrics = &self.inner.metrics;
        Metrics {
            frames_received: metrics.frames_received(),
            events_dispatched: metrics.events_dispatched(),
            frames_ignored: metrics.frames_ignored(),
            decode_errors: metrics.decode_errors(),
            reconnect_count: metrics.reconnect_count(),
            connection_state: self.inner.state.get(),
        }
    }

    /// Receive a lifecycle event, blocking for at most `timeout`
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drain every queued lifecycle event
    pub fn drain_events(&self) -> Vec<ClientEvent> {
        self.event_rx.try_iter().collect()
    }
}

impl<D> EventSource<D::Event> for EventStreamClient<D>
where
    D: EventDecoder,
{
    fn on_event(&self, handler: EventHandler<D::Event>) {
        *self.inner.handler.write() = Some(handler);
        debug!("[Live Stream] Event handler replaced");
    }
}

impl<D> Drop for EventStreamClient<D>
where
    D: EventDecoder,
{
    fn drop(&mut self) {
        self.inner.teardown("client dropped");
    }
}

impl<D> Inner<D>
where
    D: EventDecoder,
{
    #[inline]
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    fn emit(&self, event: ClientEvent) {
        if let Err(TrySendError::Full(event)) = self.event_tx.try_send(event) {
            let _ = self.overflow_rx.try_recv();
            let _ = self.event_tx.try_send(event);
        }
    }

    fn connect(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock();

        let state = self.state.get();
        if state.is_active() {
            debug!("[Live Stream] connect() ignored, already {}", state);
            return;
        }

        self.reconnect_attempt.store(0, Ordering::Release);
        self.open_locked(&mut tasks);
    }

    fn connect_after(self: &Arc<Self>, delay: Duration) {
        let mut tasks = self.tasks.lock();

        if self.state.is_active() {
            debug!("[Live Stream] Delayed connect ignored, already {}", self.state.get());
            return;
        }

        if let Some(previous) = tasks.delayed_connect.take() {
            previous.abort();
        }

        let generation = self.generation.load(Ordering::Acquire);
        let inner = Arc::clone(self);
        tasks.delayed_connect = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            inner.fire_delayed_connect(generation);
        }));

        debug!("[Live Stream] Connect armed in {:?}", delay);
    }

    fn fire_delayed_connect(self: &Arc<Self>, generation: u64) {
        let mut tasks = self.tasks.lock();

        if !self.is_current(generation) {
            debug!("[Live Stream] Stale delayed connect ignored");
            return;
        }

        // Detach our own handle so open_locked doesn't abort this task
        tasks.delayed_connect.take();

        if self.state.is_active() {
            return;
        }

        self.reconnect_attempt.store(0, Ordering::Release);
        self.open_locked(&mut tasks);
    }

    /// Replace whatever is running with a fresh connection attempt
    fn open_locked(self: &Arc<Self>, tasks: &mut Tasks) {
        if tasks.cancel_all() {
            debug!("[Live Stream] Closed stale connection and pending timers");
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.state.set(ConnectionState::Connecting);

        let inner = Arc::clone(self);
        tasks.connection = Some(self.runtime.spawn(async move {
            inner.run_connection(generation).await;
        }));
    }

    async fn run_connection(self: Arc<Self>, generation: u64) {
        let request = OpenRequest {
            url: self.config.url.clone(),
            last_event_id: if self.config.resume_from_last_id {
                self.last_event_id.read().clone()
            } else {
                None
            },
        };

        debug!("[Live Stream] Opening {}", request.url);

        let stream = match self.config.transport.open(&request).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("[Live Stream] Failed to connect: {}", e);
                self.handle_failure(generation, e);
                return;
            }
        };

        if !self.mark_open(generation) {
            return;
        }

        if let Some(e) = self.read_stream(generation, stream).await {
            warn!("[Live Stream] Connection lost: {}", e);
            self.handle_failure(generation, e);
        }
    }

    fn mark_open(&self, generation: u64) -> bool {
        let _tasks = self.tasks.lock();

        if !self.is_current(generation) {
            debug!("[Live Stream] Discarding stream opened by a stale attempt");
            return false;
        }

        self.state.set(ConnectionState::Connected);
        self.reconnect_attempt.store(0, Ordering::Release);
        info!("[Live Stream] Connected to {}", self.config.url);
        self.emit(ClientEvent::Connected);
        true
    }

    /// Pump frames until the stream fails. Returns `None` if superseded.
    async fn read_stream(&self, generation: u64, mut stream: ByteStream) -> Option<StreamError> {
        let mut sse = SseDecoder::resuming(self.last_event_id.read().clone());

        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(bytes) => {
                    for frame in sse.feed(&bytes) {
                        if !self.is_current(generation) {
                            return None;
                        }
                        self.dispatch_frame(frame);
                    }
                    if self.is_current(generation) {
                        *self.last_event_id.write() = sse.last_event_id().map(str::to_owned);
                    }
                }
                Err(e) => {
                    return self.is_current(generation).then_some(e);
                }
            }
        }

        self.is_current(generation)
            .then(|| StreamError::ConnectionClosed("event stream ended".into()))
    }

    fn dispatch_frame(&self, frame: SseFrame) {
        self.metrics.increment_frames();

        match self.decoder.decode(&frame) {
            Ok(Decoded::Event(event)) => {
                *self.last_event.write() = Some(event.clone());

                // Clone out of the lock so the handler may replace itself
                let handler = self.handler.read().clone();
                match handler {
                    Some(handler) => {
                        handler(&event);
                        self.metrics.increment_dispatched();
                    }
                    None => debug!("[Live Stream] No handler registered for {:?}", event),
                }
            }
            Ok(Decoded::Ignored(kind)) => {
                self.metrics.increment_ignored();
                debug!("[Live Stream] Ignoring unknown event kind '{}'", kind);
            }
            Err(e) => {
                self.metrics.increment_decode_errors();
                warn!(
                    "[Live Stream] Dropping malformed '{}' frame: {}",
                    frame.event_name(),
                    e
                );
            }
        }
    }

    fn handle_failure(self: &Arc<Self>, generation: u64, error: StreamError) {
        let mut tasks = self.tasks.lock();

        if !self.is_current(generation) {
            debug!("[Live Stream] Ignoring failure of stale connection: {}", error);
            return;
        }

        // This runs on the connection task itself; detach instead of aborting
        tasks.connection.take();

        self.state.set(ConnectionState::Disconnected);
        self.emit(ClientEvent::Error(error.to_string()));
        self.emit(ClientEvent::Disconnected);

        let attempt = self.reconnect_attempt.load(Ordering::Acquire);
        match self.config.reconnect_strategy.next_delay(attempt) {
            Some(delay) => {
                let next = attempt + 1;
                self.reconnect_attempt.store(next, Ordering::Release);
                self.metrics.increment_reconnects();
                self.state.set(ConnectionState::Reconnecting);

                info!("[Live Stream] Reconnecting in {:?} (attempt {})", delay, next);
                self.emit(ClientEvent::Reconnecting(next));

                let inner = Arc::clone(self);
                tasks.retry = Some(self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    inner.fire_retry(generation);
                }));
            }
            None => {
                warn!(
                    "[Live Stream] Reconnection budget exhausted after {} attempts, staying disconnected",
                    attempt
                );
                self.emit(ClientEvent::RetriesExhausted(attempt));
            }
        }
    }

    fn fire_retry(self: &Arc<Self>, generation: u64) {
        let mut tasks = self.tasks.lock();

        if !self.is_current(generation) {
            debug!("[Live Stream] Stale retry timer ignored");
            return;
        }

        tasks.retry.take();

        if self.state.is_active() {
            return;
        }

        self.open_locked(&mut tasks);
    }

    fn teardown(&self, reason: &str) {
        let mut tasks = self.tasks.lock();

        self.generation.fetch_add(1, Ordering::AcqRel);
        let previous = self.state.replace(ConnectionState::ShuttingDown);
        let cancelled = tasks.cancel_all();
        self.state.set(ConnectionState::Disconnected);

        if previous != ConnectionState::Disconnected || cancelled {
            info!("[Live Stream] Disconnected ({})", reason);
            self.emit(ClientEvent::Disconnected);
        }
    }
}
