pub mod states;

use crate::client::EventStreamClient;
use crate::config::StreamConfig;
use crate::traits::*;
use states::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Type-state builder for EventStreamClient
///
/// The URL and the decoder are required; everything else has a default:
/// - transport: [`HttpTransport`] with a 10s connect timeout
/// - reconnection: [`FixedDelay::default()`] (3s, 5 attempts)
/// - initial connect delay: 3s (only used by `connect_delayed()`)
pub struct EventStreamClientBuilder<U, Ds, D>
where
    U: UrlState,
    Ds: DecoderState,
{
    _state: TypeState<U, Ds>,
    url: Option<String>,
    decoder: Option<D>,
    transport: Option<Arc<dyn Transport>>,
    headers: Option<Arc<dyn HeaderProvider>>,
    connect_timeout: Duration,
    reconnect_strategy: Option<Box<dyn ReconnectionStrategy>>,
    initial_connect_delay: Duration,
    resume_from_last_id: bool,
}

impl EventStreamClientBuilder<NoUrl, NoDecoder, ()> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: TypeState::new(),
            url: None,
            decoder: None,
            transport: None,
            headers: None,
            connect_timeout: HttpTransport::DEFAULT_CONNECT_TIMEOUT,
            reconnect_strategy: None,
            initial_connect_delay: StreamConfig::DEFAULT_INITIAL_CONNECT_DELAY,
            resume_from_last_id: true,
        }
    }
}

impl Default for EventStreamClientBuilder<NoUrl, NoDecoder, ()> {
    fn default() -> Self {
        Self::new()
    }
}

// URL setting
impl<Ds, D> EventStreamClientBuilder<NoUrl, Ds, D>
where
    Ds: DecoderState,
{
    pub fn url(self, url: impl Into<String>) -> EventStreamClientBuilder<HasUrl, Ds, D> {
        EventStreamClientBuilder {
            _state: TypeState::new(),
            url: Some(url.into()),
            decoder: self.decoder,
            transport: self.transport,
            headers: self.headers,
            connect_timeout: self.connect_timeout,
            reconnect_strategy: self.reconnect_strategy,
            initial_connect_delay: self.initial_connect_delay,
            resume_from_last_id: self.resume_from_last_id,
        }
    }
}

// Decoder setting
impl<U> EventStreamClientBuilder<U, NoDecoder, ()>
where
    U: UrlState,
{
    pub fn decoder<NewD>(self, decoder: NewD) -> EventStreamClientBuilder<U, HasDecoder, NewD>
    where
        NewD: EventDecoder,
    {
        EventStreamClientBuilder {
            _state: TypeState::new(),
            url: self.url,
            decoder: Some(decoder),
            transport: self.transport,
            headers: self.headers,
            connect_timeout: self.connect_timeout,
            reconnect_strategy: self.reconnect_strategy,
            initial_connect_delay: self.initial_connect_delay,
            resume_from_last_id: self.resume_from_last_id,
        }
    }
}

// Optional settings, available in any state
impl<U, Ds, D> EventStreamClientBuilder<U, Ds, D>
where
    U: UrlState,
    Ds: DecoderState,
{
    /// Use a custom transport instead of [`HttpTransport`]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Headers for the default HTTP transport
    pub fn headers(mut self, provider: Arc<dyn HeaderProvider>) -> Self {
        self.headers = Some(provider);
        self
    }

    /// Connect timeout for the default HTTP transport
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn reconnect_strategy<S>(mut self, strategy: S) -> Self
    where
        S: ReconnectionStrategy + 'static,
    {
        self.reconnect_strategy = Some(Box::new(strategy));
        self
    }

    pub fn initial_connect_delay(mut self, delay: Duration) -> Self {
        self.initial_connect_delay = delay;
        self
    }

    /// Send `Last-Event-ID` on reconnection (default: true)
    pub fn resume_from_last_id(mut self, enabled: bool) -> Self {
        self.resume_from_last_id = enabled;
        self
    }
}

impl<D> EventStreamClientBuilder<HasUrl, HasDecoder, D>
where
    D: EventDecoder,
{
    /// Build the client
    ///
    /// Must be called from within a Tokio runtime; the client spawns its
    /// connection and timer tasks on it. Nothing connects until `connect()`.
    pub fn build(self) -> crate::Result<EventStreamClient<D>> {
        let url = self
            .url
            .ok_or_else(|| StreamError::Configuration("URL is required".into()))?;
        let decoder = self
            .decoder
            .ok_or_else(|| StreamError::Configuration("Decoder is required".into()))?;

        let parsed = reqwest::Url::parse(&url)
            .map_err(|e| StreamError::Configuration(format!("Invalid URL '{}': {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StreamError::Configuration(format!(
                "Unsupported URL scheme '{}' (expected http or https)",
                parsed.scheme()
            )));
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            StreamError::Configuration("EventStreamClient must be built inside a Tokio runtime".into())
        })?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => {
                if self.headers.is_some() {
                    warn!("Header provider ignored: a custom transport was supplied");
                }
                transport
            }
            None => {
                let mut http = HttpTransport::with_connect_timeout(self.connect_timeout)?;
                if let Some(headers) = self.headers {
                    http = http.headers(headers);
                }
                Arc::new(http)
            }
        };

        let config = StreamConfig {
            url,
            transport,
            reconnect_strategy: self
                .reconnect_strategy
                .unwrap_or_else(|| Box::new(FixedDelay::default())),
            initial_connect_delay: self.initial_connect_delay,
            resume_from_last_id: self.resume_from_last_id,
        };

        Ok(EventStreamClient::new(config, decoder, runtime))
    }
}
