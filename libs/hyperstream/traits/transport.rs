use crate::traits::headers::HeaderProvider;
use crate::{Result, StreamError};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{HeaderName, HeaderValue, ACCEPT, CACHE_CONTROL};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Raw body chunks of an open stream
///
/// The stream ending (`None`) or yielding `Err` both count as a dropped
/// connection.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

/// Parameters for one connection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub url: String,
    /// Last SSE `id` seen on a previous connection, replayed as `Last-Event-ID`
    pub last_event_id: Option<String>,
}

/// Opens the long-lived stream
///
/// One call per connection attempt. Implementations must not retry on
/// their own; the client owns the reconnection policy.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn open(&self, request: &OpenRequest) -> Result<ByteStream>;
}

/// reqwest-backed transport for `text/event-stream` endpoints
pub struct HttpTransport {
    client: reqwest::Client,
    headers: Option<Arc<dyn HeaderProvider>>,
}

impl HttpTransport {
    /// Default TCP/TLS connect timeout. The body itself has no timeout.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new() -> Result<Self> {
        Self::with_connect_timeout(Self::DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_connect_timeout(connect_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| StreamError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            headers: None,
        })
    }

    /// Use an existing reqwest client (shares its connection pool)
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            headers: None,
        }
    }

    pub fn headers(mut self, provider: Arc<dyn HeaderProvider>) -> Self {
        self.headers = Some(provider);
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(&self, request: &OpenRequest) -> Result<ByteStream> {
        let mut builder = self
            .client
            .get(&request.url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");

        if let Some(last_id) = request.last_event_id.as_deref().filter(|id| !id.is_empty()) {
            builder = builder.header("Last-Event-ID", last_id);
        }

        if let Some(ref provider) = self.headers {
            for (key, value) in provider.get_headers().await {
                match (key.parse::<HeaderName>(), value.parse::<HeaderValue>()) {
                    (Ok(name), Ok(value)) => {
                        builder = builder.header(name, value);
                    }
                    (Err(_), _) => warn!("Invalid header name: {}", key),
                    (_, Err(_)) => warn!("Invalid header value for key '{}'", key),
                }
            }
        }

        let response = builder
            .send()
            .await
            .map_err(|e| StreamError::Transport(format!("Failed to open event stream: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StreamError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.starts_with("text/event-stream") {
            warn!("Unexpected content type for event stream: '{}'", content_type);
        }

        debug!("Event stream response {} from {}", status, request.url);

        let stream = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| StreamError::Transport(format!("Stream error: {}", e)))
            })
            .boxed();

        Ok(stream)
    }
}
