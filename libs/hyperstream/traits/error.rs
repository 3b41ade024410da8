use thiserror::Error;

/// Main error type for hyperstream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Network-level failure while opening or reading the stream
    #[error("Transport error: {0}")]
    Transport(String),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Stream ended or was closed by the peer
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Frame could not be decoded into an event
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Channel send error
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Generic error
    #[error("Error: {0}")]
    Other(String),
}

impl StreamError {
    /// Whether this error is handled by the reconnection policy
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            StreamError::Transport(_) | StreamError::Http { .. } | StreamError::ConnectionClosed(_)
        )
    }
}

/// Result type for hyperstream operations
pub type Result<T> = std::result::Result<T, StreamError>;
