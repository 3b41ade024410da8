use async_trait::async_trait;
use std::collections::HashMap;

/// HTTP headers to send with the stream request
pub type Headers = HashMap<String, String>;

/// Trait for providing HTTP headers dynamically
///
/// Called on every connection and reconnection, so tokens that rotate
/// between attempts are picked up without rebuilding the client.
///
/// # Example
/// ```ignore
/// struct SessionHeaders {
///     session: Arc<RwLock<String>>,
/// }
///
/// #[async_trait::async_trait]
/// impl HeaderProvider for SessionHeaders {
///     async fn get_headers(&self) -> Headers {
///         let mut headers = HashMap::new();
///         headers.insert("X-Session".to_string(), self.session.read().clone());
///         headers
///     }
/// }
/// ```
#[async_trait]
pub trait HeaderProvider: Send + Sync {
    /// Generate headers to send with the stream request
    async fn get_headers(&self) -> Headers;
}

/// `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl HeaderProvider for BearerToken {
    async fn get_headers(&self) -> Headers {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {}", self.0));
        headers
    }
}
