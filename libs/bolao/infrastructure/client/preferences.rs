//! Notification preferences endpoint

use crate::application::notifications::PreferencesLoader;
use crate::domain::PreferencesResponse;
use crate::infrastructure::config::LiveConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Loads preferences with `GET {base_url}{preferences_path}`
pub struct HttpPreferencesLoader {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpPreferencesLoader {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Self::DEFAULT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
            token,
        })
    }

    pub fn from_config(config: &LiveConfig) -> Result<Self> {
        Self::new(config.preferences_url(), config.auth_token.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PreferencesLoader for HttpPreferencesLoader {
    async fn load(&self) -> Result<PreferencesResponse> {
        debug!("[Notifications] Fetching preferences from {}", self.url);

        let mut request = self.client.get(&self.url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to request notification preferences")?
            .error_for_status()
            .context("Preferences endpoint returned an error status")?;

        response
            .json::<PreferencesResponse>()
            .await
            .context("Failed to parse notification preferences")
    }
}
