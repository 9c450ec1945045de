//! Synthesis endpoint client.

use super::types::{AudioPayload, SpeakRequest};
use crate::config::SpeakConfig;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::info;

/// Anything that can turn a [`SpeakRequest`] into audio.
///
/// The session only talks to this trait, so tests can swap the HTTP client
/// for a scripted backend.
#[async_trait]
pub trait SynthesisBackend: Send + Sync {
    async fn synthesize(&self, request: &SpeakRequest) -> Result<AudioPayload>;
}

/// HTTP client for `POST /api/speak`.
pub struct SpeakClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    error_excerpt_chars: usize,
}

impl SpeakClient {
    pub fn builder() -> SpeakClientBuilder {
        SpeakClientBuilder::new()
    }

    pub fn from_config(config: &SpeakConfig) -> Result<Self> {
        let mut builder = SpeakClientBuilder::new()
            .base_url(&config.base_url)
            .endpoint_path(&config.endpoint_path)
            .error_excerpt_chars(config.error_excerpt_chars);
        if let Some(key) = &config.api_key {
            builder = builder.api_key(key);
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn speak(&self, request: &SpeakRequest) -> Result<AudioPayload> {
        let start = Instant::now();
        let mut req = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let response = req.send().await.map_err(|e| {
            Error::transport_with_context(
                format!("speak request failed: {}", e),
                ErrorContext::new().with_source("tts"),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            info!(
                http_status = status.as_u16(),
                endpoint = self.endpoint.as_str(),
                duration_ms = start.elapsed().as_millis(),
                "speak request failed"
            );
            return Err(Error::remote(
                status.as_u16(),
                &body,
                self.error_excerpt_chars,
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let data = response.bytes().await.map_err(|e| {
            Error::transport_with_context(
                format!("failed to read audio response: {}", e),
                ErrorContext::new().with_source("tts"),
            )
        })?;

        info!(
            http_status = status.as_u16(),
            bytes = data.len(),
            content_type = content_type.as_str(),
            duration_ms = start.elapsed().as_millis(),
            "speak request completed"
        );
        Ok(AudioPayload { data, content_type })
    }
}

#[async_trait]
impl SynthesisBackend for SpeakClient {
    async fn synthesize(&self, request: &SpeakRequest) -> Result<AudioPayload> {
        self.speak(request).await
    }
}

pub struct SpeakClientBuilder {
    base_url: Option<String>,
    endpoint_path: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    error_excerpt_chars: usize,
}

impl SpeakClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            endpoint_path: None,
            api_key: None,
            timeout: None,
            error_excerpt_chars: crate::config::DEFAULT_ERROR_EXCERPT_CHARS,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = Some(path.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Request timeout. Unset means the request may wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn error_excerpt_chars(mut self, chars: usize) -> Self {
        self.error_excerpt_chars = chars;
        self
    }

    pub fn build(self) -> Result<SpeakClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| crate::config::DEFAULT_BASE_URL.to_string());
        url::Url::parse(&base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base url: {}", e),
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(base_url.clone()),
            )
        })?;
        let endpoint_path = self
            .endpoint_path
            .unwrap_or_else(|| crate::config::DEFAULT_ENDPOINT_PATH.to_string());
        let endpoint_path = if endpoint_path.starts_with('/') {
            endpoint_path
        } else {
            format!("/{}", endpoint_path)
        };

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(SpeakClient {
            http_client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), endpoint_path),
            api_key: self.api_key,
            error_excerpt_chars: self.error_excerpt_chars,
        })
    }
}

impl Default for SpeakClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
