//! Client configuration.
//!
//! Values come from defaults, an optional YAML file and `SPEAK_*` environment
//! variables, in that order of precedence (env wins).

use crate::guard::meter::DEFAULT_WARN_RATIO;
use crate::guard::DEFAULT_WORD_LIMIT;
use crate::tts::AudioFormat;
use crate::view::Affordances;
use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ENDPOINT_PATH: &str = "/api/speak";
pub const DEFAULT_PLAYBACK_DELAY_MS: u64 = 150;
pub const DEFAULT_ERROR_EXCERPT_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeakConfig {
    pub base_url: String,
    pub endpoint_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// No timeout is applied to the request when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    pub word_limit: usize,
    pub warn_ratio: f64,
    pub format: AudioFormat,
    /// Pause between "ready to play through" and starting playback, so the
    /// first frame is not clipped.
    pub playback_delay_ms: u64,
    pub error_excerpt_chars: usize,
    pub affordances: Affordances,
}

impl Default for SpeakConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            api_key: None,
            timeout_secs: None,
            word_limit: DEFAULT_WORD_LIMIT,
            warn_ratio: DEFAULT_WARN_RATIO,
            format: AudioFormat::default(),
            playback_delay_ms: DEFAULT_PLAYBACK_DELAY_MS,
            error_excerpt_chars: DEFAULT_ERROR_EXCERPT_CHARS,
            affordances: Affordances::all(),
        }
    }
}

impl SpeakConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `SPEAK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw).map_err(|e| match e {
            Error::Configuration { message, context } => Error::Configuration {
                message,
                context: context.with_details(path.display().to_string()),
            },
            other => other,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid config file: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(url) = env::var("SPEAK_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(key) = env::var("SPEAK_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(secs) = env::var("SPEAK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout_secs = Some(secs);
        }
        if let Some(limit) = env::var("SPEAK_WORD_LIMIT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            self.word_limit = limit;
        }
        if let Ok(fmt) = env::var("SPEAK_FORMAT") {
            self.format = fmt.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid base url: {}", e),
                ErrorContext::new()
                    .with_field_path("config.base_url")
                    .with_details(self.base_url.clone()),
            )
        })?;
        if self.word_limit == 0 {
            return Err(Error::configuration_with_context(
                "word limit must be positive",
                ErrorContext::new().with_field_path("config.word_limit"),
            ));
        }
        if !(0.0..=1.0).contains(&self.warn_ratio) {
            return Err(Error::configuration_with_context(
                "warn ratio must be between 0 and 1",
                ErrorContext::new()
                    .with_field_path("config.warn_ratio")
                    .with_details(self.warn_ratio.to_string()),
            ));
        }
        Ok(())
    }

    pub fn playback_delay(&self) -> Duration {
        Duration::from_millis(self.playback_delay_ms)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_word_limit(mut self, limit: usize) -> Self {
        self.word_limit = limit;
        self
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_playback_delay(mut self, delay: Duration) -> Self {
        self.playback_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_affordances(mut self, affordances: Affordances) -> Self {
        self.affordances = affordances;
        self
    }
}
