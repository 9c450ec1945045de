//! TTS (Text-to-Speech) types.

use crate::Error;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output formats the synthesis endpoint can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Opus,
    Aac,
    Flac,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Opus => "opus",
            Self::Aac => "aac",
            Self::Flac => "flac",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Opus => "audio/opus",
            Self::Aac => "audio/aac",
            Self::Flac => "audio/flac",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp3" | "mpeg" => Ok(Self::Mp3),
            "wav" | "wave" => Ok(Self::Wav),
            "opus" => Ok(Self::Opus),
            "aac" => Ok(Self::Aac),
            "flac" => Ok(Self::Flac),
            other => Err(Error::configuration(format!(
                "unsupported audio format '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of `POST /api/speak`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeakRequest {
    pub text: String,
    pub format: AudioFormat,
}

impl SpeakRequest {
    pub fn new(text: impl Into<String>, format: AudioFormat) -> Self {
        Self {
            text: text.into(),
            format,
        }
    }
}

/// Audio returned by a successful synthesis.
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub data: Bytes,
    /// `Content-Type` declared by the server; empty when absent.
    pub content_type: String,
}

impl AudioPayload {
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }

    /// File extension for downloads: `wav` if the declared type mentions wav, `mp3` otherwise.
    pub fn download_extension(&self) -> &'static str {
        if self.content_type.to_ascii_lowercase().contains("wav") {
            "wav"
        } else {
            "mp3"
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
