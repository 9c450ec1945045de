//! # speak-client
//!
//! 文字转语音前端：输入字数守卫、合成请求、音频播放与下载。
//!
//! Text-to-speech front end: a word-limited text buffer, one request to a
//! remote synthesis endpoint, and playback/download of the resulting audio.
//!
//! ## Overview
//!
//! Every interface element the front end touches is injected: the synthesis
//! backend ([`tts::SynthesisBackend`]), the playback element
//! ([`media::MediaElement`]) and the view ([`view::SpeakView`]). The
//! [`session::SpeakSession`] ties them together and runs at most one
//! synthesis at a time.
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`guard`] | Word tokenization, limit trimming and meters |
//! | [`tts`] | Request/response types and the HTTP client for `/api/speak` |
//! | [`media`] | Revocable audio references, playback element, downloads |
//! | [`view`] | The injected UI surface and its optional affordances |
//! | [`session`] | Idle/Synthesizing state machine and the trigger procedure |
//! | [`config`] | Defaults, YAML file and environment configuration |

pub mod config;
pub mod guard;
pub mod media;
pub mod session;
pub mod tts;
pub mod view;

pub use config::SpeakConfig;
pub use session::{SpeakSession, TriggerOutcome};
pub use tts::{AudioFormat, AudioPayload, SpeakClient, SpeakRequest};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
