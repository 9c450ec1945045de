//! 媒体模块：可撤销的音频引用、播放元素抽象和下载信息。
//!
//! # Media
//!
//! - [`ObjectUrls`] issues revocable [`AudioRef`]s for synthesized audio.
//! - [`MediaElement`] is the playback element the session attaches audio to.
//! - [`Download`] names the file offered for saving.

mod object_url;
mod player;
#[cfg(feature = "playback")]
mod speaker;

pub use object_url::{AudioRef, ObjectUrls};
pub use player::{HeadlessPlayer, MediaElement};
#[cfg(feature = "playback")]
pub use speaker::SpeakerPlayer;

use std::time::{SystemTime, UNIX_EPOCH};

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Download affordance for the current audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Object URL of the audio; same reference the player uses.
    pub url: String,
    pub file_name: String,
}

impl Download {
    /// Name the download `tts-<unix millis>.<ext>` after the audio's declared type.
    pub fn for_audio(audio: &AudioRef) -> Self {
        Self::for_audio_at(audio, unix_millis())
    }

    pub fn for_audio_at(audio: &AudioRef, millis: u128) -> Self {
        Self {
            url: audio.url().to_string(),
            file_name: format!("tts-{}.{}", millis, audio.payload().download_extension()),
        }
    }
}
