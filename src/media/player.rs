//! Playback element abstraction.

use super::AudioRef;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// The element synthesized audio is attached to.
#[async_trait]
pub trait MediaElement: Send + Sync {
    /// Stop playback and detach the current source.
    fn reset(&self);

    fn set_source(&self, audio: &AudioRef) -> Result<()>;

    /// URL of the attached source, if any.
    fn source(&self) -> Option<String>;

    /// Resolve once enough is buffered to play through.
    async fn wait_until_ready(&self) -> Result<()>;

    async fn play(&self) -> Result<()>;
}

/// Element with no output device: always ready, playback is only counted.
#[derive(Debug, Default)]
pub struct HeadlessPlayer {
    source: Mutex<Option<String>>,
    reject_play: bool,
    plays: AtomicUsize,
    resets: AtomicUsize,
}

impl HeadlessPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `play` fail, like a blocked autoplay.
    pub fn rejecting_playback() -> Self {
        Self {
            reject_play: true,
            ..Self::default()
        }
    }

    pub fn plays(&self) -> usize {
        self.plays.load(Ordering::SeqCst)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaElement for HeadlessPlayer {
    fn reset(&self) {
        if let Ok(mut src) = self.source.lock() {
            *src = None;
        }
        self.resets.fetch_add(1, Ordering::SeqCst);
    }

    fn set_source(&self, audio: &AudioRef) -> Result<()> {
        if let Ok(mut src) = self.source.lock() {
            *src = Some(audio.url().to_string());
        }
        Ok(())
    }

    fn source(&self) -> Option<String> {
        self.source.lock().ok().and_then(|s| s.clone())
    }

    async fn wait_until_ready(&self) -> Result<()> {
        if self.source().is_none() {
            return Err(Error::playback("no source attached"));
        }
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        if self.reject_play {
            return Err(Error::playback("playback was not allowed to start"));
        }
        self.plays.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
