//! 会话：空闲/合成两态机、触发流程、输入处理与快捷键。
//!
//! # Speak Session
//!
//! [`SpeakSession`] owns the text buffer and wires it to an injected
//! [`SynthesisBackend`], [`MediaElement`] and [`SpeakView`]. A trigger runs
//! the whole procedure: reset the previous result, enforce the word limit,
//! request audio, attach and play it, then offer it as a download. Whatever
//! happens, the session ends back in [`SynthesisState::Idle`].
//!
//! ```rust,no_run
//! use speak_client::media::HeadlessPlayer;
//! use speak_client::session::SpeakSession;
//! use speak_client::tts::SpeakClient;
//! use speak_client::view::ConsoleView;
//! use speak_client::SpeakConfig;
//! use std::sync::Arc;
//!
//! # async fn run() -> speak_client::Result<()> {
//! let config = SpeakConfig::from_env()?;
//! let backend = Arc::new(SpeakClient::from_config(&config)?);
//! let session = SpeakSession::new(
//!     config,
//!     backend,
//!     Arc::new(HeadlessPlayer::new()),
//!     Arc::new(ConsoleView::new()),
//! );
//! session.on_input("Hello there.", 12);
//! let outcome = session.trigger().await;
//! # Ok(())
//! # }
//! ```

mod gate;
mod keys;

pub use gate::{SynthesisGate, SynthesisPermit, SynthesisState};
pub use keys::{Key, KeyEvent, Platform};

use crate::config::SpeakConfig;
use crate::guard::{InputBuffer, InputUpdate, MeterReading};
use crate::media::{AudioRef, Download, MediaElement, ObjectUrls};
use crate::tts::{AudioFormat, SpeakRequest, SynthesisBackend};
use crate::view::{SpeakView, BUSY_LABEL, IDLE_LABEL};
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// How a trigger ended.
#[derive(Debug)]
pub enum TriggerOutcome {
    /// A synthesis was already in flight; nothing happened.
    Busy,
    /// Audio was produced and attached; the download is offered.
    Spoken(Download),
    /// The attempt failed; the message is already in the error region.
    Failed(Error),
}

impl TriggerOutcome {
    pub fn is_spoken(&self) -> bool {
        matches!(self, TriggerOutcome::Spoken(_))
    }

    pub fn download(&self) -> Option<&Download> {
        match self {
            TriggerOutcome::Spoken(d) => Some(d),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            TriggerOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Restores the idle look of the trigger when dropped.
struct BusyDisplay<'a> {
    view: &'a dyn SpeakView,
}

impl<'a> BusyDisplay<'a> {
    fn show(view: &'a dyn SpeakView) -> Self {
        view.set_busy(true, BUSY_LABEL);
        Self { view }
    }
}

impl Drop for BusyDisplay<'_> {
    fn drop(&mut self) {
        self.view.set_busy(false, IDLE_LABEL);
    }
}

pub struct SpeakSession {
    config: SpeakConfig,
    backend: Arc<dyn SynthesisBackend>,
    player: Arc<dyn MediaElement>,
    view: Arc<dyn SpeakView>,
    urls: ObjectUrls,
    gate: SynthesisGate,
    input: Mutex<InputBuffer>,
    format: Mutex<AudioFormat>,
    current: Mutex<Option<String>>,
    platform: Platform,
}

impl SpeakSession {
    pub fn new(
        config: SpeakConfig,
        backend: Arc<dyn SynthesisBackend>,
        player: Arc<dyn MediaElement>,
        view: Arc<dyn SpeakView>,
    ) -> Self {
        let input = InputBuffer::new(config.word_limit).with_warn_ratio(config.warn_ratio);
        let session = Self {
            format: Mutex::new(config.format),
            input: Mutex::new(input),
            config,
            backend,
            player,
            view,
            urls: ObjectUrls::new(),
            gate: SynthesisGate::new(),
            current: Mutex::new(None),
            platform: Platform::detect(),
        };
        let reading = session.input().meter();
        session.refresh_meters(&reading);
        info!(word_limit = session.config.word_limit, "speak session ready");
        session
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Share an existing registry instead of the session's own.
    pub fn with_object_urls(mut self, urls: ObjectUrls) -> Self {
        self.urls = urls;
        self
    }

    pub fn config(&self) -> &SpeakConfig {
        &self.config
    }

    pub fn object_urls(&self) -> &ObjectUrls {
        &self.urls
    }

    pub fn state(&self) -> SynthesisState {
        self.gate.state()
    }

    pub fn text(&self) -> String {
        self.input().text().to_string()
    }

    pub fn format(&self) -> AudioFormat {
        *self.format.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn set_format(&self, format: AudioFormat) {
        *self.format.lock().unwrap_or_else(|p| p.into_inner()) = format;
    }

    /// URL of the audio reference currently owned by the session.
    pub fn current_audio(&self) -> Option<String> {
        self.current_slot().clone()
    }

    fn input(&self) -> MutexGuard<'_, InputBuffer> {
        self.input.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn current_slot(&self) -> MutexGuard<'_, Option<String>> {
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Process an edit of the text control; `caret` is in characters.
    pub fn on_input(&self, text: impl Into<String>, caret: usize) -> InputUpdate {
        let update = self.input().on_input(text, caret);
        self.refresh_meters(&update.meter);
        update
    }

    /// Handle a key press. Returns `None` when the key is not the speak shortcut.
    pub async fn on_key(&self, event: &KeyEvent) -> Option<TriggerOutcome> {
        if !event.is_speak_shortcut(self.platform) {
            return None;
        }
        Some(self.trigger().await)
    }

    fn refresh_meters(&self, reading: &MeterReading) {
        self.view
            .render_meters(&reading.display(&self.config.affordances));
        match reading.notice_message() {
            Some(msg) => self.view.show_notice(&msg),
            None => self.view.clear_error(),
        }
    }

    fn release_current(&self) {
        if let Some(url) = self.current_slot().take() {
            if self.urls.revoke(&url) {
                debug!(url = url.as_str(), "released previous audio");
            }
        }
    }

    /// Run one synthesis. A no-op returning [`TriggerOutcome::Busy`] while
    /// another one is in flight.
    pub async fn trigger(&self) -> TriggerOutcome {
        let Some(_permit) = self.gate.try_begin() else {
            return TriggerOutcome::Busy;
        };

        self.view.clear_error();
        self.view.hide_download();
        self.release_current();
        self.player.reset();

        let (text, reading) = {
            let mut input = self.input();
            let reading = input.enforce_limit();
            (input.text().trim().to_string(), reading)
        };
        self.refresh_meters(&reading);
        if text.is_empty() {
            let err = Error::EmptyInput;
            self.view.show_error(&err.user_message());
            return TriggerOutcome::Failed(err);
        }

        let _busy = BusyDisplay::show(self.view.as_ref());
        let request = SpeakRequest::new(text, self.format());
        match self.synthesize_and_play(&request).await {
            Ok(download) => {
                self.view.show_download(&download);
                TriggerOutcome::Spoken(download)
            }
            Err(err) => {
                warn!(error = %err, "synthesis failed");
                self.view.show_error(&err.user_message());
                TriggerOutcome::Failed(err)
            }
        }
    }

    async fn synthesize_and_play(&self, request: &SpeakRequest) -> Result<Download> {
        let payload = self.backend.synthesize(request).await?;
        let audio = self.urls.create(payload);
        *self.current_slot() = Some(audio.url().to_string());

        self.player.set_source(&audio)?;
        self.player.wait_until_ready().await?;
        tokio::time::sleep(self.config.playback_delay()).await;
        if let Err(e) = self.player.play().await {
            warn!(error = %e, "playback did not start; it can be started manually");
        }

        Ok(Download::for_audio(&audio))
    }

    /// Resolve the download's audio while its reference is still live.
    pub fn download_audio(&self, download: &Download) -> Result<AudioRef> {
        self.urls.resolve(&download.url).ok_or_else(|| {
            Error::runtime_with_context(
                "audio reference was already released",
                crate::ErrorContext::new()
                    .with_source("session")
                    .with_details(download.url.clone()),
            )
        })
    }

    /// Write the download into `dir` under its file name.
    pub async fn save_download(&self, download: &Download, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let audio = self.download_audio(download)?;
        let path = dir.as_ref().join(&download.file_name);
        tokio::fs::write(&path, &audio.payload().data).await?;
        info!(path = %path.display(), bytes = audio.payload().len(), "download saved");
        Ok(path)
    }
}
