//! 视图层：会话通过注入的 `SpeakView` 更新界面，而不是直接查找界面元素。
//!
//! # View
//!
//! The session never reaches for interface elements itself; everything it
//! wants to show goes through a [`SpeakView`] handed to it at construction.
//! The optional meters are described by [`Affordances`] so a view without a
//! progress bar simply never receives a bar value.

mod console;
mod recording;

pub use console::ConsoleView;
pub use recording::{RecordingView, ViewSnapshot};

use crate::guard::MeterDisplay;
use crate::media::Download;
use serde::{Deserialize, Serialize};

/// Label of the trigger while idle.
pub const IDLE_LABEL: &str = "Speak";
/// Label of the trigger while a request is in flight.
pub const BUSY_LABEL: &str = "Synthesizing...";

/// The interface surface the session drives.
///
/// Errors and limit notices share one region: showing either replaces
/// whatever was there, and `clear_error` empties it.
pub trait SpeakView: Send + Sync {
    fn show_error(&self, message: &str);

    fn show_notice(&self, message: &str);

    fn clear_error(&self);

    fn render_meters(&self, display: &MeterDisplay);

    /// Busy disables the trigger and shows the spinner; `label` is the trigger text.
    fn set_busy(&self, busy: bool, label: &str);

    fn show_download(&self, download: &Download);

    fn hide_download(&self);
}

/// Optional meters present in the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Affordances {
    pub word_meter: bool,
    pub char_meter: bool,
    pub progress_bar: bool,
}

impl Affordances {
    pub fn all() -> Self {
        Self {
            word_meter: true,
            char_meter: true,
            progress_bar: true,
        }
    }

    pub fn none() -> Self {
        Self {
            word_meter: false,
            char_meter: false,
            progress_bar: false,
        }
    }

    pub fn with_word_meter(mut self, present: bool) -> Self {
        self.word_meter = present;
        self
    }

    pub fn with_char_meter(mut self, present: bool) -> Self {
        self.char_meter = present;
        self
    }

    pub fn with_progress_bar(mut self, present: bool) -> Self {
        self.progress_bar = present;
        self
    }
}

impl Default for Affordances {
    fn default() -> Self {
        Self::all()
    }
}
