//! Text buffer that enforces the word limit on every edit.

use super::meter::MeterReading;
use super::words::{trim_to_limit, word_count};
use std::borrow::Cow;
use tracing::debug;

/// Result of processing one edit.
#[derive(Debug, Clone, PartialEq)]
pub struct InputUpdate {
    /// Whether the edit pushed the text over the limit and it was cut back.
    pub trimmed: bool,
    /// Caret position after the edit, in characters.
    pub caret: usize,
    pub meter: MeterReading,
}

/// The text control's value and caret.
///
/// Caret offsets are counted in characters, never bytes.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    text: String,
    caret: usize,
    limit: usize,
    warn_ratio: f64,
}

impl InputBuffer {
    pub fn new(limit: usize) -> Self {
        Self {
            text: String::new(),
            caret: 0,
            limit,
            warn_ratio: super::meter::DEFAULT_WARN_RATIO,
        }
    }

    pub fn with_warn_ratio(mut self, ratio: f64) -> Self {
        self.warn_ratio = ratio;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Replace the value after an edit; `caret` is where the edit left the caret.
    pub fn on_input(&mut self, text: impl Into<String>, caret: usize) -> InputUpdate {
        let text = text.into();
        let trimmed = word_count(&text) > self.limit;
        if trimmed {
            let cut = trim_to_limit(&text, self.limit).into_owned();
            debug!(limit = self.limit, "input over word limit, trimming");
            self.text = cut;
        } else {
            self.text = text;
        }
        self.caret = caret.min(self.text.chars().count());
        InputUpdate {
            trimmed,
            caret: self.caret,
            meter: self.meter(),
        }
    }

    /// Apply the limit to the current value, as done right before a request.
    pub fn enforce_limit(&mut self) -> MeterReading {
        let cut = match trim_to_limit(&self.text, self.limit) {
            Cow::Owned(cut) => Some(cut),
            Cow::Borrowed(_) => None,
        };
        if let Some(cut) = cut {
            self.text = cut;
            self.caret = self.caret.min(self.text.chars().count());
        }
        self.meter()
    }

    pub fn meter(&self) -> MeterReading {
        MeterReading::measure_with_ratio(&self.text, self.limit, self.warn_ratio)
    }
}
