//! Word/character meters and limit notices.

use crate::view::Affordances;
use serde::Serialize;

/// Ratio of the word limit at which the "approaching" notice appears.
pub const DEFAULT_WARN_RATIO: f64 = 0.9;

/// Tri-state notice derived from the word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitNotice {
    /// Below the warning threshold; nothing is shown.
    None,
    /// Between the warning threshold and the limit.
    Approaching,
    /// At or above the limit; the text has been trimmed.
    Trimmed,
}

impl LimitNotice {
    pub fn message(&self, limit: usize) -> Option<String> {
        match self {
            LimitNotice::None => None,
            LimitNotice::Approaching => Some(format!("Approaching {}-word limit.", limit)),
            LimitNotice::Trimmed => Some(format!("Trimmed to {} words.", limit)),
        }
    }
}

/// Snapshot of the meters for one text value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeterReading {
    pub words: usize,
    /// Characters of the text with surrounding whitespace removed.
    pub chars: usize,
    pub limit: usize,
    /// Percentage of the limit used, rounded and capped at 100.
    pub percent: u8,
    pub notice: LimitNotice,
}

/// What the view should render, limited to the affordances it has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeterDisplay {
    pub words_label: Option<String>,
    pub chars_label: Option<String>,
    pub bar_percent: Option<u8>,
}

impl MeterReading {
    pub fn measure(text: &str, limit: usize) -> Self {
        Self::measure_with_ratio(text, limit, DEFAULT_WARN_RATIO)
    }

    pub fn measure_with_ratio(text: &str, limit: usize, warn_ratio: f64) -> Self {
        let words = super::word_count(text);
        let chars = text.trim().chars().count();
        let percent = if limit == 0 {
            100
        } else {
            ((words as f64 / limit as f64) * 100.0).round().min(100.0) as u8
        };
        let notice = if words >= limit {
            LimitNotice::Trimmed
        } else if words as f64 >= limit as f64 * warn_ratio {
            LimitNotice::Approaching
        } else {
            LimitNotice::None
        };
        Self {
            words,
            chars,
            limit,
            percent,
            notice,
        }
    }

    pub fn notice_message(&self) -> Option<String> {
        self.notice.message(self.limit)
    }

    pub fn display(&self, affordances: &Affordances) -> MeterDisplay {
        MeterDisplay {
            words_label: affordances
                .word_meter
                .then(|| format!("{} / {} words", self.words, self.limit)),
            chars_label: affordances
                .char_meter
                .then(|| format!("{} chars", self.chars)),
            bar_percent: affordances.progress_bar.then_some(self.percent),
        }
    }
}
