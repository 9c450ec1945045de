//! In-memory view that records what the session asked it to show.

use super::{SpeakView, IDLE_LABEL};
use crate::guard::MeterDisplay;
use crate::media::Download;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot {
    /// Content of the shared error/notice region, if visible.
    pub error: Option<String>,
    pub download: Option<Download>,
    pub busy: bool,
    pub label: String,
    pub meters: MeterDisplay,
    /// Every busy flag change, in order.
    pub busy_history: Vec<bool>,
    /// Every error (not notice) shown, in order.
    pub errors_shown: Vec<String>,
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self {
            error: None,
            download: None,
            busy: false,
            label: IDLE_LABEL.to_string(),
            meters: MeterDisplay::default(),
            busy_history: Vec::new(),
            errors_shown: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingView {
    state: Mutex<ViewSnapshot>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        match self.state.lock() {
            Ok(st) => st.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut ViewSnapshot)) {
        if let Ok(mut st) = self.state.lock() {
            f(&mut st);
        }
    }
}

impl SpeakView for RecordingView {
    fn show_error(&self, message: &str) {
        self.update(|st| {
            st.error = Some(message.to_string());
            st.errors_shown.push(message.to_string());
        });
    }

    fn show_notice(&self, message: &str) {
        self.update(|st| st.error = Some(message.to_string()));
    }

    fn clear_error(&self) {
        self.update(|st| st.error = None);
    }

    fn render_meters(&self, display: &MeterDisplay) {
        self.update(|st| st.meters = display.clone());
    }

    fn set_busy(&self, busy: bool, label: &str) {
        self.update(|st| {
            st.busy = busy;
            st.label = label.to_string();
            st.busy_history.push(busy);
        });
    }

    fn show_download(&self, download: &Download) {
        self.update(|st| st.download = Some(download.clone()));
    }

    fn hide_download(&self) {
        self.update(|st| st.download = None);
    }
}
