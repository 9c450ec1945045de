//! Terminal view used by the CLI.

use super::SpeakView;
use crate::guard::MeterDisplay;
use crate::media::Download;

/// Prints errors and notices to stderr and progress to stdout.
#[derive(Debug, Default, Clone)]
pub struct ConsoleView {
    quiet: bool,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress meters and progress; errors are still printed.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

impl SpeakView for ConsoleView {
    fn show_error(&self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn show_notice(&self, message: &str) {
        eprintln!("note: {}", message);
    }

    fn clear_error(&self) {}

    fn render_meters(&self, display: &MeterDisplay) {
        if self.quiet {
            return;
        }
        let mut parts = Vec::new();
        if let Some(words) = &display.words_label {
            parts.push(words.clone());
        }
        if let Some(chars) = &display.chars_label {
            parts.push(chars.clone());
        }
        if let Some(pct) = display.bar_percent {
            let filled = (pct as usize) / 5;
            parts.push(format!("[{}{}] {}%", "#".repeat(filled), "-".repeat(20 - filled), pct));
        }
        if !parts.is_empty() {
            println!("{}", parts.join("  "));
        }
    }

    fn set_busy(&self, busy: bool, label: &str) {
        if busy && !self.quiet {
            println!("{}", label);
        }
    }

    fn show_download(&self, download: &Download) {
        if !self.quiet {
            println!("ready: {}", download.file_name);
        }
    }

    fn hide_download(&self) {}
}
