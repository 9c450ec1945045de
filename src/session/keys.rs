//! Keyboard shortcut for triggering synthesis.

/// Which modifier the shortcut uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Cmd+Enter.
    MacLike,
    /// Ctrl+Enter.
    Other,
}

impl Platform {
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &str) -> Self {
        match os.to_ascii_lowercase().as_str() {
            "macos" | "ios" | "darwin" => Platform::MacLike,
            _ => Platform::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Modifier+Enter where the modifier is Cmd on Mac-like platforms and Ctrl elsewhere.
    pub fn is_speak_shortcut(&self, platform: Platform) -> bool {
        let modifier = match platform {
            Platform::MacLike => self.meta,
            Platform::Other => self.ctrl,
        };
        modifier && self.key == Key::Enter
    }
}
