//! Revocable references to in-memory audio.

use crate::tts::AudioPayload;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

const URL_PREFIX: &str = "blob:speak/";

/// A live handle to registered audio, usable as a playback or download source.
#[derive(Debug, Clone)]
pub struct AudioRef {
    url: String,
    payload: Arc<AudioPayload>,
}

impl AudioRef {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn payload(&self) -> &AudioPayload {
        &self.payload
    }
}

/// Registry of object URLs.
///
/// Clones share the same registry. A revoked URL no longer resolves, though
/// an [`AudioRef`] already handed out keeps its bytes alive until dropped.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrls {
    entries: Arc<Mutex<HashMap<String, Arc<AudioPayload>>>>,
}

impl ObjectUrls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, payload: AudioPayload) -> AudioRef {
        let url = format!("{}{}", URL_PREFIX, uuid::Uuid::new_v4());
        let payload = Arc::new(payload);
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(url.clone(), Arc::clone(&payload));
        }
        debug!(url = url.as_str(), bytes = payload.len(), "object url created");
        AudioRef { url, payload }
    }

    pub fn resolve(&self, url: &str) -> Option<AudioRef> {
        let entries = self.entries.lock().ok()?;
        entries.get(url).map(|payload| AudioRef {
            url: url.to_string(),
            payload: Arc::clone(payload),
        })
    }

    /// Release `url`. Returns false if it was not live.
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self
            .entries
            .lock()
            .map(|mut entries| entries.remove(url).is_some())
            .unwrap_or(false);
        if removed {
            debug!(url, "object url revoked");
        }
        removed
    }

    pub fn is_object_url(url: &str) -> bool {
        url.starts_with(URL_PREFIX)
    }

    pub fn live_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}
