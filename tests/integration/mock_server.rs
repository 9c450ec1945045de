//! Mock speak endpoint for integration tests

use mockito::{Matcher, Mock, Server, ServerGuard};
use speak_client::{SpeakClient, SpeakConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const SPEAK_PATH: &str = "/api/speak";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Config pointing at the mock server, without the pre-playback pause
    pub fn config(&self) -> SpeakConfig {
        SpeakConfig::default()
            .with_base_url(&self.base_url)
            .with_playback_delay(Duration::ZERO)
    }

    pub fn client(&self) -> SpeakClient {
        SpeakClient::from_config(&self.config()).expect("client")
    }

    /// Successful synthesis returning `body` with the given content type
    pub async fn mock_audio(&self, content_type: &str, body: &[u8]) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", SPEAK_PATH)
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", content_type)
            .with_body(body)
            .create_async()
            .await
    }

    /// Successful synthesis that only matches the exact JSON request body
    pub async fn mock_audio_for(&self, expected: serde_json::Value, content_type: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", SPEAK_PATH)
            .match_body(Matcher::Json(expected))
            .with_status(200)
            .with_header("content-type", content_type)
            .with_body(b"ID3fake-audio")
            .create_async()
            .await
    }

    /// Non-success response with a text body
    pub async fn mock_error(&self, status: usize, body: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", SPEAK_PATH)
            .with_status(status)
            .with_header("content-type", "text/plain")
            .with_body(body)
            .create_async()
            .await
    }

    /// Any request at all; used to prove nothing was sent
    pub async fn mock_any(&self) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .expect(0)
            .create_async()
            .await
    }
}
