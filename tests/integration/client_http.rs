//! HTTP behaviour of the speak client against a mock endpoint

use crate::integration::mock_server::{MockServerFixture, SPEAK_PATH};
use speak_client::{AudioFormat, Error, SpeakClient, SpeakRequest};

#[tokio::test]
async fn test_success_returns_audio_and_declared_type() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture.mock_audio("audio/wav", b"RIFFfake").await;

    let audio = fixture
        .client()
        .speak(&SpeakRequest::new("hello", AudioFormat::Wav))
        .await
        .expect("speak");

    mock.assert_async().await;
    assert_eq!(&audio.data[..], b"RIFFfake");
    assert_eq!(audio.content_type, "audio/wav");
    assert_eq!(audio.download_extension(), "wav");
}

#[tokio::test]
async fn test_request_body_carries_text_and_format() {
    let fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_audio_for(
            serde_json::json!({"text": "read this", "format": "mp3"}),
            "audio/mpeg",
        )
        .await;

    let audio = fixture
        .client()
        .speak(&SpeakRequest::new("read this", AudioFormat::Mp3))
        .await
        .expect("speak");

    mock.assert_async().await;
    assert_eq!(audio.download_extension(), "mp3");
}

#[tokio::test]
async fn test_server_error_reports_status_and_body() {
    let fixture = MockServerFixture::new().await;
    let _mock = fixture.mock_error(500, "boom").await;

    let err = fixture
        .client()
        .speak(&SpeakRequest::new("hello", AudioFormat::Mp3))
        .await
        .expect_err("should fail");

    assert!(matches!(err, Error::Remote { status: 500, .. }));
    let msg = err.user_message();
    assert!(msg.contains("500"), "{}", msg);
    assert!(msg.contains("boom"), "{}", msg);
}

#[tokio::test]
async fn test_server_error_body_is_truncated() {
    let fixture = MockServerFixture::new().await;
    let body = "x".repeat(1000);
    let _mock = fixture.mock_error(503, &body).await;

    let err = fixture
        .client()
        .speak(&SpeakRequest::new("hello", AudioFormat::Mp3))
        .await
        .expect_err("should fail");

    match err {
        Error::Remote { status, excerpt } => {
            assert_eq!(status, 503);
            assert_eq!(excerpt.len(), 300);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_api_key_is_sent_as_bearer_token() {
    let fixture = MockServerFixture::new().await;
    let mock = {
        let mut server = fixture.server.lock().await;
        server
            .mock("POST", SPEAK_PATH)
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body("ID3")
            .create_async()
            .await
    };

    let client = SpeakClient::builder()
        .base_url(&fixture.base_url)
        .api_key("secret-token")
        .build()
        .expect("client");
    client
        .speak(&SpeakRequest::new("hi", AudioFormat::Mp3))
        .await
        .expect("speak");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let client = SpeakClient::builder()
        .base_url("http://127.0.0.1:1")
        .build()
        .expect("client");
    let err = client
        .speak(&SpeakRequest::new("hi", AudioFormat::Mp3))
        .await
        .expect_err("should fail");
    assert!(matches!(err, Error::Transport { .. }));
}
