//! End-to-end trigger procedure: input guard, request, playback, download

use crate::integration::backends::{HeldBackend, ObservingBackend};
use crate::integration::mock_server::MockServerFixture;
use speak_client::media::{HeadlessPlayer, MediaElement, ObjectUrls};
use speak_client::session::{Key, KeyEvent, Platform, SynthesisState};
use speak_client::view::{RecordingView, IDLE_LABEL};
use speak_client::{Error, SpeakSession, TriggerOutcome};
use std::sync::Arc;

fn words(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("w{}", i)).collect()
}

struct Harness {
    fixture: MockServerFixture,
    view: Arc<RecordingView>,
    player: Arc<HeadlessPlayer>,
    session: SpeakSession,
}

async fn harness_with(player: HeadlessPlayer) -> Harness {
    let fixture = MockServerFixture::new().await;
    let view = Arc::new(RecordingView::new());
    let player = Arc::new(player);
    let session = SpeakSession::new(
        fixture.config(),
        Arc::new(fixture.client()),
        player.clone(),
        view.clone(),
    )
    .with_platform(Platform::Other);
    Harness {
        fixture,
        view,
        player,
        session,
    }
}

async fn harness() -> Harness {
    harness_with(HeadlessPlayer::new()).await
}

#[tokio::test]
async fn test_empty_input_shows_error_without_request() {
    let h = harness().await;
    let mock = h.fixture.mock_any().await;

    for text in ["", "   \n\t  "] {
        h.session.on_input(text, 0);
        let outcome = h.session.trigger().await;
        assert!(matches!(outcome, TriggerOutcome::Failed(Error::EmptyInput)));
        let snap = h.view.snapshot();
        assert_eq!(snap.error.as_deref(), Some("Please enter some text."));
        assert!(!snap.busy);
    }

    mock.assert_async().await;
    assert_eq!(h.session.state(), SynthesisState::Idle);
    assert!(h.view.snapshot().busy_history.is_empty());
}

#[tokio::test]
async fn test_over_limit_input_sends_first_thousand_words() {
    let h = harness().await;
    let all = words(1001);
    let expected = all[..1000].join(" ");
    let mock = h
        .fixture
        .mock_audio_for(
            serde_json::json!({"text": expected, "format": "mp3"}),
            "audio/mpeg",
        )
        .await;

    let text = all.join(" ");
    let update = h.session.on_input(text.clone(), text.chars().count());
    assert!(update.trimmed);
    assert_eq!(update.meter.words, 1000);
    assert_eq!(
        h.view.snapshot().error.as_deref(),
        Some("Trimmed to 1000 words.")
    );

    let outcome = h.session.trigger().await;
    mock.assert_async().await;
    assert!(outcome.is_spoken(), "{:?}", outcome);
}

#[tokio::test]
async fn test_server_error_is_shown_and_session_returns_to_idle() {
    let h = harness().await;
    let _mock = h.fixture.mock_error(500, "boom").await;

    h.session.on_input("say something", 13);
    let outcome = h.session.trigger().await;

    let err = outcome.error().expect("failed outcome");
    assert!(matches!(err, Error::Remote { status: 500, .. }));
    let snap = h.view.snapshot();
    let shown = snap.error.expect("error region");
    assert!(shown.contains("500") && shown.contains("boom"), "{}", shown);
    assert_eq!(snap.busy_history, vec![true, false]);
    assert_eq!(snap.label, IDLE_LABEL);
    assert!(snap.download.is_none());
    assert_eq!(h.session.state(), SynthesisState::Idle);
}

#[tokio::test]
async fn test_wav_response_is_offered_as_wav_download() {
    let h = harness().await;
    let _mock = h.fixture.mock_audio("audio/wav", b"RIFF....WAVE").await;

    h.session.on_input("hello", 5);
    let outcome = h.session.trigger().await;

    let download = outcome.download().expect("download").clone();
    assert!(download.file_name.starts_with("tts-"));
    assert!(download.file_name.ends_with(".wav"));
    assert_eq!(h.view.snapshot().download, Some(download.clone()));
    assert_eq!(h.player.source(), Some(download.url.clone()));
    assert_eq!(h.player.plays(), 1);
    assert!(ObjectUrls::is_object_url(&download.url));
}

#[tokio::test]
async fn test_other_declared_types_fall_back_to_mp3() {
    for content_type in ["audio/mpeg", "audio/ogg", "application/octet-stream"] {
        let h = harness().await;
        let _mock = h.fixture.mock_audio(content_type, b"data").await;
        h.session.on_input("hello", 5);
        let outcome = h.session.trigger().await;
        let name = &outcome.download().expect("download").file_name;
        assert!(name.ends_with(".mp3"), "{} -> {}", content_type, name);
    }
}

#[tokio::test]
async fn test_previous_audio_is_released_before_next_is_created() {
    let urls = ObjectUrls::new();
    let backend = Arc::new(ObservingBackend::new(urls.clone()));
    let view = Arc::new(RecordingView::new());
    let session = SpeakSession::new(
        speak_client::SpeakConfig::default()
            .with_playback_delay(std::time::Duration::ZERO),
        backend.clone(),
        Arc::new(HeadlessPlayer::new()),
        view,
    )
    .with_object_urls(urls.clone());

    session.on_input("first", 5);
    let first = session.trigger().await;
    let first_url = first.download().expect("first").url.clone();
    assert_eq!(urls.live_count(), 1);

    session.on_input("second", 6);
    let second = session.trigger().await;
    let second_url = second.download().expect("second").url.clone();

    assert_ne!(first_url, second_url);
    assert_eq!(urls.live_count(), 1);
    assert!(urls.resolve(&first_url).is_none());
    assert!(urls.resolve(&second_url).is_some());
    assert_eq!(session.current_audio(), Some(second_url));
    // nothing was live when either request went out
    assert_eq!(*backend.live_at_request.lock().unwrap(), vec![0, 0]);
    assert_eq!(backend.requests.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_trigger_while_synthesizing_is_a_noop() {
    let backend = Arc::new(HeldBackend::new());
    let view = Arc::new(RecordingView::new());
    let session = Arc::new(
        SpeakSession::new(
            speak_client::SpeakConfig::default()
                .with_playback_delay(std::time::Duration::ZERO),
            backend.clone(),
            Arc::new(HeadlessPlayer::new()),
            view.clone(),
        )
        .with_platform(Platform::MacLike),
    );
    session.on_input("hold on", 7);

    let running = {
        let session = session.clone();
        tokio::spawn(async move { session.trigger().await })
    };
    backend.entered.notified().await;
    assert_eq!(session.state(), SynthesisState::Synthesizing);
    assert!(view.snapshot().busy);

    assert!(matches!(session.trigger().await, TriggerOutcome::Busy));
    let by_key = session
        .on_key(&KeyEvent::new(Key::Enter).with_meta())
        .await;
    assert!(matches!(by_key, Some(TriggerOutcome::Busy)));
    assert_eq!(backend.calls(), 1);

    backend.release_one();
    let outcome = running.await.expect("join");
    assert!(outcome.is_spoken());
    assert_eq!(session.state(), SynthesisState::Idle);
    assert_eq!(view.snapshot().busy_history, vec![true, false]);
}

#[tokio::test]
async fn test_blocked_playback_is_not_an_error() {
    let h = harness_with(HeadlessPlayer::rejecting_playback()).await;
    let _mock = h.fixture.mock_audio("audio/mpeg", b"ID3").await;

    h.session.on_input("autoplay blocked", 16);
    let outcome = h.session.trigger().await;

    assert!(outcome.is_spoken());
    let snap = h.view.snapshot();
    assert!(snap.errors_shown.is_empty());
    assert!(snap.download.is_some());
    assert_eq!(h.player.plays(), 0);
}

#[tokio::test]
async fn test_new_attempt_clears_previous_error_and_download() {
    let h = harness().await;
    let ok = h.fixture.mock_audio("audio/mpeg", b"ID3").await;
    h.session.on_input("first", 5);
    assert!(h.session.trigger().await.is_spoken());
    ok.remove_async().await;

    let _fail = h.fixture.mock_error(502, "bad gateway").await;
    let outcome = h.session.trigger().await;
    assert!(outcome.error().is_some());

    let snap = h.view.snapshot();
    assert!(snap.download.is_none());
    assert!(snap.error.unwrap().contains("502"));
    assert!(h.session.current_audio().is_none());
    assert_eq!(h.session.object_urls().live_count(), 0);
    assert!(h.player.source().is_none());
    assert_eq!(h.player.resets(), 2);
}

#[tokio::test]
async fn test_approaching_limit_notice() {
    let h = harness().await;
    h.session.on_input(words(950).join(" "), 0);
    assert_eq!(
        h.view.snapshot().error.as_deref(),
        Some("Approaching 1000-word limit.")
    );
    h.session.on_input("short", 5);
    assert!(h.view.snapshot().error.is_none());
    assert_eq!(
        h.view.snapshot().meters.words_label.as_deref(),
        Some("1 / 1000 words")
    );
}
