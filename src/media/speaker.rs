//! Playback through the default output device.

use super::{AudioRef, MediaElement};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use bytes::Bytes;
use std::io::Cursor;
use std::sync::{mpsc, Mutex};
use std::thread;
use tokio::sync::oneshot;
use tracing::debug;

enum Command {
    Stop,
    Play {
        data: Bytes,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// `rodio` output stream owned by a dedicated thread.
///
/// The stream handle is not `Send`, so the element only keeps a command
/// channel and the currently attached source.
pub struct SpeakerPlayer {
    commands: mpsc::Sender<Command>,
    current: Mutex<Option<(String, Bytes)>>,
}

impl SpeakerPlayer {
    pub fn open() -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        thread::Builder::new()
            .name("speak-audio".to_string())
            .spawn(move || {
                let (_stream, handle) = match rodio::OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx
                            .send(Err(Error::playback(format!("no output device: {}", e))));
                        return;
                    }
                };
                let mut sink: Option<rodio::Sink> = None;
                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        Command::Stop => {
                            if let Some(s) = sink.take() {
                                s.stop();
                            }
                        }
                        Command::Play { data, reply } => {
                            if let Some(s) = sink.take() {
                                s.stop();
                            }
                            let result = match rodio::Sink::try_new(&handle) {
                                Ok(s) => match rodio::Decoder::new(Cursor::new(data)) {
                                    Ok(source) => {
                                        s.append(source);
                                        s.play();
                                        sink = Some(s);
                                        Ok(())
                                    }
                                    Err(e) => Err(Error::playback(e.to_string())),
                                },
                                Err(e) => Err(Error::playback(e.to_string())),
                            };
                            let _ = reply.send(result);
                        }
                    }
                }
                debug!("audio thread stopped");
            })?;

        ready_rx
            .recv()
            .map_err(|_| Error::playback("audio thread exited before opening the device"))??;

        Ok(Self {
            commands: tx,
            current: Mutex::new(None),
        })
    }

    fn current_data(&self) -> Option<Bytes> {
        self.current
            .lock()
            .ok()
            .and_then(|c| c.as_ref().map(|(_, data)| data.clone()))
    }
}

#[async_trait]
impl MediaElement for SpeakerPlayer {
    fn reset(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
        let _ = self.commands.send(Command::Stop);
    }

    fn set_source(&self, audio: &AudioRef) -> Result<()> {
        let mut current = self.current.lock().map_err(|_| {
            Error::runtime_with_context(
                "speaker state poisoned",
                ErrorContext::new().with_source("speaker"),
            )
        })?;
        *current = Some((audio.url().to_string(), audio.payload().data.clone()));
        Ok(())
    }

    fn source(&self) -> Option<String> {
        self.current
            .lock()
            .ok()
            .and_then(|c| c.as_ref().map(|(url, _)| url.clone()))
    }

    async fn wait_until_ready(&self) -> Result<()> {
        let data = self
            .current_data()
            .ok_or_else(|| Error::playback("no source attached"))?;
        // Probing the container is the closest thing to "can play through".
        tokio::task::spawn_blocking(move || {
            rodio::Decoder::new(Cursor::new(data))
                .map(|_| ())
                .map_err(|e| Error::playback(format!("audio is not decodable: {}", e)))
        })
        .await
        .map_err(|e| {
            Error::runtime_with_context(
                format!("decoder task failed: {}", e),
                ErrorContext::new().with_source("speaker"),
            )
        })?
    }

    async fn play(&self) -> Result<()> {
        let data = self
            .current_data()
            .ok_or_else(|| Error::playback("no source attached"))?;
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command::Play { data, reply })
            .map_err(|_| Error::playback("audio thread is gone"))?;
        rx.await
            .map_err(|_| Error::playback("audio thread dropped the request"))?
    }
}
