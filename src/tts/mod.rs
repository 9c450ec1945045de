//! TTS（文字转语音）模块：把文本提交到合成端点，取回音频。

mod client;
mod types;

pub use client::{SpeakClient, SpeakClientBuilder, SynthesisBackend};
pub use types::{AudioFormat, AudioPayload, SpeakRequest};
