//! STT (speech-to-text) gateway module.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │            TranscriptionGateway (trait)               │
//! │                                                       │
//! │   ┌────────────┐      ┌───────────────────┐           │
//! │   │ StagedClip │─────▶│ WhisperApiGateway │           │
//! │   │ (on disk)  │      │ - reqwest client  │           │
//! │   └────────────┘      │ - SttConfig       │           │
//! │                       └─────────┬─────────┘           │
//! │                                 ▼                     │
//! │              POST /v1/audio/transcriptions            │
//! │                     → Transcript                      │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use voice_quiz::audio::AudioStager;
//! use voice_quiz::config::SttConfig;
//! use voice_quiz::stt::{TranscriptionGateway, WhisperApiGateway};
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = WhisperApiGateway::from_config(&SttConfig::default());
//!     let stager = AudioStager::new("/tmp/voice-quiz", 5_000, "webm");
//!     let clip = stager.stage(&std::fs::read("answer.webm").unwrap()).unwrap();
//!
//!     let transcript = gateway.transcribe(&clip, "en").await.unwrap();
//!     println!("{}", transcript.text);
//! }
//! ```

pub mod gateway;
pub mod whisper_api;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use gateway::{Transcript, TranscriptionError, TranscriptionGateway};
pub use whisper_api::WhisperApiGateway;

// test-only re-export so pipeline and server tests can import MockGateway
// without `use voice_quiz::stt::gateway::MockGateway`.
#[cfg(test)]
pub use gateway::{MockGateway, PanickingGateway};
