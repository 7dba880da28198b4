//! Audio submissions — base64 decode → staged clip → guaranteed release.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voice_quiz::audio::AudioStager;
//!
//! let stager = AudioStager::new("/tmp/voice-quiz", 5_000, "webm");
//! let payload = std::fs::read_to_string("answer.b64").unwrap();
//! let clip = stager.stage_base64(&payload).unwrap();
//! println!("staged {} bytes at {}", clip.len(), clip.path().display());
//! drop(clip); // file removed here
//! ```

pub mod decode;
pub mod staging;

use thiserror::Error;

pub use decode::decode_audio;
pub use staging::{AudioStager, ClipLedger, StagedClip};

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Reason an audio submission could not be staged.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The payload is not valid base64.
    #[error("audio payload is not valid base64: {0}")]
    InvalidEncoding(String),

    /// The payload decoded to zero bytes.
    #[error("no audio captured")]
    Empty,

    /// The clip is smaller than the configured minimum.
    #[error("audio too short: {got} bytes (minimum {min})")]
    TooShort { got: usize, min: usize },

    /// The staging directory or file could not be written.
    #[error("failed to stage audio clip: {0}")]
    Io(#[from] std::io::Error),
}
