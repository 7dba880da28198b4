//! Transcription gateway trait and shared types.
//!
//! [`TranscriptionGateway`] is the public interface used by the pipeline.  It
//! is object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn TranscriptionGateway>` and shared by every connection.
//!
//! A call is a single request/response: no retries and no confidence
//! scores.  Timeouts belong to the implementation (see
//! [`WhisperApiGateway`](crate::stt::WhisperApiGateway)).
//!
//! [`MockGateway`] (available under `#[cfg(test)]`) returns a pre-configured
//! response and records how often it was called.

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::StagedClip;

// ---------------------------------------------------------------------------
// TranscriptionError
// ---------------------------------------------------------------------------

/// All errors that can arise from a transcription call.
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    /// HTTP transport or connection error.
    #[error("transcription request failed: {0}")]
    Request(String),

    /// The service did not answer within the configured timeout.
    #[error("transcription request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("transcription service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("failed to parse transcription response: {0}")]
    Parse(String),

    /// The staged clip could not be read back.
    #[error("failed to read staged clip: {0}")]
    Clip(String),
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscriptionError::Timeout
        } else {
            TranscriptionError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Text returned for one submission, trimmed of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
}

impl Transcript {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: text.as_ref().trim().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// TranscriptionGateway trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to a speech-to-text service.
///
/// # Arguments
/// * `clip`     – Staged audio; valid for the duration of the call only.
/// * `language` – ISO-639-1 language hint (e.g. `"en"`).
#[async_trait]
pub trait TranscriptionGateway: Send + Sync {
    async fn transcribe(
        &self,
        clip: &StagedClip,
        language: &str,
    ) -> Result<Transcript, TranscriptionError>;
}

// Compile-time assertion: Box<dyn TranscriptionGateway> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TranscriptionGateway>) {}
};

// ---------------------------------------------------------------------------
// MockGateway  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without any network
/// access.
#[cfg(test)]
pub struct MockGateway {
    response: Result<String, TranscriptionError>,
    delay: Option<std::time::Duration>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockGateway {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            delay: None,
            calls: Default::default(),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: TranscriptionError) -> Self {
        Self {
            response: Err(error),
            delay: None,
            calls: Default::default(),
        }
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: std::time::Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `transcribe` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl TranscriptionGateway for MockGateway {
    async fn transcribe(
        &self,
        clip: &StagedClip,
        _language: &str,
    ) -> Result<Transcript, TranscriptionError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        // The clip must still be on disk while the gateway holds it.
        assert!(clip.path().exists(), "clip released before transcription");
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone().map(Transcript::new)
    }
}

/// A test double whose `transcribe` panics while it holds the clip.
#[cfg(test)]
pub struct PanickingGateway;

#[cfg(test)]
#[async_trait]
impl TranscriptionGateway for PanickingGateway {
    async fn transcribe(
        &self,
        clip: &StagedClip,
        _language: &str,
    ) -> Result<Transcript, TranscriptionError> {
        assert!(clip.path().exists());
        panic!("gateway blew up mid-request");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioStager;
    use tempfile::tempdir;

    #[test]
    fn transcript_is_trimmed() {
        assert_eq!(Transcript::new("  four \n").text, "four");
    }

    #[tokio::test]
    async fn mock_ok_returns_configured_text() {
        let dir = tempdir().expect("temp dir");
        let clip = AudioStager::new(dir.path(), 1, "webm").stage(b"abc").unwrap();

        let gateway = MockGateway::ok(" Paris ");
        let transcript = gateway.transcribe(&clip, "en").await.unwrap();
        assert_eq!(transcript.text, "Paris");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn mock_err_returns_configured_error() {
        let dir = tempdir().expect("temp dir");
        let clip = AudioStager::new(dir.path(), 1, "webm").stage(b"abc").unwrap();

        let gateway = MockGateway::err(TranscriptionError::Timeout);
        let err = gateway.transcribe(&clip, "en").await.unwrap_err();
        assert!(matches!(err, TranscriptionError::Timeout));
    }

    #[test]
    fn box_dyn_gateway_compiles() {
        let _gateway: Box<dyn TranscriptionGateway> = Box::new(MockGateway::ok("ok"));
    }

    #[test]
    fn error_display_includes_status() {
        let e = TranscriptionError::Status {
            status: 429,
            body: "rate limited".into(),
        };
        let text = e.to_string();
        assert!(text.contains("429"));
        assert!(text.contains("rate limited"));
    }
}
