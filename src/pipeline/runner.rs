//! Judging pipeline — stage → transcribe → screen → judge.
//!
//! [`JudgePipeline`] turns one [`AudioSubmission`] into either a
//! [`Judgement`] or a [`SubmissionError`].  Each step is a separate method
//! returning a `Result`, so the steps can be tested on their own and the
//! session handler only has to render the final outcome.
//!
//! # Pipeline flow
//!
//! ```text
//! AudioSubmission
//!   └─▶ spawn_blocking(stager.stage)      → StagedClip | NoAudioDetected | AudioTooShort
//!         └─▶ gateway.transcribe (async)  → Transcript | TranscriptionFailure
//!               (clip dropped here, on every path)
//!               └─▶ check_plausibility    → QuestionKind | ImplausibleResponse
//!                     └─▶ engine.judge    → EquivalenceVerdict
//! ```
//!
//! Staging does blocking file I/O and is pushed onto
//! `tokio::task::spawn_blocking` so the async runtime never stalls.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::audio::{AudioError, AudioStager, StagedClip};
use crate::judge::{check_plausibility, EquivalenceEngine, EquivalenceVerdict, QuestionKind};
use crate::stt::{Transcript, TranscriptionGateway};

// ---------------------------------------------------------------------------
// SubmissionError
// ---------------------------------------------------------------------------

/// Every way a submission can fail.  None of them is fatal to the
/// connection; each becomes an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The inbound message could not be parsed or its audio decoded.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// The staged clip is below the size threshold.
    #[error("audio too short: {got} bytes (minimum {min})")]
    AudioTooShort { got: usize, min: usize },

    /// The submission carried zero bytes of audio.
    #[error("no audio detected")]
    NoAudioDetected,

    /// The transcription service failed or timed out.
    #[error("transcription failed: {0}")]
    TranscriptionFailure(String),

    /// The transcript did not pass the plausibility pre-filter.
    #[error("implausible {kind:?} answer: {transcript:?}")]
    ImplausibleResponse {
        kind: QuestionKind,
        transcript: String,
    },

    /// A previous submission on the same connection is still in flight.
    #[error("a submission is already being judged")]
    Busy,

    /// Staging I/O or task failure on the server side.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SubmissionError {
    /// Message sent to the student in the error envelope.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::MalformedMessage(_) => "Error processing request".into(),
            SubmissionError::AudioTooShort { .. } => {
                "Audio too short. Please speak longer and clearer.".into()
            }
            SubmissionError::NoAudioDetected => {
                "No audio detected. Please try recording again.".into()
            }
            SubmissionError::TranscriptionFailure(_) | SubmissionError::Internal(_) => {
                "Error processing audio. Please try again.".into()
            }
            SubmissionError::ImplausibleResponse { kind, .. } => kind.guidance().into(),
            SubmissionError::Busy => "Still judging your previous answer. Please wait.".into(),
        }
    }
}

impl From<AudioError> for SubmissionError {
    fn from(e: AudioError) -> Self {
        match e {
            AudioError::InvalidEncoding(msg) => SubmissionError::MalformedMessage(msg),
            AudioError::Empty => SubmissionError::NoAudioDetected,
            AudioError::TooShort { got, min } => SubmissionError::AudioTooShort { got, min },
            AudioError::Io(io) => SubmissionError::Internal(io.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission / Judgement
// ---------------------------------------------------------------------------

/// One inbound audio answer.  Consumed by [`JudgePipeline::run`].
#[derive(Debug, Clone)]
pub struct AudioSubmission {
    pub connection_id: String,
    pub question_text: String,
    pub expected_answer: String,
    /// Decoded audio bytes.
    pub audio: Vec<u8>,
    pub received_at: Instant,
}

/// A submission that made it all the way through the pipeline.
#[derive(Debug, Clone)]
pub struct Judgement {
    /// Trimmed transcript as returned by the gateway.
    pub transcript: Transcript,
    pub kind: QuestionKind,
    pub expected_answer: String,
    pub verdict: EquivalenceVerdict,
}

/// Result of one submission, as passed to the session layer.
pub type SubmissionOutcome = Result<Judgement, SubmissionError>;

// ---------------------------------------------------------------------------
// JudgePipeline
// ---------------------------------------------------------------------------

/// Drives one submission through every step.  Shared by all connections.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use voice_quiz::audio::AudioStager;
/// use voice_quiz::config::AppConfig;
/// use voice_quiz::judge::EquivalenceEngine;
/// use voice_quiz::pipeline::JudgePipeline;
/// use voice_quiz::stt::WhisperApiGateway;
///
/// let config = AppConfig::default();
/// let pipeline = JudgePipeline::new(
///     AudioStager::from_config(&config.audio),
///     Arc::new(WhisperApiGateway::from_config(&config.stt)),
///     EquivalenceEngine::new(config.judge.fuzzy_threshold()),
///     config.stt.language.clone(),
/// );
/// ```
pub struct JudgePipeline {
    stager: AudioStager,
    gateway: Arc<dyn TranscriptionGateway>,
    engine: EquivalenceEngine,
    language: String,
}

impl JudgePipeline {
    /// Create a new pipeline.
    ///
    /// # Arguments
    ///
    /// * `stager`   — where submitted clips are staged.
    /// * `gateway`  — transcription service (e.g. `WhisperApiGateway`).
    /// * `engine`   — answer matcher.
    /// * `language` — language hint passed to the gateway.
    pub fn new(
        stager: AudioStager,
        gateway: Arc<dyn TranscriptionGateway>,
        engine: EquivalenceEngine,
        language: impl Into<String>,
    ) -> Self {
        Self {
            stager,
            gateway,
            engine,
            language: language.into(),
        }
    }

    pub fn stager(&self) -> &AudioStager {
        &self.stager
    }

    // -----------------------------------------------------------------------
    // Full run
    // -----------------------------------------------------------------------

    /// Run every step for `submission`.
    pub async fn run(&self, submission: AudioSubmission) -> SubmissionOutcome {
        let AudioSubmission {
            connection_id,
            question_text,
            expected_answer,
            audio,
            received_at,
        } = submission;

        log::info!(
            "pipeline[{connection_id}]: judging {} bytes for question {:?}",
            audio.len(),
            question_text
        );

        let clip = self.stage(audio).await?;
        let transcript = self.transcribe(clip).await?;
        log::info!("pipeline[{connection_id}]: transcript = {:?}", transcript.text);

        let kind = self.screen(&transcript, &question_text)?;
        let verdict = self.judge(&transcript, &expected_answer);

        log::info!(
            "pipeline[{connection_id}]: expected {:?} → correct={} via {} in {} ms",
            expected_answer,
            verdict.is_correct,
            verdict.matched_strategy.map_or("none", |s| s.label()),
            received_at.elapsed().as_millis()
        );

        Ok(Judgement {
            transcript,
            kind,
            expected_answer,
            verdict,
        })
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    /// Stage `audio` on the blocking pool.
    pub async fn stage(&self, audio: Vec<u8>) -> Result<StagedClip, SubmissionError> {
        let stager = self.stager.clone();
        let staged = tokio::task::spawn_blocking(move || stager.stage(&audio))
            .await
            .map_err(|e| SubmissionError::Internal(e.to_string()))?;

        staged.map_err(|e| {
            log::info!("pipeline: staging rejected: {e}");
            SubmissionError::from(e)
        })
    }

    /// Transcribe `clip`, releasing it before returning on every path.
    pub async fn transcribe(&self, clip: StagedClip) -> Result<Transcript, SubmissionError> {
        let result = self.gateway.transcribe(&clip, &self.language).await;
        drop(clip);

        result.map_err(|e| {
            log::warn!("pipeline: transcription failed: {e}");
            SubmissionError::TranscriptionFailure(e.to_string())
        })
    }

    /// Plausibility gate.
    pub fn screen(
        &self,
        transcript: &Transcript,
        question_text: &str,
    ) -> Result<QuestionKind, SubmissionError> {
        check_plausibility(&transcript.text, question_text).map_err(|rejection| {
            log::info!(
                "pipeline: rejected implausible {:?} answer {:?}",
                rejection.kind,
                transcript.text
            );
            SubmissionError::ImplausibleResponse {
                kind: rejection.kind,
                transcript: transcript.text.clone(),
            }
        })
    }

    /// Equivalence verdict.
    pub fn judge(&self, transcript: &Transcript, expected_answer: &str) -> EquivalenceVerdict {
        self.engine.judge(&transcript.text, expected_answer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
