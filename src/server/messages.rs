//! WebSocket wire envelopes.
//!
//! Inbound:
//!
//! ```json
//! { "type": "audio", "data": "<base64>", "question": { "question": "...", "answer": "..." } }
//! ```
//!
//! Outbound:
//!
//! ```json
//! { "type": "transcription", "text": "...", "isCorrect": true, "message": "Correct! ✓" }
//! { "type": "error", "message": "..." }
//! ```

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::audio::decode_audio;
use crate::judge::verdict_message;
use crate::pipeline::{AudioSubmission, SubmissionError, SubmissionOutcome};

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Question the student is answering.  Extra fields sent by the client
/// (ids, ordering) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionPayload {
    pub question: String,
    pub answer: String,
}

/// Inbound message, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    Audio {
        data: String,
        question: QuestionPayload,
    },
    /// Any other `type`; ignored by the session handler.
    #[serde(other)]
    Other,
}

impl ClientMessage {
    /// Parse one text frame.  Anything that is not a well-formed envelope is
    /// a [`SubmissionError::MalformedMessage`].
    pub fn parse(text: &str) -> Result<Self, SubmissionError> {
        serde_json::from_str(text).map_err(|e| SubmissionError::MalformedMessage(e.to_string()))
    }
}

/// Decode an audio envelope into a pipeline submission.
pub fn into_submission(
    connection_id: &str,
    data: &str,
    question: QuestionPayload,
) -> Result<AudioSubmission, SubmissionError> {
    let audio = decode_audio(data)?;
    Ok(AudioSubmission {
        connection_id: connection_id.to_string(),
        question_text: question.question,
        expected_answer: question.answer,
        audio,
        received_at: Instant::now(),
    })
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerMessage {
    Transcription {
        text: String,
        #[serde(rename = "isCorrect")]
        is_correct: bool,
        message: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn from_error(error: &SubmissionError) -> Self {
        ServerMessage::Error {
            message: error.user_message(),
        }
    }

    /// Render a pipeline outcome.  The `text` of a verdict is the raw
    /// (trimmed) transcript, not its normalized form.
    pub fn from_outcome(outcome: &SubmissionOutcome) -> Self {
        match outcome {
            Ok(judgement) => ServerMessage::Transcription {
                text: judgement.transcript.text.clone(),
                is_correct: judgement.verdict.is_correct,
                message: verdict_message(judgement.verdict.is_correct, &judgement.expected_answer),
            },
            Err(e) => Self::from_error(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
