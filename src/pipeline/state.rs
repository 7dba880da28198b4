//! Per-connection session state machine.
//!
//! [`SessionState`] tracks where a connection is in the submission cycle so
//! the session handler can refuse overlapping submissions.

use serde::Serialize;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// States of one connection's judging cycle.
///
/// ```text
/// Idle ──audio message──▶ AwaitingTranscript
///                          ──judged / failed──▶ Responded ──envelope sent──▶ Idle
/// Idle ──malformed message──▶ Idle   (error envelope only)
/// AwaitingTranscript ──audio message──▶ AwaitingTranscript   (Busy envelope)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionState {
    /// Waiting for the next audio submission.
    #[default]
    Idle,

    /// A submission is being staged, transcribed and judged.
    AwaitingTranscript,

    /// The outcome is known and its envelope is being sent.
    Responded,
}

impl SessionState {
    /// Returns `true` while a submission is in flight; new submissions are
    /// rejected with `Busy` in this state.
    ///
    /// ```
    /// use voice_quiz::pipeline::SessionState;
    ///
    /// assert!(!SessionState::Idle.is_busy());
    /// assert!(SessionState::AwaitingTranscript.is_busy());
    /// assert!(!SessionState::Responded.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::AwaitingTranscript)
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingTranscript => "awaiting-transcript",
            SessionState::Responded => "responded",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
    }

    #[test]
    fn only_awaiting_transcript_is_busy() {
        assert!(!SessionState::Idle.is_busy());
        assert!(SessionState::AwaitingTranscript.is_busy());
        assert!(!SessionState::Responded.is_busy());
    }

    #[test]
    fn labels() {
        assert_eq!(SessionState::Idle.label(), "idle");
        assert_eq!(SessionState::AwaitingTranscript.label(), "awaiting-transcript");
        assert_eq!(SessionState::Responded.label(), "responded");
    }
}
