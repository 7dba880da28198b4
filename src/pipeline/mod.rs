//! Judging pipeline and per-connection session state.
//!
//! # Architecture
//!
//! ```text
//! AudioSubmission
//!        │
//!        ▼
//! JudgePipeline::run()  ← spawned per submission by the session handler
//!        │
//!        ├─ stage       (AudioStager, blocking pool)
//!        ├─ transcribe  (TranscriptionGateway, clip released afterwards)
//!        ├─ screen      (plausibility pre-filter)
//!        └─ judge       (EquivalenceEngine)
//!        │
//!        ▼
//! SubmissionOutcome = Result<Judgement, SubmissionError>
//! ```
//!
//! [`SessionState`] is owned by the session handler and only records where a
//! connection is in that cycle; the pipeline itself holds no per-connection
//! state.

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{AudioSubmission, JudgePipeline, Judgement, SubmissionError, SubmissionOutcome};
pub use state::SessionState;
