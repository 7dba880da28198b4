//! Spoken-answer judging for voice quizzes.
//!
//! A client records an answer, sends it over a WebSocket together with the
//! question and its expected answer, and gets back a verdict:
//!
//! ```text
//! audio envelope → stage + size gate → transcribe → plausibility gate
//!                → equivalence verdict → envelope, clip released
//! ```
//!
//! * [`judge`]    — pure text matching (normalization, number forms, fuzzy).
//! * [`audio`]    — base64 decoding and ephemeral clip staging.
//! * [`stt`]      — transcription gateway trait and the HTTP implementation.
//! * [`pipeline`] — one submission through every step.
//! * [`server`]   — sessions, wire envelopes, axum router.
//! * [`config`]   — `settings.toml` and environment overrides.

pub mod audio;
pub mod config;
pub mod judge;
pub mod pipeline;
pub mod server;
pub mod stt;
