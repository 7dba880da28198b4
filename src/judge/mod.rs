//! Answer judging core: pure functions, no I/O.
//!
//! * [`normalize`] — canonical comparison form.
//! * [`words_to_digits`] / [`digits_to_words`] — spoken-number rewriting (0–99).
//! * [`levenshtein`] / [`FuzzyThreshold`] — edit distance and its acceptance rule.
//! * [`EquivalenceEngine`] — ordered strategies producing an [`EquivalenceVerdict`].
//! * [`QuestionKind`] / [`check_plausibility`] — pre-filter for garbage transcripts.
//! * [`verdict_message`] — wording of the result shown to the student.
//!
//! # Quick start
//!
//! ```rust
//! use voice_quiz::judge::{check_plausibility, is_equivalent, MatchStrategy};
//!
//! let question = "What is 2 + 2?";
//! let transcript = "four";
//!
//! check_plausibility(transcript, question).expect("looks like a number");
//! let verdict = is_equivalent(transcript, "4");
//! assert!(verdict.is_correct);
//! assert_eq!(verdict.matched_strategy, Some(MatchStrategy::NumberForm));
//! ```

pub mod equivalence;
pub mod feedback;
pub mod normalize;
pub mod numbers;
pub mod plausibility;
pub mod similarity;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use equivalence::{is_equivalent, EquivalenceEngine, EquivalenceVerdict, MatchStrategy};
pub use feedback::verdict_message;
pub use normalize::normalize;
pub use numbers::{digits_to_words, words_to_digits};
pub use plausibility::{check_plausibility, is_plausible, QuestionKind, Rejection};
pub use similarity::{levenshtein, similarity, FuzzyThreshold};
