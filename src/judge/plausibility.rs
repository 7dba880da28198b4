//! Plausibility pre-filter for transcripts.
//!
//! Cheap gate run before the equivalence engine so that silence, coughs and
//! single-syllable noise are sent back for a re-record instead of being
//! judged (and costing the student a question attempt).
//!
//! The question text decides the [`QuestionKind`]; each kind has its own
//! acceptance rule and guidance message.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::normalize::normalize;
use super::numbers::is_number_word;

// ---------------------------------------------------------------------------
// Static patterns
// ---------------------------------------------------------------------------

static MATH_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d+\s*[+\-*/]\s*\d+|what\s+is\s+\d+|addition|subtraction|multiplication|division|how\s+many|how\s+much)\b",
    )
    .expect("valid math question pattern")
});

/// Words that show the student is at least attempting an arithmetic answer.
/// Matched anywhere in the text, so "answers" and "this" also count.
const MATH_KEYWORDS: &[&str] = &["plus", "minus", "equals", "is", "add", "subtract", "answer"];

const MATH_GUIDANCE: &str = "Please answer with a number (e.g., 'four' or '4')";
const FREE_FORM_GUIDANCE: &str = "Please give a clear answer to the question.";

// ---------------------------------------------------------------------------
// QuestionKind
// ---------------------------------------------------------------------------

/// Broad category of a quiz question, recomputed for every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuestionKind {
    /// Arithmetic / counting question; a number is expected.
    Math,
    /// Anything else.
    FreeForm,
}

impl QuestionKind {
    /// Classify `question_text`.
    ///
    /// ```
    /// use voice_quiz::judge::QuestionKind;
    ///
    /// assert_eq!(QuestionKind::classify("What is 2 + 2?"), QuestionKind::Math);
    /// assert_eq!(QuestionKind::classify("Capital of France?"), QuestionKind::FreeForm);
    /// ```
    pub fn classify(question_text: &str) -> Self {
        if MATH_QUESTION.is_match(&question_text.to_lowercase()) {
            QuestionKind::Math
        } else {
            QuestionKind::FreeForm
        }
    }

    /// Re-record guidance shown when a transcript is rejected.
    pub fn guidance(&self) -> &'static str {
        match self {
            QuestionKind::Math => MATH_GUIDANCE,
            QuestionKind::FreeForm => FREE_FORM_GUIDANCE,
        }
    }
}

// ---------------------------------------------------------------------------
// Plausibility checks
// ---------------------------------------------------------------------------

/// A transcript that failed the pre-filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: QuestionKind,
    pub guidance: &'static str,
}

/// Returns `true` when `transcript` is worth judging for a question of `kind`.
pub fn is_plausible(transcript: &str, kind: QuestionKind) -> bool {
    let text = normalize(transcript);
    match kind {
        QuestionKind::Math => {
            text.split([' ', '-'])
                .any(|token| is_number_word(token) || is_digit_sequence(token))
                || MATH_KEYWORDS.iter().any(|kw| text.contains(kw))
        }
        QuestionKind::FreeForm => {
            text.chars().count() >= 2 && text.chars().any(char::is_alphanumeric)
        }
    }
}

/// Classify `question_text` and gate `transcript` in one step.
///
/// ```
/// use voice_quiz::judge::{check_plausibility, QuestionKind};
///
/// assert_eq!(check_plausibility("four", "What is 2 + 2?"), Ok(QuestionKind::Math));
/// assert!(check_plausibility("um", "What is 2 + 2?").is_err());
/// ```
pub fn check_plausibility(transcript: &str, question_text: &str) -> Result<QuestionKind, Rejection> {
    let kind = QuestionKind::classify(question_text);
    if is_plausible(transcript, kind) {
        Ok(kind)
    } else {
        Err(Rejection {
            kind,
            guidance: kind.guidance(),
        })
    }
}

fn is_digit_sequence(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- classify ---

    #[test]
    fn arithmetic_expression_is_math() {
        assert_eq!(QuestionKind::classify("What is 2 + 2?"), QuestionKind::Math);
        assert_eq!(QuestionKind::classify("Compute 12*3"), QuestionKind::Math);
        assert_eq!(QuestionKind::classify("10 / 5 = ?"), QuestionKind::Math);
    }

    #[test]
    fn what_is_number_is_math() {
        assert_eq!(QuestionKind::classify("What is 7 squared?"), QuestionKind::Math);
    }

    #[test]
    fn math_vocabulary_is_math() {
        assert_eq!(QuestionKind::classify("Practice your ADDITION"), QuestionKind::Math);
        assert_eq!(QuestionKind::classify("How many legs does a spider have?"), QuestionKind::Math);
        assert_eq!(QuestionKind::classify("How much is a dozen?"), QuestionKind::Math);
    }

    #[test]
    fn other_questions_are_free_form() {
        assert_eq!(QuestionKind::classify("Capital of France?"), QuestionKind::FreeForm);
        assert_eq!(QuestionKind::classify("What is the largest ocean?"), QuestionKind::FreeForm);
        assert_eq!(QuestionKind::classify(""), QuestionKind::FreeForm);
    }

    // ---- Math plausibility ---

    #[test]
    fn math_accepts_number_words_and_digits() {
        assert!(is_plausible("four", QuestionKind::Math));
        assert!(is_plausible("It's 4.", QuestionKind::Math));
        assert!(is_plausible("twenty-one", QuestionKind::Math));
        assert!(is_plausible("150", QuestionKind::Math));
    }

    #[test]
    fn math_accepts_keywords() {
        assert!(is_plausible("the answer", QuestionKind::Math));
        assert!(is_plausible("two plus two", QuestionKind::Math));
        assert!(is_plausible("it is", QuestionKind::Math));
    }

    #[test]
    fn math_rejects_filler() {
        assert!(!is_plausible("um", QuestionKind::Math));
        assert!(!is_plausible("", QuestionKind::Math));
        assert!(!is_plausible("hmm, let me think", QuestionKind::Math));
    }

    #[test]
    fn math_keywords_match_inside_words() {
        assert!(is_plausible("the answers", QuestionKind::Math));
        assert!(is_plausible("addition please", QuestionKind::Math));
        assert!(is_plausible("this", QuestionKind::Math));
    }

    #[test]
    fn math_number_words_must_be_whole_words() {
        assert!(!is_plausible("someone", QuestionKind::Math));
        assert!(!is_plausible("often", QuestionKind::Math));
    }

    // ---- FreeForm plausibility ---

    #[test]
    fn free_form_accepts_short_words() {
        assert!(is_plausible("Paris", QuestionKind::FreeForm));
        assert!(is_plausible("no", QuestionKind::FreeForm));
    }

    #[test]
    fn free_form_rejects_noise() {
        assert!(!is_plausible("a", QuestionKind::FreeForm));
        assert!(!is_plausible("?!", QuestionKind::FreeForm));
        assert!(!is_plausible("  ", QuestionKind::FreeForm));
        assert!(!is_plausible("--", QuestionKind::FreeForm));
    }

    // ---- check_plausibility ---

    #[test]
    fn rejection_carries_math_guidance() {
        let rejection = check_plausibility("um", "What is 2 + 2?").unwrap_err();
        assert_eq!(rejection.kind, QuestionKind::Math);
        assert_eq!(
            rejection.guidance,
            "Please answer with a number (e.g., 'four' or '4')"
        );
    }

    #[test]
    fn rejection_carries_free_form_guidance() {
        let rejection = check_plausibility(".", "Capital of France?").unwrap_err();
        assert_eq!(rejection.kind, QuestionKind::FreeForm);
        assert_eq!(rejection.guidance, "Please give a clear answer to the question.");
    }

    #[test]
    fn accepted_transcript_returns_kind() {
        assert_eq!(
            check_plausibility("it's paris", "Capital of France?"),
            Ok(QuestionKind::FreeForm)
        );
    }
}
