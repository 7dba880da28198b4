//! Answer equivalence engine.
//!
//! Decides whether a spoken transcript matches the stored expected answer by
//! trying an ordered list of strategies; the first one that holds determines
//! the verdict:
//!
//! | # | Strategy     | Holds when |
//! |---|--------------|------------|
//! | 1 | `Exact`      | normalised strings are equal |
//! | 2 | `Substring`  | normalised expected answer occurs inside the normalised transcript |
//! | 3 | `Fuzzy`      | Levenshtein similarity passes [`FuzzyThreshold`] |
//! | 4 | `NumberForm` | the two agree once numbers are rewritten as digits and/or words |
//!
//! Only the transcript may be longer than the expected answer; an expected
//! answer that merely contains the transcript is not a substring match.

use serde::Serialize;

use super::normalize::normalize;
use super::numbers::{digits_to_words, words_to_digits};
use super::similarity::FuzzyThreshold;

// ---------------------------------------------------------------------------
// Verdict types
// ---------------------------------------------------------------------------

/// The strategy that accepted an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStrategy {
    Exact,
    Substring,
    Fuzzy,
    NumberForm,
}

impl MatchStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStrategy::Exact => "exact",
            MatchStrategy::Substring => "substring",
            MatchStrategy::Fuzzy => "fuzzy",
            MatchStrategy::NumberForm => "number-form",
        }
    }
}

/// Outcome of comparing one transcript against one expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquivalenceVerdict {
    pub is_correct: bool,
    pub normalized_user: String,
    pub normalized_expected: String,
    /// `None` when no strategy accepted the answer.
    pub matched_strategy: Option<MatchStrategy>,
}

// ---------------------------------------------------------------------------
// EquivalenceEngine
// ---------------------------------------------------------------------------

/// Stateless matcher; the only tunable is the fuzzy threshold.
///
/// ```
/// use voice_quiz::judge::{EquivalenceEngine, MatchStrategy};
///
/// let engine = EquivalenceEngine::default();
/// let verdict = engine.judge("four", "4");
/// assert!(verdict.is_correct);
/// assert_eq!(verdict.matched_strategy, Some(MatchStrategy::NumberForm));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EquivalenceEngine {
    fuzzy: FuzzyThreshold,
}

impl EquivalenceEngine {
    pub fn new(fuzzy: FuzzyThreshold) -> Self {
        Self { fuzzy }
    }

    pub fn fuzzy_threshold(&self) -> FuzzyThreshold {
        self.fuzzy
    }

    /// Compare `user` (raw transcript) with `expected` (stored answer).
    pub fn judge(&self, user: &str, expected: &str) -> EquivalenceVerdict {
        let normalized_user = normalize(user);
        let normalized_expected = normalize(expected);

        let matched_strategy = self.first_match(&normalized_user, &normalized_expected);

        EquivalenceVerdict {
            is_correct: matched_strategy.is_some(),
            normalized_user,
            normalized_expected,
            matched_strategy,
        }
    }

    fn first_match(&self, user: &str, expected: &str) -> Option<MatchStrategy> {
        if user == expected {
            return Some(MatchStrategy::Exact);
        }
        if user.contains(expected) {
            return Some(MatchStrategy::Substring);
        }
        if self.fuzzy.accepts(user, expected) {
            return Some(MatchStrategy::Fuzzy);
        }
        if number_forms_agree(user, expected) {
            return Some(MatchStrategy::NumberForm);
        }
        None
    }
}

/// Compare with the default engine.
pub fn is_equivalent(user: &str, expected: &str) -> EquivalenceVerdict {
    EquivalenceEngine::default().judge(user, expected)
}

/// Cross-compare digit and word renderings of two normalised strings.
fn number_forms_agree(user: &str, expected: &str) -> bool {
    let user_as_digits = words_to_digits(user);
    let expected_as_digits = words_to_digits(expected);
    let user_as_words = digits_to_words(user);
    let expected_as_words = digits_to_words(expected);

    user_as_digits == expected_as_digits
        || user_as_digits == expected
        || user == expected_as_digits
        || user_as_words == expected_as_words
        || user_as_words == expected
        || user == expected_as_words
        || user_as_digits == expected_as_words
        || user_as_words == expected_as_digits
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(user: &str, expected: &str) -> Option<MatchStrategy> {
        is_equivalent(user, expected).matched_strategy
    }

    // ---- Exact ---

    #[test]
    fn exact_match_ignores_case_and_whitespace() {
        let v = is_equivalent("Paris", "paris");
        assert!(v.is_correct);
        assert_eq!(v.matched_strategy, Some(MatchStrategy::Exact));

        assert_eq!(strategy("  PARIS.  ", "Paris"), Some(MatchStrategy::Exact));
    }

    #[test]
    fn verdict_carries_normalized_forms() {
        let v = is_equivalent("It's PARIS!", "Paris");
        assert_eq!(v.normalized_user, "its paris");
        assert_eq!(v.normalized_expected, "paris");
    }

    // ---- Substring ---

    #[test]
    fn verbose_answer_containing_expected_is_substring() {
        assert_eq!(
            strategy("I think the answer is four", "four"),
            Some(MatchStrategy::Substring)
        );
        assert_eq!(strategy("it's paris", "Paris"), Some(MatchStrategy::Substring));
    }

    #[test]
    fn expected_containing_user_is_not_substring() {
        let v = is_equivalent("washington", "george washington carver");
        assert!(!v.is_correct);
    }

    #[test]
    fn empty_expected_is_contained_in_any_answer() {
        assert_eq!(
            is_equivalent("", "").matched_strategy,
            Some(MatchStrategy::Exact)
        );
        let verdict = is_equivalent("anything at all", "?!");
        assert!(verdict.is_correct);
        assert_eq!(verdict.matched_strategy, Some(MatchStrategy::Substring));
    }

    // ---- Fuzzy ---

    #[test]
    fn fuzzy_rejects_low_similarity() {
        assert!(!is_equivalent("Pyrs", "Paris").is_correct);
    }

    #[test]
    fn fuzzy_boundary_is_exclusive_by_default() {
        let v = is_equivalent("Pari", "Paris");
        assert!(!v.is_correct);
        assert_eq!(v.matched_strategy, None);
    }

    #[test]
    fn fuzzy_boundary_accepted_when_inclusive() {
        let engine = EquivalenceEngine::new(FuzzyThreshold {
            percent: 80,
            inclusive: true,
        });
        let v = engine.judge("Pari", "Paris");
        assert!(v.is_correct);
        assert_eq!(v.matched_strategy, Some(MatchStrategy::Fuzzy));
    }

    #[test]
    fn fuzzy_accepts_single_slip_in_longer_word() {
        assert_eq!(
            strategy("Shakespear", "Shakespeare"),
            Some(MatchStrategy::Fuzzy)
        );
    }

    // ---- NumberForm ---

    #[test]
    fn word_answer_matches_digit_expected() {
        assert_eq!(strategy("four", "4"), Some(MatchStrategy::NumberForm));
    }

    #[test]
    fn digit_answer_matches_word_expected() {
        assert_eq!(strategy("4", "four"), Some(MatchStrategy::NumberForm));
    }

    #[test]
    fn hyphenated_compound_matches_digits() {
        assert_eq!(strategy("twenty-one", "21"), Some(MatchStrategy::NumberForm));
        assert_eq!(strategy("21", "twenty-one"), Some(MatchStrategy::NumberForm));
    }

    #[test]
    fn digits_match_spaced_compound() {
        assert_eq!(strategy("21", "twenty one"), Some(MatchStrategy::NumberForm));
        assert_eq!(strategy("twenty one", "21"), Some(MatchStrategy::NumberForm));
    }

    #[test]
    fn mixed_sentence_matches_across_forms() {
        assert!(is_equivalent("two plus two is 4", "2 plus 2 is four").is_correct);
    }

    #[test]
    fn different_numbers_do_not_match() {
        assert!(!is_equivalent("five", "4").is_correct);
        assert!(!is_equivalent("twenty-two", "21").is_correct);
    }

    #[test]
    fn out_of_range_numbers_fail_to_match_words() {
        assert!(!is_equivalent("one hundred", "100").is_correct);
    }

    // ---- Ordering ---

    #[test]
    fn earliest_strategy_is_reported() {
        // "4" is both an exact and a number-form match for itself.
        assert_eq!(strategy("4", "4"), Some(MatchStrategy::Exact));
        // Contains "four" verbatim, so substring wins over number form.
        assert_eq!(strategy("it is four", "four"), Some(MatchStrategy::Substring));
    }

    #[test]
    fn strategy_labels() {
        assert_eq!(MatchStrategy::Exact.label(), "exact");
        assert_eq!(MatchStrategy::NumberForm.label(), "number-form");
    }
}
