//! Per-connection running score.

use serde::Serialize;

use crate::pipeline::SubmissionOutcome;

/// Tally of one connection's submissions.
///
/// Only verdicts count as answered questions; every error envelope
/// (including `Busy` and implausible answers) counts as a rejection.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scorecard {
    answered: u32,
    correct: u32,
    rejected: u32,
}

impl Scorecard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &SubmissionOutcome) {
        match outcome {
            Ok(judgement) => {
                self.answered += 1;
                if judgement.verdict.is_correct {
                    self.correct += 1;
                }
            }
            Err(_) => self.rejected += 1,
        }
    }

    /// Count an error envelope that never reached the pipeline.
    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Whole-percent share of answered questions judged correct.
    pub fn accuracy_percent(&self) -> u32 {
        if self.answered == 0 {
            return 0;
        }
        self.correct * 100 / self.answered
    }

    pub fn summary(&self) -> String {
        format!(
            "{}/{} correct ({}%), {} rejected",
            self.correct,
            self.answered,
            self.accuracy_percent(),
            self.rejected
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::{is_equivalent, QuestionKind};
    use crate::pipeline::{Judgement, SubmissionError};
    use crate::stt::Transcript;

    fn judged(user: &str, expected: &str) -> SubmissionOutcome {
        Ok(Judgement {
            transcript: Transcript::new(user),
            kind: QuestionKind::FreeForm,
            expected_answer: expected.into(),
            verdict: is_equivalent(user, expected),
        })
    }

    #[test]
    fn empty_scorecard() {
        let card = Scorecard::new();
        assert_eq!(card.answered(), 0);
        assert_eq!(card.accuracy_percent(), 0);
        assert_eq!(card.summary(), "0/0 correct (0%), 0 rejected");
    }

    #[test]
    fn verdicts_and_rejections_are_tallied_separately() {
        let mut card = Scorecard::new();
        card.record(&judged("paris", "Paris"));
        card.record(&judged("london", "Paris"));
        card.record(&judged("it's paris", "Paris"));
        card.record(&Err(SubmissionError::NoAudioDetected));
        card.record_rejection();

        assert_eq!(card.answered(), 3);
        assert_eq!(card.correct(), 2);
        assert_eq!(card.rejected(), 2);
        assert_eq!(card.accuracy_percent(), 66);
    }
}
