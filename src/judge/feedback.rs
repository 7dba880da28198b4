//! Student-facing wording for verdicts.

/// Message shown after an answer has been judged.
///
/// ```
/// use voice_quiz::judge::verdict_message;
///
/// assert_eq!(verdict_message(true, "4"), "Correct! ✓");
/// assert_eq!(verdict_message(false, "Paris"), "Incorrect. The answer is Paris");
/// ```
pub fn verdict_message(is_correct: bool, expected_answer: &str) -> String {
    if is_correct {
        "Correct! ✓".to_string()
    } else {
        format!("Incorrect. The answer is {expected_answer}")
    }
}
