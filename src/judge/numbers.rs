//! Spoken-number conversion between words and digits (0–99).
//!
//! Both directions operate on already-normalised text and use word-boundary
//! matching, so number words embedded in other words (`"someone"`,
//! `"often"`) and digits embedded in tokens (`"4th"`) are left untouched.
//! Tokens outside the supported range pass through unchanged.
//!
//! All tables and patterns are built once per process.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

// ---------------------------------------------------------------------------
// Lookup tables
// ---------------------------------------------------------------------------

/// `zero` through `nineteen`, indexed by value.
pub(crate) const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

/// `twenty` through `ninety`; index `i` is the word for `(i + 2) * 10`.
pub(crate) const TENS: [&str; 8] = [
    "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

static ONES_VALUES: LazyLock<HashMap<&'static str, u32>> =
    LazyLock::new(|| ONES.iter().zip(0u32..).map(|(w, v)| (*w, v)).collect());

static TENS_VALUES: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    TENS.iter()
        .zip(2u32..)
        .map(|(w, v)| (*w, v * 10))
        .collect()
});

/// Union of [`ONES`] and [`TENS`].
static WORD_VALUES: LazyLock<HashMap<&'static str, u32>> = LazyLock::new(|| {
    ONES_VALUES
        .iter()
        .chain(TENS_VALUES.iter())
        .map(|(w, v)| (*w, *v))
        .collect()
});

/// Digit string → word, for 0–19 and the multiples of ten 20–90.
static DIGIT_WORDS: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    WORD_VALUES
        .iter()
        .map(|(w, v)| (v.to_string(), *w))
        .collect()
});

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

static HYPHEN_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)-(\w+)").expect("valid hyphen pair pattern"));

static SPACED_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        r"\b({}) ({})\b",
        TENS.join("|"),
        ONES[1..10].join("|")
    );
    Regex::new(&pattern).expect("valid spaced pair pattern")
});

static NUMBER_WORD: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\b({}|{})\b", ONES.join("|"), TENS.join("|"));
    Regex::new(&pattern).expect("valid number word pattern")
});

static COMPOUND_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([2-9])([1-9])\b").expect("valid compound digit pattern"));

static DIGIT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[0-9]+\b").expect("valid digit token pattern"));

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Replace spoken number words with their digit form.
///
/// 1. Hyphenated `tens-ones` pairs collapse to their sum (`"twenty-one"` → `"21"`).
/// 2. Space-separated `tens ones` pairs with a single-digit ones word collapse
///    the same way (`"twenty one"` → `"21"`), which is how transcription
///    services usually spell compounds.
/// 3. Every remaining standalone number word becomes its digits.
///
/// ```
/// use voice_quiz::judge::words_to_digits;
///
/// assert_eq!(words_to_digits("twenty-one"), "21");
/// assert_eq!(words_to_digits("the answer is four"), "the answer is 4");
/// assert_eq!(words_to_digits("someone"), "someone");
/// ```
pub fn words_to_digits(text: &str) -> String {
    let hyphens_collapsed = HYPHEN_PAIR.replace_all(text, |caps: &Captures| {
        match (TENS_VALUES.get(&caps[1]), ONES_VALUES.get(&caps[2])) {
            (Some(tens), Some(ones)) => (tens + ones).to_string(),
            _ => caps[0].to_string(),
        }
    });

    let pairs_collapsed = SPACED_PAIR.replace_all(&hyphens_collapsed, |caps: &Captures| {
        let tens = TENS_VALUES.get(&caps[1]).copied().unwrap_or_default();
        let ones = ONES_VALUES.get(&caps[2]).copied().unwrap_or_default();
        (tens + ones).to_string()
    });

    NUMBER_WORD
        .replace_all(&pairs_collapsed, |caps: &Captures| {
            WORD_VALUES
                .get(&caps[1])
                .map(|v| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace digit tokens with their spoken word form.
///
/// Two-digit numbers 21–99 with a non-zero ones digit become hyphenated
/// compounds (`"21"` → `"twenty-one"`); remaining tokens found in the table
/// (0–19 and 20, 30, … 90) become single words.
///
/// ```
/// use voice_quiz::judge::digits_to_words;
///
/// assert_eq!(digits_to_words("21"), "twenty-one");
/// assert_eq!(digits_to_words("2 plus 2 is 4"), "two plus two is four");
/// assert_eq!(digits_to_words("100"), "100");
/// ```
pub fn digits_to_words(text: &str) -> String {
    let compounds = COMPOUND_DIGITS.replace_all(text, |caps: &Captures| {
        let tens = DIGIT_WORDS.get(&format!("{}0", &caps[1]));
        let ones = DIGIT_WORDS.get(&caps[2]);
        match (tens, ones) {
            (Some(tens), Some(ones)) => format!("{tens}-{ones}"),
            _ => caps[0].to_string(),
        }
    });

    DIGIT_TOKEN
        .replace_all(&compounds, |caps: &Captures| {
            DIGIT_WORDS
                .get(&caps[0])
                .map(|w| w.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Returns `true` when `token` is one of the recognised number words.
pub(crate) fn is_number_word(token: &str) -> bool {
    WORD_VALUES.contains_key(token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
