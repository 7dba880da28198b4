//! Levenshtein edit distance and the fuzzy-match threshold.

use serde::{Deserialize, Serialize};

/// Minimum number of single-character insertions, deletions or substitutions
/// needed to turn `a` into `b`.
///
/// Uses the full `(m+1)×(n+1)` dynamic-programming table over `char`s.
/// Inputs are short spoken answers, so no banding or row reuse is attempted.
///
/// ```
/// use voice_quiz::judge::levenshtein;
///
/// assert_eq!(levenshtein("kitten", "sitting"), 3);
/// assert_eq!(levenshtein("", "abc"), 3);
/// ```
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut matrix = vec![vec![0usize; n + 1]; m + 1];
    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=n {
        matrix[0][j] = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            matrix[i][j] = if a[i - 1] == b[j - 1] {
                matrix[i - 1][j - 1]
            } else {
                1 + matrix[i - 1][j - 1] // substitute
                    .min(matrix[i][j - 1]) // insert
                    .min(matrix[i - 1][j]) // delete
            };
        }
    }

    matrix[m][n]
}

/// Similarity score in `[0.0, 1.0]`: `(L - d) / L` where `L` is the longer
/// length in chars and `d` the edit distance.  Two empty strings score `1.0`.
///
/// Only for display and logging; the accept decision is made by
/// [`FuzzyThreshold::accepts`] in integer arithmetic.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    (longest - levenshtein(a, b)) as f64 / longest as f64
}

// ---------------------------------------------------------------------------
// FuzzyThreshold
// ---------------------------------------------------------------------------

/// Acceptance threshold for the fuzzy strategy.
///
/// The comparison `(L - d) / L  vs  percent / 100` is evaluated as
/// `(L - d) * 100  vs  percent * L`, so the boundary (e.g. `"pari"` against
/// `"paris"`, exactly 0.80) is decided by `inclusive`, never by rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyThreshold {
    /// Threshold in whole percent (default `80`).
    pub percent: u32,
    /// Whether a similarity exactly equal to the threshold is accepted
    /// (default `false`: strictly greater than).
    pub inclusive: bool,
}

impl Default for FuzzyThreshold {
    fn default() -> Self {
        Self {
            percent: 80,
            inclusive: false,
        }
    }
}

impl FuzzyThreshold {
    /// Returns `true` when `a` and `b` are similar enough.
    pub fn accepts(&self, a: &str, b: &str) -> bool {
        let longest = a.chars().count().max(b.chars().count());
        if longest == 0 {
            return true;
        }
        let kept = (longest - levenshtein(a, b)) as u64 * 100;
        let needed = self.percent as u64 * longest as u64;

        if self.inclusive {
            kept >= needed
        } else {
            kept > needed
        }
    }
}
