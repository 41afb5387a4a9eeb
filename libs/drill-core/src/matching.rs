//! Line matching for drill submissions.
//!
//! The tolerant policy is not an edit distance. It first compares a small
//! histogram of structural characters and then walks the typed line as an
//! ordered subsequence of the reference, counting characters that cannot be
//! placed.

use crate::types::MatchingMode;
use serde::{Deserialize, Serialize};

/// Characters counted by the structural fingerprint.
pub const STRUCTURAL_CHARS: [char; 6] = ['(', ')', '[', ']', '=', '.'];

/// Per-category counts of structural characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint([usize; 6]);

impl Fingerprint {
    /// Compute the fingerprint of a string.
    pub fn of(s: &str) -> Self {
        let mut counts = [0; 6];
        for c in s.chars() {
            if let Some(idx) = STRUCTURAL_CHARS.iter().position(|&k| k == c) {
                counts[idx] += 1;
            }
        }
        Self(counts)
    }

    /// Count for a single structural character, zero for any other.
    pub fn count(&self, c: char) -> usize {
        STRUCTURAL_CHARS
            .iter()
            .position(|&k| k == c)
            .map_or(0, |idx| self.0[idx])
    }
}

/// Normalize a line for comparison: case-fold and drop all whitespace.
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Count typed characters that cannot be placed, in order, in the reference.
///
/// Stops counting once `limit` is exceeded and returns `None`.
fn count_misses(typed: &str, reference: &str, limit: usize) -> Option<usize> {
    let reference: Vec<char> = reference.chars().collect();
    let mut cursor = 0;
    let mut misses = 0;

    for c in typed.chars() {
        match reference[cursor..].iter().position(|&r| r == c) {
            Some(offset) => cursor += offset + 1,
            None => {
                misses += 1;
                if misses > limit {
                    return None;
                }
            }
        }
    }

    Some(misses)
}

/// Result of comparing a typed line to the reference line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Whether the line is considered correct.
    pub is_correct: bool,
    /// Misses counted by the tolerant scan, if it ran to completion.
    pub misses: Option<usize>,
    /// Whether both lines share the same structural fingerprint.
    pub structure_matches: bool,
    /// The matching mode used.
    pub matching_mode: MatchingMode,
    /// Normalized typed line (for display).
    pub typed_normalized: String,
    /// Normalized reference line (for display).
    pub reference_normalized: String,
}

impl MatchResult {
    /// Structural characters whose counts differ between the two lines.
    pub fn structural_differences(&self) -> Vec<char> {
        let typed = Fingerprint::of(&self.typed_normalized);
        let reference = Fingerprint::of(&self.reference_normalized);
        STRUCTURAL_CHARS
            .into_iter()
            .filter(|&c| typed.count(c) != reference.count(c))
            .collect()
    }
}

/// Compares typed lines to reference lines under one matching policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    pub mode: MatchingMode,
    pub max_misses: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            mode: MatchingMode::default(),
            max_misses: 2,
        }
    }
}

impl Matcher {
    pub fn new(mode: MatchingMode, max_misses: usize) -> Self {
        Self { mode, max_misses }
    }

    /// Apply the policy to normalized strings: verdict, tolerant misses and
    /// whether the fingerprints agree.
    fn judge(&self, typed: &str, reference: &str) -> (bool, Option<usize>, bool) {
        let structure_matches = Fingerprint::of(typed) == Fingerprint::of(reference);
        match self.mode {
            MatchingMode::Exact => (typed == reference, None, structure_matches),
            MatchingMode::Tolerant if structure_matches => {
                let misses = count_misses(typed, reference, self.max_misses);
                (misses.is_some(), misses, true)
            }
            MatchingMode::Tolerant => (false, None, false),
        }
    }

    /// Decide whether two already-normalized strings match.
    pub fn matches(&self, typed: &str, reference: &str) -> bool {
        self.judge(typed, reference).0
    }

    /// Normalize both lines and compare them.
    pub fn compare(&self, typed: &str, reference: &str) -> MatchResult {
        let typed_normalized = normalize(typed);
        let reference_normalized = normalize(reference);
        let (is_correct, misses, structure_matches) =
            self.judge(&typed_normalized, &reference_normalized);

        tracing::trace!(
            mode = self.mode.as_str(),
            is_correct,
            ?misses,
            structure_matches,
            "compared line"
        );

        MatchResult {
            is_correct,
            misses,
            structure_matches,
            matching_mode: self.mode,
            typed_normalized,
            reference_normalized,
        }
    }
}
