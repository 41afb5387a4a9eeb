//! Line projections: comment stripping, hints and skip classification.

use serde::{Deserialize, Serialize};

/// Hint text used when the current line carries no comment.
pub const NO_HINT: &str = "no hint available";

/// Comment-stripped, trimmed projection of a raw source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineView {
    /// Text used for comparison and display.
    pub text: String,
    /// Leading whitespace of the raw line.
    pub indent: String,
}

impl LineView {
    /// Project a raw line, dropping everything from the first delimiter on.
    pub fn new(raw: &str, delimiter: &str) -> Self {
        let code = strip_comment(raw, delimiter);
        let text = code.trim();
        let indent = if text.is_empty() {
            String::new()
        } else {
            code[..code.len() - code.trim_start().len()].to_string()
        };
        Self {
            text: text.to_string(),
            indent,
        }
    }

    /// Text with its original indentation restored.
    pub fn display(&self) -> String {
        format!("{}{}", self.indent, self.text)
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Portion of the line before the first comment delimiter.
pub fn strip_comment<'a>(raw: &'a str, delimiter: &str) -> &'a str {
    raw.split_once(delimiter).map_or(raw, |(code, _)| code)
}

/// Trimmed text after the first comment delimiter, if the line has one.
pub fn hint_text<'a>(raw: &'a str, delimiter: &str) -> Option<&'a str> {
    raw.split_once(delimiter).map(|(_, comment)| comment.trim())
}

/// Hint shown for a drillable line.
pub fn hint_for(raw: &str, delimiter: &str) -> String {
    hint_text(raw, delimiter).unwrap_or(NO_HINT).to_string()
}

/// Whether a line is skipped without drilling.
///
/// Blank lines (after comment stripping) are always skipped; markers are
/// matched against the raw line, comment included.
pub fn is_skippable<S: AsRef<str>>(raw: &str, delimiter: &str, markers: &[S]) -> bool {
    strip_comment(raw, delimiter).trim().is_empty()
        || markers.iter().any(|m| raw.contains(m.as_ref()))
}
