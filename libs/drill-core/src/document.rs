//! Source documents drilled by a session.

use serde::{Deserialize, Serialize};

/// Ordered, immutable sequence of raw source lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    lines: Vec<String>,
}

impl SourceDocument {
    /// Create a document from lines without embedded terminators.
    pub fn new(lines: Vec<String>) -> Self {
        Self { name: None, lines }
    }

    /// Split raw text into lines, dropping terminators and a leading BOM.
    pub fn parse(content: &str) -> Self {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        Self::new(content.lines().map(str::to_string).collect())
    }

    /// Attach a display name, usually the file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<String>> for SourceDocument {
    fn from(lines: Vec<String>) -> Self {
        Self::new(lines)
    }
}

impl From<&[&str]> for SourceDocument {
    fn from(lines: &[&str]) -> Self {
        Self::new(lines.iter().map(|l| l.to_string()).collect())
    }
}
