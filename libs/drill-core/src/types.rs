//! Settings and shared types for drill sessions.

use crate::error::{DrillError, Result};
use serde::{Deserialize, Serialize};

/// Number of attempts at which the hint is surfaced in a retry.
pub const HINT_ATTEMPT: u32 = 2;

/// Matching policy for typed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    /// Normalized equality.
    Exact,
    /// Structural fingerprint plus bounded-miss subsequence scan.
    Tolerant,
}

impl Default for MatchingMode {
    fn default() -> Self {
        Self::Tolerant
    }
}

impl MatchingMode {
    /// Get the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Tolerant => "tolerant",
        }
    }
}

/// When the host should display the hint of the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintPolicy {
    /// Show the hint as soon as a line becomes current.
    Always,
    /// Show the hint only once the line has been missed.
    AfterMiss,
}

impl Default for HintPolicy {
    fn default() -> Self {
        Self::Always
    }
}

/// Well-known skip markers for Python-like sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipMarker {
    FunctionDef,
    Docstring,
    Import,
    FromImport,
    Load,
}

impl SkipMarker {
    /// Substring that marks a line as skippable.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::FunctionDef => "def",
            Self::Docstring => "\"\"\"",
            Self::Import => "import",
            Self::FromImport => "from",
            Self::Load => "load",
        }
    }

    /// Get the preset name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionDef => "def",
            Self::Docstring => "docstring",
            Self::Import => "import",
            Self::FromImport => "from-import",
            Self::Load => "load",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "def" => Some(Self::FunctionDef),
            "docstring" => Some(Self::Docstring),
            "import" => Some(Self::Import),
            "from-import" => Some(Self::FromImport),
            "load" => Some(Self::Load),
            _ => None,
        }
    }
}

/// Drill settings, usually read from a JSON settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DrillSettings {
    pub matching_mode: MatchingMode,
    /// Misses tolerated by the tolerant matcher.
    pub max_misses: usize,
    /// Attempt count at which a line is force-advanced.
    pub max_attempts: u32,
    pub comment_delimiter: String,
    pub skip_markers: Vec<String>,
    pub hint_policy: HintPolicy,
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self {
            matching_mode: MatchingMode::default(),
            max_misses: 2,
            max_attempts: 3,
            comment_delimiter: "#".to_string(),
            skip_markers: vec![
                SkipMarker::FunctionDef.pattern().to_string(),
                SkipMarker::Docstring.pattern().to_string(),
            ],
            hint_policy: HintPolicy::default(),
        }
    }
}

impl DrillSettings {
    /// Apply overrides on top of these settings.
    pub fn merge(&self, overrides: &SettingsOverrides) -> Self {
        Self {
            matching_mode: overrides.matching_mode.unwrap_or(self.matching_mode),
            max_misses: overrides.max_misses.unwrap_or(self.max_misses),
            max_attempts: overrides.max_attempts.unwrap_or(self.max_attempts),
            comment_delimiter: overrides
                .comment_delimiter
                .clone()
                .unwrap_or_else(|| self.comment_delimiter.clone()),
            skip_markers: overrides
                .skip_markers
                .clone()
                .unwrap_or_else(|| self.skip_markers.clone()),
            hint_policy: overrides.hint_policy.unwrap_or(self.hint_policy),
        }
    }

    /// Check that the settings describe a usable session.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts < HINT_ATTEMPT {
            return Err(DrillError::InvalidSettings(format!(
                "max_attempts must be at least {HINT_ATTEMPT}, got {}",
                self.max_attempts
            )));
        }
        if self.comment_delimiter.is_empty() {
            return Err(DrillError::InvalidSettings(
                "comment_delimiter must not be empty".to_string(),
            ));
        }
        if self.skip_markers.iter().any(|m| m.is_empty()) {
            return Err(DrillError::InvalidSettings(
                "skip markers must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Optional overrides for drill settings (all fields optional).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_mode: Option<MatchingMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_misses: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_markers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint_policy: Option<HintPolicy>,
}
