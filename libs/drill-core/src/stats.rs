//! Progress tracking for a drill session.

use serde::{Deserialize, Serialize};

/// How a line left the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealKind {
    /// Typed correctly.
    Typed,
    /// Attempt limit exhausted.
    Forced,
    /// Skipped on request.
    Skipped,
    /// Not drillable.
    AutoSkipped,
}

/// Counters accumulated over one loaded document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub first_try: u32,
    pub after_retry: u32,
    pub forced: u32,
    pub skipped: u32,
    pub auto_skipped: u32,
    pub failed_submissions: u32,
}

impl SessionStats {
    /// Record a consumed line.
    pub fn record(&mut self, kind: RevealKind, attempt: u32) {
        match kind {
            RevealKind::Typed if attempt == 1 => self.first_try += 1,
            RevealKind::Typed => self.after_retry += 1,
            RevealKind::Forced => self.forced += 1,
            RevealKind::Skipped => self.skipped += 1,
            RevealKind::AutoSkipped => self.auto_skipped += 1,
        }
    }

    /// Lines the user was asked to type (everything but auto-skips).
    pub fn drilled(&self) -> u32 {
        self.first_try + self.after_retry + self.forced + self.skipped
    }

    /// Share of drilled lines typed correctly on the first attempt.
    pub fn first_try_accuracy(&self) -> f64 {
        match self.drilled() {
            0 => 1.0,
            drilled => self.first_try as f64 / drilled as f64,
        }
    }
}

/// Cursor position within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// Completion percentage (100 for an empty document).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.current as f64 * 100.0 / self.total as f64
    }
}
