//! Core engine for line-by-line code memorization drills.
//!
//! Provides:
//! - Tolerant line matching (structural fingerprint + bounded-miss scan)
//! - Line projections (comment stripping, hints, skip classification)
//! - The drill session state machine and its progress statistics
//! - Shared settings types

pub mod document;
pub mod error;
pub mod line;
pub mod matching;
pub mod session;
pub mod stats;
pub mod types;

pub use document::SourceDocument;
pub use error::{DrillError, Result};
pub use line::{LineView, NO_HINT};
pub use matching::{normalize, Fingerprint, MatchResult, Matcher};
pub use session::{DrillSession, Landing, Outcome, RevealedLine, SessionState, Step};
pub use stats::{Progress, RevealKind, SessionStats};
pub use types::{DrillSettings, HintPolicy, MatchingMode, SettingsOverrides, SkipMarker};
