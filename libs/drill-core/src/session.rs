//! Drill session state machine.
//!
//! A session owns one loaded document and a cursor into it. Every cursor
//! move is followed by a skip-advance pass that consumes non-drillable lines,
//! so between calls the cursor always rests on a drillable line or at the
//! end of the document.

use crate::document::SourceDocument;
use crate::error::{DrillError, Result};
use crate::line::{self, LineView};
use crate::matching::{MatchResult, Matcher};
use crate::stats::{Progress, RevealKind, SessionStats};
use crate::types::{DrillSettings, HINT_ATTEMPT};
use serde::{Deserialize, Serialize};

/// Coarse session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingInput,
    Finished,
}

/// Outcome of a submission or skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Advanced,
    Retry,
    ForcedAdvance,
}

/// A consumed line, in the order it was revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedLine {
    /// 0-based index into the document.
    pub line_number: usize,
    pub view: LineView,
    /// Set for auto-skipped lines only.
    pub highlighted: bool,
    pub kind: RevealKind,
}

/// Result of loading a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    /// Lines auto-skipped before reaching the first drillable line.
    pub revealed: Vec<RevealedLine>,
    /// Hint for the line the cursor landed on.
    pub hint: Option<String>,
    /// Set once when the session becomes finished.
    pub finished: bool,
}

/// Result of a submission or skip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub outcome: Outcome,
    /// Attempt counter after the call.
    pub attempt: u32,
    /// Hint to display: the retry hint, or the hint of the new current line.
    pub hint: Option<String>,
    /// Last typed text of a force-advanced line.
    pub previous_answer: Option<String>,
    /// Lines consumed by this call, including auto-skipped ones.
    pub revealed: Vec<RevealedLine>,
    /// Set once when the session becomes finished.
    pub finished: bool,
    /// Comparison details, absent for explicit skips.
    pub comparison: Option<MatchResult>,
}

/// Line-by-line drill over a single document.
#[derive(Debug, Clone)]
pub struct DrillSession {
    settings: DrillSettings,
    matcher: Matcher,
    document: SourceDocument,
    current_line: usize,
    attempt: u32,
    revealed: Vec<RevealedLine>,
    hint: Option<String>,
    previous_answer: Option<String>,
    finish_signalled: bool,
    stats: SessionStats,
}

impl DrillSession {
    /// Create a session with no document loaded (finished until `load`).
    pub fn new(settings: DrillSettings) -> Result<Self> {
        settings.validate()?;
        let matcher = Matcher::new(settings.matching_mode, settings.max_misses);
        Ok(Self {
            settings,
            matcher,
            document: SourceDocument::default(),
            current_line: 0,
            attempt: 1,
            revealed: Vec::new(),
            hint: None,
            previous_answer: None,
            finish_signalled: true,
            stats: SessionStats::default(),
        })
    }

    /// Replace the document and all session state, then skip to the first
    /// drillable line.
    pub fn load(&mut self, document: SourceDocument) -> Landing {
        tracing::debug!(
            name = document.name().unwrap_or("<unnamed>"),
            lines = document.len(),
            "loading document"
        );

        self.document = document;
        self.current_line = 0;
        self.attempt = 1;
        self.revealed.clear();
        self.hint = None;
        self.previous_answer = None;
        self.finish_signalled = false;
        self.stats = SessionStats::default();

        let (hint, finished) = self.settle();
        Landing {
            revealed: self.revealed.clone(),
            hint,
            finished,
        }
    }

    /// Judge a typed line against the current line.
    pub fn submit(&mut self, typed: &str) -> Result<Step> {
        let reference = self.current_view().ok_or(DrillError::InvalidState)?;
        let comparison = self.matcher.compare(typed, &reference.text);
        let mark = self.revealed.len();

        if comparison.is_correct {
            self.previous_answer = None;
            self.consume(RevealKind::Typed);
            return Ok(self.advance_step(Outcome::Advanced, mark, Some(comparison)));
        }

        self.attempt += 1;
        self.stats.failed_submissions += 1;

        if self.attempt >= self.settings.max_attempts {
            tracing::debug!(line = self.current_line, "attempts exhausted, moving on");
            self.consume(RevealKind::Forced);
            self.previous_answer = Some(typed.to_string());
            return Ok(self.advance_step(Outcome::ForcedAdvance, mark, Some(comparison)));
        }

        let hint = if self.attempt == HINT_ATTEMPT {
            self.hint.clone()
        } else {
            None
        };
        Ok(Step {
            outcome: Outcome::Retry,
            attempt: self.attempt,
            hint,
            previous_answer: None,
            revealed: Vec::new(),
            finished: false,
            comparison: Some(comparison),
        })
    }

    /// Reveal the current line without checking it.
    pub fn skip(&mut self) -> Result<Step> {
        if self.is_finished() {
            return Err(DrillError::InvalidState);
        }
        tracing::debug!(line = self.current_line, "skipping line");

        let mark = self.revealed.len();
        self.previous_answer = None;
        self.consume(RevealKind::Skipped);
        Ok(self.advance_step(Outcome::Advanced, mark, None))
    }

    pub fn is_finished(&self) -> bool {
        self.current_line >= self.document.len()
    }

    pub fn state(&self) -> SessionState {
        if self.is_finished() {
            SessionState::Finished
        } else {
            SessionState::AwaitingInput
        }
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// Raw text of the current line.
    pub fn current_raw(&self) -> Option<&str> {
        self.document.line(self.current_line)
    }

    /// Projection of the current line used for comparison.
    pub fn current_view(&self) -> Option<LineView> {
        self.current_raw()
            .map(|raw| LineView::new(raw, &self.settings.comment_delimiter))
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Hint of the current line, recomputed whenever the cursor lands.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn previous_answer(&self) -> Option<&str> {
        self.previous_answer.as_deref()
    }

    pub fn revealed(&self) -> &[RevealedLine] {
        &self.revealed
    }

    pub fn document(&self) -> &SourceDocument {
        &self.document
    }

    pub fn settings(&self) -> &DrillSettings {
        &self.settings
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: self.current_line,
            total: self.document.len(),
        }
    }

    fn advance_step(
        &mut self,
        outcome: Outcome,
        mark: usize,
        comparison: Option<MatchResult>,
    ) -> Step {
        let (hint, finished) = self.settle();
        Step {
            outcome,
            attempt: self.attempt,
            hint,
            previous_answer: self.previous_answer.clone(),
            revealed: self.revealed[mark..].to_vec(),
            finished,
            comparison,
        }
    }

    /// Append the current line to the log and move the cursor past it.
    fn consume(&mut self, kind: RevealKind) {
        let Some(view) = self.current_view() else {
            return;
        };
        self.stats.record(kind, self.attempt);
        self.revealed.push(RevealedLine {
            line_number: self.current_line,
            view,
            highlighted: kind == RevealKind::AutoSkipped,
            kind,
        });
        self.current_line += 1;
        self.attempt = 1;
    }

    fn current_is_skippable(&self) -> bool {
        self.current_raw().is_some_and(|raw| {
            line::is_skippable(
                raw,
                &self.settings.comment_delimiter,
                &self.settings.skip_markers,
            )
        })
    }

    /// Skip-advance: consume non-drillable lines, then either refresh the
    /// hint or report the transition into `Finished`.
    fn settle(&mut self) -> (Option<String>, bool) {
        while self.current_is_skippable() {
            self.consume(RevealKind::AutoSkipped);
        }

        match self.current_raw() {
            Some(raw) => {
                let hint = line::hint_for(raw, &self.settings.comment_delimiter);
                self.hint = Some(hint.clone());
                (Some(hint), false)
            }
            None => {
                self.hint = None;
                let finished = !self.finish_signalled;
                self.finish_signalled = true;
                if finished {
                    tracing::debug!(lines = self.document.len(), "document finished");
                }
                (None, finished)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::NO_HINT;
    use crate::types::{MatchingMode, SkipMarker};
    use pretty_assertions::assert_eq;

    fn settings_with_markers(markers: &[&str]) -> DrillSettings {
        DrillSettings {
            skip_markers: markers.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    fn scenario_doc() -> SourceDocument {
        SourceDocument::from(&["x = 1", "", "def f():", "    return x", "# comment only"][..])
    }

    fn loaded(lines: &[&str], markers: &[&str]) -> (DrillSession, Landing) {
        let mut session = DrillSession::new(settings_with_markers(markers)).unwrap();
        let landing = session.load(SourceDocument::from(lines));
        (session, landing)
    }

    fn assert_log_matches_cursor(session: &DrillSession) {
        assert_eq!(session.revealed().len(), session.current_line());
    }

    #[test]
    fn new_session_is_finished_and_rejects_input() {
        let mut session = DrillSession::new(DrillSettings::default()).unwrap();
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.submit("x").unwrap_err(), DrillError::InvalidState);
        assert_eq!(session.skip().unwrap_err(), DrillError::InvalidState);
    }

    #[test]
    fn new_session_rejects_invalid_settings() {
        let settings = DrillSettings {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(
            DrillSession::new(settings),
            Err(DrillError::InvalidSettings(_))
        ));
    }

    #[test]
    fn load_on_drillable_first_line() {
        let mut session = DrillSession::new(settings_with_markers(&["def"])).unwrap();
        let landing = session.load(scenario_doc());
        assert_eq!(session.current_line(), 0);
        assert!(landing.revealed.is_empty());
        assert_eq!(landing.hint.as_deref(), Some(NO_HINT));
        assert!(!landing.finished);
        assert_eq!(session.state(), SessionState::AwaitingInput);
    }

    #[test]
    fn scenario_auto_skips_and_finishes_once() {
        let mut session = DrillSession::new(settings_with_markers(&["def"])).unwrap();
        session.load(scenario_doc());

        let step = session.submit("x=1").unwrap();
        assert_eq!(step.outcome, Outcome::Advanced);
        // Blank line and `def` line are skipped on the way to `return x`.
        assert_eq!(session.current_line(), 3);
        let highlighted: Vec<usize> = step
            .revealed
            .iter()
            .filter(|r| r.highlighted)
            .map(|r| r.line_number)
            .collect();
        assert_eq!(highlighted, vec![1, 2]);
        assert_eq!(session.revealed().iter().filter(|r| r.highlighted).count(), 2);
        assert_log_matches_cursor(&session);

        let step = session.submit("return x").unwrap();
        assert_eq!(step.outcome, Outcome::Advanced);
        assert_eq!(session.current_line(), 5);
        assert!(step.finished);
        assert!(step.revealed[1].highlighted);
        assert_eq!(step.revealed[1].kind, RevealKind::AutoSkipped);
        assert!(session.is_finished());
        assert_log_matches_cursor(&session);

        assert_eq!(session.submit("anything").unwrap_err(), DrillError::InvalidState);
    }

    #[test]
    fn load_skips_leading_non_drillable_lines() {
        let (session, landing) = loaded(&["", "def f():", "    return x  # value"], &["def"]);
        assert_eq!(session.current_line(), 2);
        assert_eq!(landing.revealed.len(), 2);
        assert!(landing.revealed.iter().all(|r| r.highlighted));
        assert_eq!(landing.hint.as_deref(), Some("value"));
        assert_log_matches_cursor(&session);
    }

    #[test]
    fn load_empty_document_finishes_immediately() {
        let (session, landing) = loaded(&[], &["def"]);
        assert!(landing.finished);
        assert!(landing.revealed.is_empty());
        assert_eq!(landing.hint, None);
        assert_eq!(session.state(), SessionState::Finished);
    }

    #[test]
    fn load_fully_skippable_document_finishes() {
        let (session, landing) = loaded(&["", "# only comments", "def f():"], &["def"]);
        assert!(landing.finished);
        assert_eq!(landing.revealed.len(), 3);
        assert_eq!(session.stats().auto_skipped, 3);
    }

    #[test]
    fn load_replaces_previous_state() {
        let (mut session, _) = loaded(&["a = 1", "b = 2"], &[]);
        session.submit("wrong").unwrap();
        session.submit("a = 1").unwrap();
        let landing = session.load(SourceDocument::from(&["c = 3"][..]));
        assert!(!landing.finished);
        assert_eq!(session.current_line(), 0);
        assert_eq!(session.attempt(), 1);
        assert!(session.revealed().is_empty());
        assert_eq!(session.stats(), SessionStats::default());
    }

    #[test]
    fn first_miss_retries_with_hint_then_forces() {
        let (mut session, _) = loaded(&["total = a + b  # add them", "print(total)"], &[]);

        let step = session.submit("zzz = q").unwrap();
        assert_eq!(step.outcome, Outcome::Retry);
        assert_eq!(step.attempt, 2);
        assert_eq!(step.hint.as_deref(), Some("add them"));
        assert_eq!(session.current_line(), 0);
        assert!(step.revealed.is_empty());

        let step = session.submit("qqq = z").unwrap();
        assert_eq!(step.outcome, Outcome::ForcedAdvance);
        assert_eq!(step.attempt, 1);
        assert_eq!(step.previous_answer.as_deref(), Some("qqq = z"));
        assert_eq!(session.previous_answer(), Some("qqq = z"));
        assert_eq!(session.current_line(), 1);
        assert_eq!(step.revealed.len(), 1);
        assert!(!step.revealed[0].highlighted);
        assert_eq!(step.revealed[0].kind, RevealKind::Forced);
        assert_log_matches_cursor(&session);

        // A further miss counts against the next line.
        let step = session.submit("nope").unwrap();
        assert_eq!(step.outcome, Outcome::Retry);
        assert_eq!(step.hint.as_deref(), Some(NO_HINT));
    }

    #[test]
    fn higher_attempt_limit_retries_without_hint_after_threshold() {
        let settings = DrillSettings {
            max_attempts: 4,
            skip_markers: Vec::new(),
            ..Default::default()
        };
        let mut session = DrillSession::new(settings).unwrap();
        session.load(SourceDocument::from(&["f(x)  # call f"][..]));

        let first = session.submit("g").unwrap();
        assert_eq!((first.outcome, first.attempt), (Outcome::Retry, 2));
        assert_eq!(first.hint.as_deref(), Some("call f"));

        let second = session.submit("g").unwrap();
        assert_eq!((second.outcome, second.attempt), (Outcome::Retry, 3));
        assert_eq!(second.hint, None);
        assert_eq!(session.hint(), Some("call f"));

        let third = session.submit("g").unwrap();
        assert_eq!(third.outcome, Outcome::ForcedAdvance);
        assert!(third.finished);
    }

    #[test]
    fn correct_submission_advances_regardless_of_attempt() {
        let (mut session, _) = loaded(&["value = compute(a, b)", "done()"], &[]);
        session.submit("nothing like it").unwrap();
        assert_eq!(session.attempt(), 2);

        let step = session.submit("value = compute(a, b)").unwrap();
        assert_eq!(step.outcome, Outcome::Advanced);
        assert_eq!(session.attempt(), 1);
        assert_eq!(session.stats().after_retry, 1);
    }

    #[test]
    fn success_clears_previous_answer() {
        let (mut session, _) = loaded(&["a = 1", "b = 2", "c = 3"], &[]);
        session.submit("zz").unwrap();
        session.submit("zz").unwrap();
        assert_eq!(session.previous_answer(), Some("zz"));

        let step = session.submit("B = 2").unwrap();
        assert_eq!(step.previous_answer, None);
        assert_eq!(session.previous_answer(), None);
    }

    #[test]
    fn submission_ignores_case_and_whitespace() {
        let (mut session, _) = loaded(&["    Result = Foo.Bar(x)  # call"], &[]);
        let step = session.submit("  result=foo.bar( X )  ").unwrap();
        assert_eq!(step.outcome, Outcome::Advanced);
        assert!(step.finished);
    }

    #[test]
    fn near_miss_accepted_structural_change_rejected() {
        let (mut session, _) = loaded(&["items.append(value)", "x = items[0]"], &[]);
        let step = session.submit("items.apend(valeu)").unwrap();
        assert_eq!(step.outcome, Outcome::Advanced);

        let step = session.submit("x = items(0)").unwrap();
        assert_eq!(step.outcome, Outcome::Retry);
        assert_eq!(step.comparison.map(|c| c.structure_matches), Some(false));
    }

    #[test]
    fn exact_mode_rejects_near_miss() {
        let settings = DrillSettings {
            matching_mode: MatchingMode::Exact,
            ..Default::default()
        };
        let mut session = DrillSession::new(settings).unwrap();
        session.load(SourceDocument::from(&["items.append(value)"][..]));
        assert_eq!(
            session.submit("items.apend(value)").unwrap().outcome,
            Outcome::Retry
        );
        assert_eq!(
            session.submit("ITEMS.append( value )").unwrap().outcome,
            Outcome::Advanced
        );
    }

    #[test]
    fn skip_advances_and_resets_attempt() {
        let (mut session, _) = loaded(&["a = 1", "", "b = 2  # second"], &[]);
        session.submit("wrong").unwrap();

        let step = session.skip().unwrap();
        assert_eq!(step.outcome, Outcome::Advanced);
        assert_eq!(session.current_line(), 2);
        assert_eq!(session.attempt(), 1);
        assert_eq!(step.hint.as_deref(), Some("second"));
        assert_eq!(step.revealed[0].kind, RevealKind::Skipped);
        assert!(!step.revealed[0].highlighted);
        assert!(step.revealed[1].highlighted);
        assert_eq!(step.comparison, None);
        assert_log_matches_cursor(&session);
    }

    #[test]
    fn skip_to_end_signals_finish_once() {
        let (mut session, _) = loaded(&["a = 1"], &[]);
        let step = session.skip().unwrap();
        assert!(step.finished);
        assert_eq!(session.skip().unwrap_err(), DrillError::InvalidState);
    }

    #[test]
    fn invalid_state_leaves_session_untouched() {
        let (mut session, _) = loaded(&["a = 1"], &[]);
        session.submit("a = 1").unwrap();
        let before = (
            session.current_line(),
            session.attempt(),
            session.revealed().to_vec(),
            session.stats(),
        );
        assert!(session.submit("a = 1").is_err());
        assert!(session.skip().is_err());
        let after = (
            session.current_line(),
            session.attempt(),
            session.revealed().to_vec(),
            session.stats(),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn log_tracks_cursor_through_mixed_sequence() {
        let (mut session, _) = loaded(
            &[
                "import os",
                "def main():",
                "    path = os.getcwd()  # where we are",
                "",
                "    print(path)",
                "    return path",
            ],
            &["def", "import"],
        );
        assert_log_matches_cursor(&session);

        for action in ["nope()", "skip", "print(path)", "nope()", "nope()"] {
            if action == "skip" {
                session.skip().unwrap();
            } else {
                session.submit(action).unwrap();
            }
            assert_log_matches_cursor(&session);
            assert!(session.attempt() >= 1);
        }
        assert!(session.is_finished());

        let stats = session.stats();
        assert_eq!(stats.auto_skipped, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.first_try, 1);
        assert_eq!(stats.forced, 1);
        assert_eq!(stats.failed_submissions, 3);
        assert_eq!(
            stats.auto_skipped + stats.drilled(),
            session.revealed().len() as u32
        );
    }

    #[test]
    fn preset_markers_skip_imports_loads_and_docstrings() {
        let markers: Vec<&str> = [
            SkipMarker::Import,
            SkipMarker::FromImport,
            SkipMarker::Load,
            SkipMarker::FunctionDef,
            SkipMarker::Docstring,
        ]
        .into_iter()
        .map(SkipMarker::pattern)
        .collect();
        let (mut session, landing) = loaded(
            &[
                "from os import path",
                "import sys",
                "load(\"//rules:defs.bzl\", \"tool\")",
                "",
                "def main():",
                "    \"\"\"Join the first argument.\"\"\"",
                "    loaded = True",
                "    return path.join(sys.argv[0])  # join",
            ],
            &markers,
        );

        assert_eq!(session.current_line(), 7);
        assert_eq!(landing.revealed.len(), 7);
        assert!(landing.revealed.iter().all(|r| r.highlighted));
        assert_eq!(
            landing.revealed[5].view.display(),
            "    \"\"\"Join the first argument.\"\"\""
        );
        assert_eq!(landing.hint.as_deref(), Some("join"));
        assert_log_matches_cursor(&session);

        let step = session.submit("return path.join(sys.argv[0])").unwrap();
        assert_eq!(step.outcome, Outcome::Advanced);
        assert!(step.finished);
    }

    #[test]
    fn hint_refreshes_on_every_landing() {
        let (mut session, landing) = loaded(&["a = 1  # first", "b = 2", "c = 3  # third"], &[]);
        assert_eq!(landing.hint.as_deref(), Some("first"));
        assert_eq!(session.hint(), Some("first"));

        let step = session.submit("a = 1").unwrap();
        assert_eq!(step.hint.as_deref(), Some(NO_HINT));
        session.submit("b = 2").unwrap();
        assert_eq!(session.hint(), Some("third"));
        session.submit("c = 3").unwrap();
        assert_eq!(session.hint(), None);
    }

    #[test]
    fn revealed_views_keep_indentation_without_comments() {
        let (mut session, _) = loaded(&["if ok:", "    run()  # go"], &[]);
        session.submit("if ok:").unwrap();
        session.submit("run()").unwrap();
        let shown: Vec<String> = session.revealed().iter().map(|r| r.view.display()).collect();
        assert_eq!(shown, vec!["if ok:".to_string(), "    run()".to_string()]);
    }

    #[test]
    fn progress_follows_cursor() {
        let (mut session, _) = loaded(&["a = 1", "b = 2"], &[]);
        assert_eq!(session.progress(), Progress { current: 0, total: 2 });
        session.submit("a = 1").unwrap();
        assert_eq!(session.progress().percent(), 50.0);
    }
}
