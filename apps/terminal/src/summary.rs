//! End-of-session summary.

use chrono::{DateTime, Utc};
use drill_core::{DrillSession, SessionStats};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: i64,
    pub total_lines: usize,
    pub position: usize,
    pub finished: bool,
    pub stats: SessionStats,
    pub first_try_accuracy: f64,
    pub percent_complete: f64,
}

impl SessionSummary {
    pub fn collect(session: &DrillSession, started_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let stats = session.stats();
        let progress = session.progress();
        Self {
            file: session.document().name().map(str::to_string),
            started_at,
            elapsed_secs: (now - started_at).num_seconds().max(0),
            total_lines: progress.total,
            position: progress.current,
            finished: session.is_finished(),
            stats,
            first_try_accuracy: stats.first_try_accuracy(),
            percent_complete: progress.percent(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut lines = vec![format!(
            "Session summary: {}",
            self.file.as_deref().unwrap_or("<no file>")
        )];
        lines.push(format!(
            "  progress:    {}/{} lines{}, {:.0}% done",
            self.position,
            self.total_lines,
            if self.finished { " (finished)" } else { "" },
            self.percent_complete
        ));
        lines.push(format!(
            "  typed:       {} first try, {} after retry",
            self.stats.first_try, self.stats.after_retry
        ));
        lines.push(format!(
            "  revealed:    {} out of attempts, {} skipped, {} auto-skipped",
            self.stats.forced, self.stats.skipped, self.stats.auto_skipped
        ));
        lines.push(format!(
            "  accuracy:    {:.0}% first try, {} wrong submissions",
            self.first_try_accuracy * 100.0,
            self.stats.failed_submissions
        ));
        lines.push(format!(
            "  started:     {} ({}s)",
            self.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.elapsed_secs
        ));
        lines.join("\n")
    }
}
