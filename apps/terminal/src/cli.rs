//! Command-line interface for code-drill.
//!
//! ```text
//! # Drill a file with the default settings
//! code-drill script.py
//!
//! # Only accept exact lines, and also skip import lines
//! code-drill script.py --mode exact --skip-preset import --skip-preset from-import
//!
//! # Print the final summary as JSON
//! code-drill script.py --format json
//! ```

use clap::{Parser, ValueEnum};
use drill_core::{DrillSettings, HintPolicy, MatchingMode, SettingsOverrides, SkipMarker};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "code-drill")]
#[command(version)]
#[command(about = "Memorize a source file by retyping it line by line")]
#[command(
    long_about = "code-drill shows a source file one line at a time and asks you to retype it.\n\nNear-miss typing is accepted, blank and marked lines are skipped automatically, and comments are offered as hints.\n\nWhile drilling, type :skip to reveal the current line, :hint to show its hint, :load <FILE> to switch files and :quit to stop."
)]
pub struct Cli {
    /// Source file to memorize
    pub file: PathBuf,

    /// Settings file (defaults to <config dir>/code-drill/settings.json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Matching policy for typed lines
    #[arg(short, long)]
    pub mode: Option<ModeArg>,

    /// Characters the tolerant matcher may fail to place
    #[arg(long)]
    pub max_misses: Option<usize>,

    /// Attempts before a line is revealed and skipped
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Comment delimiter used for hints
    #[arg(long)]
    pub comment_delimiter: Option<String>,

    /// Substring marking a line as skipped (repeatable, replaces configured markers)
    #[arg(long = "skip-marker", value_name = "TEXT")]
    pub skip_markers: Vec<String>,

    /// Preset skip marker to add (def, docstring, import, from-import, load)
    #[arg(long = "skip-preset", value_name = "PRESET", value_parser = parse_preset)]
    pub skip_presets: Vec<SkipMarker>,

    /// When to show the hint of the current line
    #[arg(long)]
    pub hint_policy: Option<HintArg>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Session summary format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Exact,
    Tolerant,
}

impl From<ModeArg> for MatchingMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Exact => MatchingMode::Exact,
            ModeArg::Tolerant => MatchingMode::Tolerant,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum HintArg {
    Always,
    AfterMiss,
}

impl From<HintArg> for HintPolicy {
    fn from(arg: HintArg) -> Self {
        match arg {
            HintArg::Always => HintPolicy::Always,
            HintArg::AfterMiss => HintPolicy::AfterMiss,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_preset(s: &str) -> Result<SkipMarker, String> {
    SkipMarker::from_str(s).ok_or_else(|| {
        format!("unknown preset '{s}' (expected def, docstring, import, from-import or load)")
    })
}

impl Cli {
    /// Settings overrides given on the command line.
    ///
    /// Presets are appended to the explicit markers, or to the base markers
    /// when no explicit marker was given.
    pub fn overrides(&self, base: &DrillSettings) -> SettingsOverrides {
        let mut skip_markers = if self.skip_markers.is_empty() {
            None
        } else {
            Some(self.skip_markers.clone())
        };

        if !self.skip_presets.is_empty() {
            let markers = skip_markers.get_or_insert_with(|| base.skip_markers.clone());
            for preset in &self.skip_presets {
                let pattern = preset.pattern().to_string();
                if !markers.contains(&pattern) {
                    markers.push(pattern);
                }
            }
        }

        SettingsOverrides {
            matching_mode: self.mode.map(Into::into),
            max_misses: self.max_misses,
            max_attempts: self.max_attempts,
            comment_delimiter: self.comment_delimiter.clone(),
            skip_markers,
            hint_policy: self.hint_policy.map(Into::into),
        }
    }
}
