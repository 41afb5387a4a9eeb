//! Input loop: turns submitted lines into session events and renders the
//! results.

use crate::display::Display;
use crate::loader::load_document;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use drill_core::{DrillError, DrillSession, HintPolicy, Landing, Outcome, SourceDocument, Step};
use std::io::{BufRead, Write};
use std::path::Path;

/// A line read from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Submit(&'a str),
    Skip,
    Hint,
    Load(&'a str),
    Quit,
    Unknown(&'a str),
    Empty,
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Self::Empty;
        }
        let Some(command) = trimmed.strip_prefix(':') else {
            return Self::Submit(line);
        };

        match command.split_once(char::is_whitespace) {
            Some(("load", path)) if !path.trim().is_empty() => Self::Load(path.trim()),
            None if command == "skip" => Self::Skip,
            None if command == "hint" => Self::Hint,
            None if command == "quit" || command == "q" => Self::Quit,
            _ => Self::Unknown(trimmed),
        }
    }
}

/// Drives one session from an input stream.
pub struct Driver<W: Write> {
    session: DrillSession,
    display: Display<W>,
    started_at: DateTime<Utc>,
}

impl<W: Write> Driver<W> {
    pub fn new(session: DrillSession, display: Display<W>) -> Self {
        Self {
            session,
            display,
            started_at: Utc::now(),
        }
    }

    pub fn session(&self) -> &DrillSession {
        &self.session
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn into_display(self) -> Display<W> {
        self.display
    }

    /// Load a document and render its title and leading skipped lines.
    pub fn start(&mut self, document: SourceDocument) -> Result<()> {
        let name = document.name().unwrap_or("<unnamed>").to_string();
        let lines = document.len();
        self.started_at = Utc::now();

        let landing = self.session.load(document);
        self.display.title(&name, lines)?;
        self.render_landing(&landing)
    }

    /// Read commands until `:quit` or end of input. Input that is not valid
    /// UTF-8 is decoded lossily.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<()> {
        self.prompt()?;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = input
                .read_until(b'\n', &mut buf)
                .context("failed to read input")?;
            if read == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            match Command::parse(&line) {
                Command::Quit => break,
                Command::Empty => {}
                Command::Hint => match self.session.hint() {
                    Some(hint) => {
                        let hint = hint.to_string();
                        self.display.hint(&hint)?;
                    }
                    None => self.display.message("Nothing to hint.")?,
                },
                Command::Skip => {
                    let step = self.session.skip();
                    self.handle(step, true)?;
                }
                Command::Submit(text) => {
                    let step = self.session.submit(text);
                    self.handle(step, false)?;
                }
                Command::Load(path) => {
                    if let Err(err) = self.reload(Path::new(path)) {
                        tracing::warn!(error = %err, "could not load file");
                        self.display.error(&format!("{err:#}"))?;
                    }
                }
                Command::Unknown(command) => {
                    self.display.error(&format!(
                        "Unknown command {command}. Try :skip, :hint, :load <FILE> or :quit."
                    ))?;
                }
            }
            self.prompt()?;
        }
        self.display.message("")?;
        self.display.flush()?;
        Ok(())
    }

    fn reload(&mut self, path: &Path) -> Result<()> {
        let document = load_document(path)?;
        self.start(document)
    }

    fn prompt(&mut self) -> Result<()> {
        if !self.session.is_finished() {
            let progress = self.session.progress();
            self.display.prompt(progress.current, progress.total)?;
        }
        Ok(())
    }

    fn handle(&mut self, step: drill_core::Result<Step>, skipped: bool) -> Result<()> {
        let step = match step {
            Ok(step) => step,
            Err(err @ DrillError::InvalidState) => {
                self.display.error(&err.to_string())?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        match step.outcome {
            Outcome::Retry => {
                self.display.retry(&step)?;
                // Under `Always` the hint is already on screen from the landing.
                if self.session.settings().hint_policy != HintPolicy::Always {
                    if let Some(hint) = &step.hint {
                        self.display.hint(hint)?;
                    }
                }
                return Ok(());
            }
            Outcome::Advanced if skipped => self.display.skipped()?,
            Outcome::Advanced => self.display.correct()?,
            Outcome::ForcedAdvance => self.display.forced(step.previous_answer.as_deref())?,
        }

        self.display.revealed(&step.revealed)?;
        self.render_arrival(step.hint.as_deref(), step.finished)
    }

    fn render_landing(&mut self, landing: &Landing) -> Result<()> {
        self.display.revealed(&landing.revealed)?;
        self.render_arrival(landing.hint.as_deref(), landing.finished)
    }

    fn render_arrival(&mut self, hint: Option<&str>, finished: bool) -> Result<()> {
        if finished {
            self.display.finished()?;
        } else if let Some(hint) = hint {
            if self.session.settings().hint_policy == HintPolicy::Always {
                self.display.hint(hint)?;
            }
        }
        Ok(())
    }
}
