//! Terminal rendering of the drill.
//!
//! Everything is written to a generic writer so the driver can be tested
//! against an in-memory buffer. Colors are optional.

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use drill_core::{RevealedLine, Step};
use std::io::{self, Write};

const HIGHLIGHT: Color = Color::Cyan;
const CORRECT: Color = Color::Green;
const WRONG: Color = Color::Red;
const HINT: Color = Color::Yellow;
const MUTED: Color = Color::DarkGrey;

/// Writes drill output to a terminal or buffer.
pub struct Display<W: Write> {
    out: W,
    color: bool,
}

impl<W: Write> Display<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(
                self.out,
                SetForegroundColor(color),
                Print(text),
                ResetColor
            )
        } else {
            write!(self.out, "{text}")
        }
    }

    fn paint_line(&mut self, color: Color, text: &str) -> io::Result<()> {
        self.paint(color, text)?;
        writeln!(self.out)
    }

    pub fn title(&mut self, name: &str, lines: usize) -> io::Result<()> {
        let unit = if lines == 1 { "line" } else { "lines" };
        writeln!(self.out, "Memorizing: {name} ({lines} {unit})")?;
        self.paint_line(
            MUTED,
            "Type each line and press Enter. :skip reveals a line, :hint shows its hint, :quit stops.",
        )
    }

    /// Append lines to the code view; auto-skipped lines are highlighted.
    pub fn revealed(&mut self, lines: &[RevealedLine]) -> io::Result<()> {
        for line in lines {
            let number = format!("{:>4} | ", line.line_number + 1);
            self.paint(MUTED, &number)?;
            let text = line.view.display();
            if line.highlighted {
                self.paint_line(HIGHLIGHT, &text)?;
            } else {
                writeln!(self.out, "{text}")?;
            }
        }
        Ok(())
    }

    pub fn hint(&mut self, hint: &str) -> io::Result<()> {
        self.paint_line(HINT, &format!("Hint: {hint}"))
    }

    pub fn correct(&mut self) -> io::Result<()> {
        self.paint_line(CORRECT, "Correct")
    }

    pub fn skipped(&mut self) -> io::Result<()> {
        self.paint_line(MUTED, "Skipped")
    }

    pub fn retry(&mut self, step: &Step) -> io::Result<()> {
        let structure = match &step.comparison {
            Some(c) if !c.structure_matches => {
                let chars: Vec<String> = c
                    .structural_differences()
                    .iter()
                    .map(char::to_string)
                    .collect();
                format!(", check {}", chars.join(" "))
            }
            _ => String::new(),
        };
        self.paint_line(
            WRONG,
            &format!("Try again (attempt {}){structure}", step.attempt),
        )
    }

    pub fn forced(&mut self, previous_answer: Option<&str>) -> io::Result<()> {
        self.paint_line(WRONG, "Out of attempts, moving on")?;
        if let Some(answer) = previous_answer {
            self.paint_line(MUTED, &format!("You typed: {answer}"))?;
        }
        Ok(())
    }

    pub fn finished(&mut self) -> io::Result<()> {
        self.paint_line(CORRECT, "Congratulations! You have finished typing the file.")?;
        self.paint_line(MUTED, "Use :load <FILE> to drill another file or :quit to stop.")
    }

    pub fn prompt(&mut self, current: usize, total: usize) -> io::Result<()> {
        self.paint(MUTED, &format!("[{}/{}] > ", current + 1, total))?;
        self.out.flush()
    }

    pub fn message(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        self.paint_line(WRONG, text)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
