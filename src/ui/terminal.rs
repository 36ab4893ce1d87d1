use std::io::{self, Stdout, Write};

use crate::services::countdown::CountdownView;

/// Receives the derived countdown on every tick.
pub trait RenderSink {
    fn render(&mut self, view: &CountdownView) -> io::Result<()>;
}

/// Redraws a single status line in place.
pub struct TerminalRenderer<W: Write> {
    out: W,
    last_line: String,
}

impl TerminalRenderer<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_line: String::new(),
        }
    }

    /// End the status line so later output starts on a fresh line.
    pub fn finish(&mut self) -> io::Result<()> {
        if !self.last_line.is_empty() {
            writeln!(self.out)?;
            self.last_line.clear();
        }
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TerminalRenderer<W> {
    fn render(&mut self, view: &CountdownView) -> io::Result<()> {
        let line = status_line(view);
        if line == self.last_line {
            return Ok(());
        }

        // Pad over leftovers from a longer previous line.
        let width = self.last_line.chars().count();
        write!(self.out, "\r{:<width$}", line, width = width)?;
        self.out.flush()?;
        self.last_line = line;
        Ok(())
    }
}

pub(crate) fn status_line(view: &CountdownView) -> String {
    match (&view.next_event, &view.remaining) {
        (Some(event), Some(remaining)) => format!(
            "{} at {}  |  {}",
            event.label,
            event.at.format("%a %d %b %H:%M"),
            remaining
        ),
        _ => "No upcoming event in the loaded schedule".to_string(),
    }
}
