//! Per-column progress notifications

use std::io::{IsTerminal, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Observer notified as a profiler walks the columns of a table.
///
/// Purely observational: profilers produce the same output whatever the
/// observer does.
pub trait ProgressObserver {
    /// Called before column `index` (0-based) of `total` is scanned
    fn column_started(&mut self, index: usize, total: usize, column: &str);

    /// Called once after the last column
    fn finished(&mut self) {}
}

/// Observer that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn column_started(&mut self, _index: usize, _total: usize, _column: &str) {}
}

/// Single-line progress indicator on stderr, erased when the pass completes
pub struct ConsoleProgress {
    label: String,
    stream: StandardStream,
    last_width: usize,
}

impl ConsoleProgress {
    /// Create an indicator labelled with the running profile's name
    pub fn new(label: impl Into<String>) -> Self {
        let choice = if std::io::stderr().is_terminal() {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self::with_color_choice(label, choice)
    }

    pub fn with_color_choice(label: impl Into<String>, color_choice: ColorChoice) -> Self {
        Self {
            label: label.into(),
            stream: StandardStream::stderr(color_choice),
            last_width: 0,
        }
    }

    fn draw(&mut self, index: usize, total: usize, column: &str) -> std::io::Result<()> {
        let counter = format!("[{}/{}]", index + 1, total);
        let line = format!("{} {} {}", self.label, counter, column);
        let pad = self.last_width.saturating_sub(line.chars().count());

        write!(self.stream, "\r")?;
        self.stream
            .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(self.stream, "{}", self.label)?;
        self.stream.reset()?;
        write!(self.stream, " {} {}{}", counter, column, " ".repeat(pad))?;
        self.stream.flush()?;

        self.last_width = line.chars().count();
        Ok(())
    }

    fn clear(&mut self) -> std::io::Result<()> {
        write!(self.stream, "\r{}\r", " ".repeat(self.last_width))?;
        self.stream.flush()?;
        self.last_width = 0;
        Ok(())
    }
}

impl ProgressObserver for ConsoleProgress {
    fn column_started(&mut self, index: usize, total: usize, column: &str) {
        // Progress is best-effort; a closed stderr must not abort profiling
        let _ = self.draw(index, total, column);
    }

    fn finished(&mut self) {
        let _ = self.clear();
    }
}

/// Observer that records every notification, handy for checking call order
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    pub events: Vec<(usize, usize, String)>,
    pub finished: bool,
}

impl ProgressObserver for RecordingProgress {
    fn column_started(&mut self, index: usize, total: usize, column: &str) {
        self.events.push((index, total, column.to_string()));
    }

    fn finished(&mut self) {
        self.finished = true;
    }
}
