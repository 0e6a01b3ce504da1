//! Styled terminal output for the `pagecraft` commands.
//!
//! The report table and the file listing go to stdout. Status lines (skips,
//! failures, timeouts) go to stderr so piping the table stays clean.

use std::fmt::Display;

use console::{StyledObject, Term, style};

/// Kind of status line, which picks its marker and stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Warning,
    Error,
}

impl Tone {
    fn marker(self) -> StyledObject<&'static str> {
        match self {
            Self::Success => style("✓").green().bold(),
            Self::Info => style("ℹ").blue().bold(),
            Self::Warning => style("⚠").yellow().bold(),
            Self::Error => style("✗").red().bold(),
        }
    }

    fn uses_stderr(self) -> bool {
        matches!(self, Self::Warning | Self::Error)
    }
}

/// A status line as printed, marker included.
pub fn compose(tone: Tone, message: impl Display) -> String {
    format!("{} {message}", tone.marker())
}

/// Terminal output helper.
pub struct Output {
    out: Term,
    err: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    pub fn new() -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
        }
    }

    pub fn status(&self, tone: Tone, message: impl Display) {
        let term = if tone.uses_stderr() {
            &self.err
        } else {
            &self.out
        };
        drop(term.write_line(&compose(tone, message)));
    }

    pub fn success(&self, message: impl Display) {
        self.status(Tone::Success, message);
    }

    pub fn info(&self, message: impl Display) {
        self.status(Tone::Info, message);
    }

    pub fn warning(&self, message: impl Display) {
        self.status(Tone::Warning, message);
    }

    pub fn error(&self, message: impl Display) {
        self.status(Tone::Error, message);
    }

    /// Unstyled, to stdout.
    pub fn print(&self, message: impl Display) {
        drop(self.out.write_line(&message.to_string()));
    }

    pub fn newline(&self) {
        drop(self.out.write_line(""));
    }

    pub fn header(&self, message: impl Display) {
        drop(self.out.write_line(&style(message).bold().cyan().to_string()));
    }

    /// One queued file in the manual-mode listing.
    pub fn file_item(&self, name: impl Display, size: impl Display) {
        drop(self.out.write_line(&format!(
            "  {} {} ({})",
            style("•").dim(),
            style(name).bold(),
            style(size).cyan()
        )));
    }

    pub fn count(&self, label: impl Display, count: usize) {
        drop(self.out.write_line(&format!(
            "{}: {} file(s)",
            style(label).dim(),
            style(count).cyan().bold()
        )));
    }
}
