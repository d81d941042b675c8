//! Terminal Emitter
//!
//! Human-readable diagnosis output with optional ANSI color support.

use std::io::{self, Write};

use wgx_ir::LineIndex;

use crate::{Diagnosis, Severity};

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const BOLD: &str = "\x1b[1m";
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Automatically detect based on terminal capabilities.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean; `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(ColorMode::Auto),
            "always" => Some(ColorMode::Always),
            "never" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    /// Create a terminal emitter for stderr with explicit color mode.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<io::Stderr> {
        TerminalEmitter {
            writer: io::stderr(),
            colors: mode.should_use_colors(is_tty),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
        };
        self.write_colored(&severity.to_string(), color);
    }

    /// Emit a diagnosis against the source it was produced from.
    ///
    /// ```text
    /// error: Expected ';' after statement
    ///   --> shader.wgsl:3:12
    ///    |
    ///  3 |     let x = 1
    ///    |            ^
    /// ```
    pub fn emit(&mut self, diagnosis: &Diagnosis, path: &str, source: &str) {
        self.write_severity(Severity::Error);
        if self.colors {
            let _ = writeln!(
                self.writer,
                "{}: {}{}",
                colors::BOLD,
                diagnosis.message,
                colors::RESET
            );
        } else {
            let _ = writeln!(self.writer, ": {}", diagnosis.message);
        }

        let _ = writeln!(
            self.writer,
            "  --> {path}:{}:{}",
            diagnosis.line, diagnosis.column
        );

        let index = LineIndex::new(source);
        let Some(text) = index.line_text(source, diagnosis.line) else {
            return;
        };

        let line_no = diagnosis.line.to_string();
        let pad = " ".repeat(line_no.len());
        self.write_colored(&format!("{pad} |"), colors::GUTTER);
        let _ = writeln!(self.writer);
        self.write_colored(&format!("{line_no} |"), colors::GUTTER);
        let _ = writeln!(self.writer, " {text}");
        self.write_colored(&format!("{pad} |"), colors::GUTTER);
        // Columns count characters; tabs are kept so the caret lines up.
        let offset: String = text
            .chars()
            .take((diagnosis.column as usize).saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        let _ = write!(self.writer, " {offset}");
        self.write_colored("^", colors::ERROR);
        let _ = writeln!(self.writer);
    }
}
