//! Indented text output shared by both backends.

/// Line-oriented source buffer with a current indentation level.
pub(crate) struct SourceWriter {
    indent: usize,
    output: String,
}

impl SourceWriter {
    pub(crate) fn new() -> Self {
        Self {
            indent: 0,
            output: String::with_capacity(4096),
        }
    }

    /// Increase indentation level.
    pub(crate) fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation level.
    pub(crate) fn dedent(&mut self) {
        debug_assert!(self.indent > 0, "dedent called with zero indent");
        self.indent = self.indent.saturating_sub(1);
    }

    pub(crate) fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    /// Write an indented line.
    pub(crate) fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    pub(crate) fn newline(&mut self) {
        self.output.push('\n');
    }

    pub(crate) fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}
