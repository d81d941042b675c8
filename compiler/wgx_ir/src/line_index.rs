//! Byte offset to line/column mapping.
//!
//! Recognized line breaks: LF, VT, FF, CR, CR LF (one break), NEL (U+0085),
//! LINE SEPARATOR (U+2028) and PARAGRAPH SEPARATOR (U+2029).

/// Line start table for one source string.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

/// True for characters that end a line.
#[inline]
pub fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\u{0B}' | '\u{0C}' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        let mut chars = source.char_indices().peekable();
        while let Some((pos, c)) = chars.next() {
            if !is_line_break(c) {
                continue;
            }
            if c == '\r' {
                if let Some(&(next_pos, '\n')) = chars.peek() {
                    chars.next();
                    line_starts.push(next_pos + 1);
                    continue;
                }
            }
            line_starts.push(pos + c.len_utf8());
        }
        LineIndex { line_starts }
    }

    /// Number of lines (a trailing break opens a final empty line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 1-based line and character column of a byte offset.
    pub fn location(&self, source: &str, offset: usize) -> (u32, u32) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        let start = self.line_starts[line];
        let column = source
            .get(start..offset.min(source.len()))
            .map_or(0, |s| s.chars().count());
        (to_u32(line + 1), to_u32(column + 1))
    }

    /// Text of a 1-based line, without its line break.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> Option<&'s str> {
        let index = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(index)?;
        let end = self
            .line_starts
            .get(index + 1)
            .copied()
            .unwrap_or(source.len());
        let text = source.get(start..end)?;
        Some(text.trim_end_matches(is_line_break))
    }
}

#[inline]
fn to_u32(v: usize) -> u32 {
    u32::try_from(v).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lf_lines() {
        let src = "fn a\nvar b\n";
        let index = LineIndex::new(src);
        assert_eq!(index.location(src, 0), (1, 1));
        assert_eq!(index.location(src, 5), (2, 1));
        assert_eq!(index.location(src, 9), (2, 5));
        assert_eq!(index.line_text(src, 2), Some("var b"));
    }

    #[test]
    fn test_crlf_is_one_break() {
        let src = "a\r\nb\rc";
        let index = LineIndex::new(src);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.location(src, 3), (2, 1));
        assert_eq!(index.location(src, 5), (3, 1));
        assert_eq!(index.line_text(src, 1), Some("a"));
    }

    #[test]
    fn test_unicode_separators_and_char_columns() {
        let src = "é x\u{2028}y\u{85}z";
        let index = LineIndex::new(src);
        // 'x' is the third character although it starts at byte 3
        assert_eq!(index.location(src, 3), (1, 3));
        let y = src.find('y').unwrap_or_default();
        let z = src.find('z').unwrap_or_default();
        assert_eq!(index.location(src, y), (2, 1));
        assert_eq!(index.location(src, z), (3, 1));
    }
}
