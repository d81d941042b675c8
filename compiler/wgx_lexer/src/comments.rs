//! Nested block comments.

use wgx_ir::LexError;

use crate::raw_token::RawLexer;

/// Consume a `/* ... */` comment whose opening `/*` was just matched.
///
/// Comments nest: `/* a /* b */ c */` is one comment. On a missing close
/// the rest of the input is consumed so the error span covers it.
pub(crate) fn block_comment(lex: &mut RawLexer<'_>) -> Result<(), LexError> {
    let rest = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut pos = 0;

    while pos < rest.len() {
        match (rest[pos], rest.get(pos + 1)) {
            (b'/', Some(b'*')) => {
                depth += 1;
                pos += 2;
            }
            (b'*', Some(b'/')) => {
                depth -= 1;
                pos += 2;
                if depth == 0 {
                    lex.bump(pos);
                    return Ok(());
                }
            }
            _ => pos += 1,
        }
    }

    lex.bump(rest.len());
    Err(LexError::UnterminatedComment)
}
