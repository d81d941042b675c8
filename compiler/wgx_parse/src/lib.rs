//! Recursive descent parser for the WGSL-like shader language.
//!
//! Produces a [`Module`]: a flat AST in an [`AstArena`] plus the interner
//! that resolves its names. Parsing stops at the first hard error; there is
//! no recovery.

mod cursor;
mod error;
mod grammar;
mod outcome;

pub use cursor::Cursor;
pub use error::{ErrorContext, ParseError};
pub use outcome::ParseOutcome;

use tracing::debug;
use wgx_ir::{AstArena, Module, Name, Span, StringInterner, Token, TokenList};

/// Saved cursor position for speculative parsing.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ParserSnapshot {
    position: usize,
}

/// Parser state.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    arena: AstArena,
    interner: StringInterner,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(tokens: &'a TokenList, interner: StringInterner) -> Self {
        let estimated = tokens.len() * 4;
        Parser {
            cursor: Cursor::new(tokens),
            arena: AstArena::with_capacity(estimated),
            interner,
        }
    }

    #[inline]
    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            position: self.cursor.position(),
        }
    }

    #[inline]
    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.cursor.set_position(snapshot.position);
    }

    #[inline]
    fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    /// Build an error located at the current token.
    #[cold]
    pub(crate) fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::at(message, self.current())
    }

    /// Text of an interned name.
    #[inline]
    fn text(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    /// Span from `start` through the last consumed token.
    #[inline]
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }
}

/// Parse a scanned token list into a module.
///
/// A lexical error token in the stream is reported as the parse error at
/// that token.
pub fn parse(tokens: &TokenList, interner: StringInterner) -> Result<Module, ParseError> {
    if let Some((token, error)) = tokens.error() {
        debug!(line = token.line, column = token.column, %error, "scan error");
        return Err(ParseError::at(error.to_string(), token));
    }
    if tokens.is_empty() {
        return Ok(Module::new(AstArena::new(), interner));
    }

    let module = Parser::new(tokens, interner).parse_module()?;
    debug!(
        types = module.type_decls().len(),
        globals = module.globals().len(),
        functions = module.functions().len(),
        "parsed module"
    );
    Ok(module)
}
