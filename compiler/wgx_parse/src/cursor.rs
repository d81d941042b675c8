//! Token cursor for navigating the token stream.
//!
//! Provides low-level token access, lookahead, and consumption methods.

use std::mem::discriminant;

use tracing::trace;
use wgx_ir::{Name, Span, Token, TokenKind, TokenList};

/// Cursor over a scanned token list.
///
/// Invariant: the list is non-empty and its last token is `Eof`, so the
/// cursor can always return a current token. Advancing past the end stays on
/// the last token.
pub struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a TokenList) -> Self {
        debug_assert!(!tokens.is_empty(), "token list must end with Eof");
        Cursor { tokens, pos: 0 }
    }

    /// Current position in the token stream.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly; used to restore snapshots.
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            pos < self.tokens.len(),
            "cursor position {} out of bounds (max {})",
            pos,
            self.tokens.len()
        );
        self.pos = pos;
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        &self.tokens[self.pos]
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Span of the most recently consumed token.
    #[inline]
    pub fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Check the current token's kind, ignoring literal payloads.
    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        discriminant(&self.current().kind) == discriminant(kind)
    }

    /// The current identifier's name, if the current token is one.
    #[inline]
    pub fn check_ident(&self) -> Option<Name> {
        match self.current_kind() {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Kind of the token `n` positions ahead; `Eof` past the end.
    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    #[inline]
    pub fn peek_next_kind(&self) -> TokenKind {
        self.peek_kind_at(1)
    }

    /// Consume the current token and return it.
    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        trace!(kind = %token.kind, line = token.line, "advance");
        token
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgx_ir::StringInterner;

    fn tokens(source: &str) -> (TokenList, StringInterner) {
        let mut interner = StringInterner::new();
        let tokens = wgx_lexer::lex(source, &mut interner);
        (tokens, interner)
    }

    #[test]
    fn test_advance_stops_at_eof() {
        let (list, _) = tokens("a ;");
        let mut cursor = Cursor::new(&list);
        assert!(cursor.check_ident().is_some());
        cursor.advance();
        assert!(cursor.eat(&TokenKind::Semicolon));
        assert!(cursor.is_at_end());
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_check_ignores_payload() {
        let (list, _) = tokens("42");
        let cursor = Cursor::new(&list);
        assert!(cursor.check(&TokenKind::Int(0, wgx_ir::IntSuffix::None)));
        assert!(!cursor.check(&TokenKind::Float(0, wgx_ir::FloatSuffix::None)));
    }

    #[test]
    fn test_peek() {
        let (list, interner) = tokens("foo(");
        let cursor = Cursor::new(&list);
        let name = cursor.check_ident().map(|n| interner.lookup(n).to_owned());
        assert_eq!(name.as_deref(), Some("foo"));
        assert_eq!(cursor.peek_next_kind(), TokenKind::ParenLeft);
        assert_eq!(cursor.peek_kind_at(2), TokenKind::Eof);
        assert_eq!(cursor.peek_kind_at(10), TokenKind::Eof);
    }

    #[test]
    fn test_previous_span() {
        let (list, _) = tokens("ab cd");
        let mut cursor = Cursor::new(&list);
        assert_eq!(cursor.previous_span(), Span::DUMMY);
        cursor.advance();
        assert_eq!(cursor.previous_span(), Span::new(0, 2));
        assert_eq!(cursor.current_span(), Span::new(3, 5));
    }
}
