//! Grammar productions.
//!
//! Each production returns [`ParseOutcome`](crate::ParseOutcome) and only
//! declines (`NotMatched`) before consuming a token, so alternatives can be
//! tried from the same position without rollback of arena allocations.

mod attr;
mod decl;
mod expr;
mod stmt;
mod ty;

use wgx_ir::{Name, Span, TokenKind};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Consume `kind` or fail with `message` at the current token.
    pub(crate) fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<Span, ParseError> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(self.error_here(message))
        }
    }

    /// Consume an identifier or fail with "Expected identifier".
    pub(crate) fn expect_ident(&mut self) -> Result<(Name, Span), ParseError> {
        match self.cursor.check_ident() {
            Some(name) => Ok((name, self.cursor.advance().span)),
            None => Err(self.error_here("Expected identifier")),
        }
    }
}
