//! Template-argument disambiguation.
//!
//! `<` and `>` are both comparison/shift operators and template-list
//! delimiters. After scanning, one forward pass decides which `<`/`>` pairs
//! delimit template arguments and retags them as
//! [`TokenKind::TemplateArgsLeft`] / [`TokenKind::TemplateArgsRight`].
//!
//! Bookkeeping:
//! - an identifier or `var` directly followed by `<` pushes that `<` with the
//!   current nesting depth of `(`/`[`;
//! - `>`, `>>`, `>=` or `>>=` at the depth of the top entry closes it,
//!   splitting compound tokens so only the first `>` becomes the close;
//! - `)`/`]` drop entries opened at a deeper level, then leave that level;
//! - `;`, `{`, `=` and `:` reset depth and drop every pending entry;
//! - `&&`/`||` drop pending entries at the current depth.

use wgx_ir::{Span, Token, TokenKind, TokenList};

struct PendingOpen {
    index: usize,
    depth: usize,
}

pub fn classify_template_arguments(tokens: &mut TokenList) {
    let mut depth = 0usize;
    let mut stack: Vec<PendingOpen> = Vec::new();
    let mut i = 0;

    // Length is re-read every step: splitting inserts tokens.
    while i + 1 < tokens.len() {
        match tokens[i].kind {
            TokenKind::Ident(_) | TokenKind::Var => {
                if tokens[i + 1].kind == TokenKind::LessThan {
                    stack.push(PendingOpen {
                        index: i + 1,
                        depth,
                    });
                    i += 1;
                }
            }
            TokenKind::GreaterThan
            | TokenKind::ShiftRight
            | TokenKind::GreaterThanEqual
            | TokenKind::ShiftRightEqual => {
                if stack.last().is_some_and(|top| top.depth == depth) {
                    split_close(tokens, i);
                    if let Some(open) = stack.pop() {
                        retag(tokens, open.index, TokenKind::TemplateArgsLeft);
                    }
                    retag(tokens, i, TokenKind::TemplateArgsRight);
                }
            }
            TokenKind::ParenLeft | TokenKind::BracketLeft => depth += 1,
            TokenKind::ParenRight | TokenKind::BracketRight => {
                while stack.last().is_some_and(|top| top.depth != depth) {
                    stack.pop();
                }
                depth = depth.saturating_sub(1);
            }
            TokenKind::Semicolon | TokenKind::BraceLeft | TokenKind::Equal | TokenKind::Colon => {
                depth = 0;
                stack.clear();
            }
            TokenKind::OrOr | TokenKind::AndAnd => {
                while stack.last().is_some_and(|top| top.depth == depth) {
                    stack.pop();
                }
            }
            _ => {}
        }
        i += 1;
    }
}

fn retag(tokens: &mut TokenList, index: usize, kind: TokenKind) {
    if let Some(token) = tokens.get_mut(index) {
        token.kind = kind;
    }
}

/// Split a compound closing token at `index` into a leading `>` (left at
/// `index`) and the remainder (inserted at `index + 1`).
fn split_close(tokens: &mut TokenList, index: usize) {
    let Some(&token) = tokens.get(index) else {
        return;
    };
    let rest = match token.kind {
        TokenKind::ShiftRight => TokenKind::GreaterThan,
        TokenKind::GreaterThanEqual => TokenKind::Equal,
        TokenKind::ShiftRightEqual => TokenKind::GreaterThanEqual,
        _ => return,
    };
    let head = Token::new(
        TokenKind::GreaterThan,
        Span::new(token.span.start, token.span.start + 1),
        token.line,
        token.column,
    );
    let tail = Token::new(
        rest,
        Span::new(token.span.start + 1, token.span.end),
        token.line,
        token.column + 1,
    );
    if let Some(slot) = tokens.get_mut(index) {
        *slot = head;
    }
    tokens.insert(index + 1, tail);
}
