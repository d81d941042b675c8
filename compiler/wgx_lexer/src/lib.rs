//! Scanner for the WGSL-like shader language, using logos with string
//! interning.
//!
//! Produces a [`TokenList`] terminated by `Eof`, or by the first `Error`
//! token. Template-argument disambiguation runs over the finished list.

mod comments;
mod numbers;
mod raw_token;
mod template;

use logos::Logos;
use tracing::debug;
use wgx_ir::{LexError, LineIndex, Span, StringInterner, Token, TokenKind, TokenList};

use raw_token::RawToken;

pub use template::classify_template_arguments;

/// Scan `source` into a token list, interning identifiers.
pub fn lex(source: &str, interner: &mut StringInterner) -> TokenList {
    let mut result = TokenList::with_capacity(source.len() / 3 + 1);

    if u32::try_from(source.len()).is_err() {
        result.push(Token::new(
            TokenKind::Error(LexError::SourceTooLarge),
            Span::DUMMY,
            1,
            1,
        ));
        return result;
    }

    let lines = LineIndex::new(source);
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let range = logos.span();
        let (line, column) = lines.location(source, range.start);
        let span = Span::from_range(range);

        match token_result {
            Ok(RawToken::LineComment | RawToken::BlockComment) => {}
            Ok(raw) => {
                let kind = convert_token(raw, logos.slice(), interner);
                push_folding_sign(&mut result, Token::new(kind, span, line, column));
            }
            Err(error) => {
                debug!(line, column, %error, "scan stopped");
                result.push(Token::new(TokenKind::Error(error), span, line, column));
                classify_template_arguments(&mut result);
                return result;
            }
        }
    }

    let (line, column) = lines.location(source, source.len());
    let eof = Span::from_range(source.len()..source.len());
    result.push(Token::new(TokenKind::Eof, eof, line, column));

    classify_template_arguments(&mut result);
    debug!(tokens = result.len(), "scanned");
    result
}

/// Push `token`, folding a directly preceding `-`/`+` into it when the token
/// is a numeric literal and the sign cannot be a binary operator.
///
/// `f(-1)` yields a single `-1` literal; `a-1` keeps three tokens.
fn push_folding_sign(tokens: &mut TokenList, token: Token) {
    if !matches!(token.kind, TokenKind::Int(..) | TokenKind::Float(..)) {
        tokens.push(token);
        return;
    }

    let Some(&sign) = tokens.last() else {
        tokens.push(token);
        return;
    };
    let negate = match sign.kind {
        TokenKind::Minus => true,
        TokenKind::Plus => false,
        _ => {
            tokens.push(token);
            return;
        }
    };
    let adjacent = sign.span.end == token.span.start;
    let after_operand = tokens.len() >= 2 && tokens[tokens.len() - 2].kind.ends_operand();
    if !adjacent || after_operand {
        tokens.push(token);
        return;
    }

    let kind = match token.kind {
        TokenKind::Int(v, suffix) if negate => match v.checked_neg() {
            Some(n) => TokenKind::Int(n, suffix),
            None => TokenKind::Error(LexError::MalformedNumber),
        },
        TokenKind::Float(bits, suffix) if negate => {
            TokenKind::Float((-f64::from_bits(bits)).to_bits(), suffix)
        }
        other => other,
    };
    tokens.pop();
    tokens.push(Token::new(
        kind,
        sign.span.merge(token.span),
        sign.line,
        sign.column,
    ));
}

/// Convert a raw token to a `TokenKind`, interning identifiers.
fn convert_token(raw: RawToken, slice: &str, interner: &mut StringInterner) -> TokenKind {
    match raw {
        RawToken::Int((v, suffix)) => TokenKind::Int(v, suffix),
        RawToken::Float((f, suffix)) => TokenKind::Float(f.to_bits(), suffix),
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::Alias => TokenKind::Alias,
        RawToken::Break => TokenKind::Break,
        RawToken::Case => TokenKind::Case,
        RawToken::Const => TokenKind::Const,
        RawToken::ConstAssert => TokenKind::ConstAssert,
        RawToken::Continue => TokenKind::Continue,
        RawToken::Continuing => TokenKind::Continuing,
        RawToken::Diagnostic => TokenKind::Diagnostic,
        RawToken::Discard => TokenKind::Discard,
        RawToken::Default => TokenKind::Default,
        RawToken::Else => TokenKind::Else,
        RawToken::Enable => TokenKind::Enable,
        RawToken::Fallthrough => TokenKind::Fallthrough,
        RawToken::False => TokenKind::False,
        RawToken::Fn => TokenKind::Fn,
        RawToken::For => TokenKind::For,
        RawToken::If => TokenKind::If,
        RawToken::Let => TokenKind::Let,
        RawToken::Loop => TokenKind::Loop,
        RawToken::Override => TokenKind::Override,
        RawToken::Return => TokenKind::Return,
        RawToken::Requires => TokenKind::Requires,
        RawToken::Struct => TokenKind::Struct,
        RawToken::Switch => TokenKind::Switch,
        RawToken::True => TokenKind::True,
        RawToken::Var => TokenKind::Var,
        RawToken::While => TokenKind::While,
        RawToken::Underscore => TokenKind::Underscore,

        RawToken::And => TokenKind::And,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Attr => TokenKind::Attr,
        RawToken::ForwardSlash => TokenKind::ForwardSlash,
        RawToken::Bang => TokenKind::Bang,
        RawToken::BracketLeft => TokenKind::BracketLeft,
        RawToken::BracketRight => TokenKind::BracketRight,
        RawToken::BraceLeft => TokenKind::BraceLeft,
        RawToken::BraceRight => TokenKind::BraceRight,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Equal => TokenKind::Equal,
        RawToken::EqualEqual => TokenKind::EqualEqual,
        RawToken::GreaterThan => TokenKind::GreaterThan,
        RawToken::GreaterThanEqual => TokenKind::GreaterThanEqual,
        RawToken::ShiftRight => TokenKind::ShiftRight,
        RawToken::LessThan => TokenKind::LessThan,
        RawToken::LessThanEqual => TokenKind::LessThanEqual,
        RawToken::ShiftLeft => TokenKind::ShiftLeft,
        RawToken::Mod => TokenKind::Mod,
        RawToken::Minus => TokenKind::Minus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::NotEqual => TokenKind::NotEqual,
        RawToken::Period => TokenKind::Period,
        RawToken::Plus => TokenKind::Plus,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::Or => TokenKind::Or,
        RawToken::OrOr => TokenKind::OrOr,
        RawToken::ParenLeft => TokenKind::ParenLeft,
        RawToken::ParenRight => TokenKind::ParenRight,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Star => TokenKind::Star,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Xor => TokenKind::Xor,
        RawToken::PlusEqual => TokenKind::PlusEqual,
        RawToken::MinusEqual => TokenKind::MinusEqual,
        RawToken::TimesEqual => TokenKind::TimesEqual,
        RawToken::DivisionEqual => TokenKind::DivisionEqual,
        RawToken::ModEqual => TokenKind::ModEqual,
        RawToken::AndEqual => TokenKind::AndEqual,
        RawToken::OrEqual => TokenKind::OrEqual,
        RawToken::XorEqual => TokenKind::XorEqual,
        RawToken::ShiftRightEqual => TokenKind::ShiftRightEqual,
        RawToken::ShiftLeftEqual => TokenKind::ShiftLeftEqual,

        // Trivia is filtered before conversion.
        RawToken::LineComment | RawToken::BlockComment => {
            TokenKind::Error(LexError::UnexpectedCharacter)
        }
    }
}
