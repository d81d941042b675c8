//! Token types for lexer output.

use std::fmt;

use crate::{Name, Span};

/// Lexical failure carried by [`TokenKind::Error`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexError {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("malformed number literal")]
    MalformedNumber,
    #[error("source exceeds 4GiB")]
    SourceTooLarge,
}

/// Suffix on an integer literal (`1i`, `2u`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntSuffix {
    #[default]
    None,
    I,
    U,
}

/// Suffix on a float literal (`1.0f`, `0.5h`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FloatSuffix {
    #[default]
    None,
    F,
    H,
}

/// A token with its location.
///
/// `line` and `column` are 1-based; columns count characters, not bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span, line: u32, column: u32) -> Self {
        Token {
            kind,
            span,
            line,
            column,
        }
    }

    /// Get the raw source text of this token.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.to_range()).unwrap_or("")
    }
}

/// Token kinds.
///
/// Floats are stored as `f64::to_bits` so the kind stays `Eq + Hash`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    Int(i64, IntSuffix),
    Float(u64, FloatSuffix),
    Ident(Name),

    // Keywords
    Alias,
    Break,
    Case,
    Const,
    ConstAssert,
    Continue,
    Continuing,
    Diagnostic,
    Discard,
    Default,
    Else,
    Enable,
    Fallthrough,
    False,
    Fn,
    For,
    If,
    Let,
    Loop,
    Override,
    Return,
    Requires,
    Struct,
    Switch,
    True,
    Var,
    While,
    Underscore,

    // Punctuation
    And,
    AndAnd,
    Arrow,
    Attr,
    ForwardSlash,
    Bang,
    BracketLeft,
    BracketRight,
    BraceLeft,
    BraceRight,
    Colon,
    Comma,
    Equal,
    EqualEqual,
    GreaterThan,
    GreaterThanEqual,
    ShiftRight,
    LessThan,
    LessThanEqual,
    ShiftLeft,
    Mod,
    Minus,
    MinusMinus,
    NotEqual,
    Period,
    Plus,
    PlusPlus,
    Or,
    OrOr,
    ParenLeft,
    ParenRight,
    Semicolon,
    Star,
    Tilde,
    Xor,
    PlusEqual,
    MinusEqual,
    TimesEqual,
    DivisionEqual,
    ModEqual,
    AndEqual,
    OrEqual,
    XorEqual,
    ShiftRightEqual,
    ShiftLeftEqual,

    // Produced by template-argument disambiguation
    TemplateArgsLeft,
    TemplateArgsRight,

    Error(LexError),
    Eof,
}

impl TokenKind {
    /// True for tokens that end an operand, after which `-`/`+` is binary.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident(_)
                | TokenKind::Int(..)
                | TokenKind::Float(..)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::ParenRight
                | TokenKind::BracketRight
                | TokenKind::TemplateArgsRight
        )
    }

    /// Fixed spelling of keyword and punctuation tokens.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Int(..) => "integer",
            TokenKind::Float(..) => "float",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Alias => "alias",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Const => "const",
            TokenKind::ConstAssert => "const_assert",
            TokenKind::Continue => "continue",
            TokenKind::Continuing => "continuing",
            TokenKind::Diagnostic => "diagnostic",
            TokenKind::Discard => "discard",
            TokenKind::Default => "default",
            TokenKind::Else => "else",
            TokenKind::Enable => "enable",
            TokenKind::Fallthrough => "fallthrough",
            TokenKind::False => "false",
            TokenKind::Fn => "fn",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Let => "let",
            TokenKind::Loop => "loop",
            TokenKind::Override => "override",
            TokenKind::Return => "return",
            TokenKind::Requires => "requires",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::True => "true",
            TokenKind::Var => "var",
            TokenKind::While => "while",
            TokenKind::Underscore => "_",
            TokenKind::And => "&",
            TokenKind::AndAnd => "&&",
            TokenKind::Arrow => "->",
            TokenKind::Attr => "@",
            TokenKind::ForwardSlash => "/",
            TokenKind::Bang => "!",
            TokenKind::BracketLeft => "[",
            TokenKind::BracketRight => "]",
            TokenKind::BraceLeft => "{",
            TokenKind::BraceRight => "}",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanEqual => ">=",
            TokenKind::ShiftRight => ">>",
            TokenKind::LessThan => "<",
            TokenKind::LessThanEqual => "<=",
            TokenKind::ShiftLeft => "<<",
            TokenKind::Mod => "%",
            TokenKind::Minus => "-",
            TokenKind::MinusMinus => "--",
            TokenKind::NotEqual => "!=",
            TokenKind::Period => ".",
            TokenKind::Plus => "+",
            TokenKind::PlusPlus => "++",
            TokenKind::Or => "|",
            TokenKind::OrOr => "||",
            TokenKind::ParenLeft => "(",
            TokenKind::ParenRight => ")",
            TokenKind::Semicolon => ";",
            TokenKind::Star => "*",
            TokenKind::Tilde => "~",
            TokenKind::Xor => "^",
            TokenKind::PlusEqual => "+=",
            TokenKind::MinusEqual => "-=",
            TokenKind::TimesEqual => "*=",
            TokenKind::DivisionEqual => "/=",
            TokenKind::ModEqual => "%=",
            TokenKind::AndEqual => "&=",
            TokenKind::OrEqual => "|=",
            TokenKind::XorEqual => "^=",
            TokenKind::ShiftRightEqual => ">>=",
            TokenKind::ShiftLeftEqual => "<<=",
            TokenKind::TemplateArgsLeft => "<(template)",
            TokenKind::TemplateArgsRight => ">(template)",
            TokenKind::Error(_) => "error",
            TokenKind::Eof => "end of file",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(v, _) => write!(f, "integer {v}"),
            TokenKind::Float(bits, _) => write!(f, "float {:?}", f64::from_bits(*bits)),
            TokenKind::Error(e) => write!(f, "error: {e}"),
            other => f.write_str(other.display_name()),
        }
    }
}

/// Ordered, index-addressable token stream.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            tokens: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Insert a token at `index`, shifting later tokens right.
    pub fn insert(&mut self, index: usize, token: Token) {
        self.tokens.insert(index, token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Token> {
        self.tokens.get_mut(index)
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Token> {
        self.tokens.last_mut()
    }

    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// The lexical error that stopped scanning, if any.
    pub fn error(&self) -> Option<(&Token, LexError)> {
        self.tokens.iter().find_map(|t| match t.kind {
            TokenKind::Error(e) => Some((t, e)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl std::ops::Index<usize> for TokenList {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::TokenKind;
    crate::static_assert_size!(TokenKind, 16);
}
