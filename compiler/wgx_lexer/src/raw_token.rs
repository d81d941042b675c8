//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived tokenizer output before
//! identifier interning and sign folding.

use logos::{Lexer, Logos};
use wgx_ir::{FloatSuffix, IntSuffix, LexError};

use crate::comments::block_comment;
use crate::numbers::{parse_decimal, parse_float, parse_hex};

#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexError)]
#[logos(skip r"[ \t\n\r\x0B\x0C\u{0085}\u{200E}\u{200F}\u{2028}\u{2029}]+")]
pub(crate) enum RawToken {
    #[regex(r"//[^\n\r\x0B\x0C\u{0085}\u{2028}\u{2029}]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("alias")]
    Alias,
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("const")]
    Const,
    #[token("const_assert")]
    ConstAssert,
    #[token("continue")]
    Continue,
    #[token("continuing")]
    Continuing,
    #[token("diagnostic")]
    Diagnostic,
    #[token("discard")]
    Discard,
    #[token("default")]
    Default,
    #[token("else")]
    Else,
    #[token("enable")]
    Enable,
    #[token("fallthrough")]
    Fallthrough,
    #[token("false")]
    False,
    #[token("fn")]
    Fn,
    #[token("for")]
    For,
    #[token("if")]
    If,
    #[token("let")]
    Let,
    #[token("loop")]
    Loop,
    #[token("override")]
    Override,
    #[token("return")]
    Return,
    #[token("requires")]
    Requires,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("true")]
    True,
    #[token("var")]
    Var,
    #[token("while")]
    While,
    #[token("_", priority = 3)]
    Underscore,

    #[token("&")]
    And,
    #[token("&&")]
    AndAnd,
    #[token("->")]
    Arrow,
    #[token("@")]
    Attr,
    #[token("/")]
    ForwardSlash,
    #[token("!")]
    Bang,
    #[token("[")]
    BracketLeft,
    #[token("]")]
    BracketRight,
    #[token("{")]
    BraceLeft,
    #[token("}")]
    BraceRight,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token(">")]
    GreaterThan,
    #[token(">=")]
    GreaterThanEqual,
    #[token(">>")]
    ShiftRight,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanEqual,
    #[token("<<")]
    ShiftLeft,
    #[token("%")]
    Mod,
    #[token("-")]
    Minus,
    #[token("--")]
    MinusMinus,
    #[token("!=")]
    NotEqual,
    #[token(".")]
    Period,
    #[token("+")]
    Plus,
    #[token("++")]
    PlusPlus,
    #[token("|")]
    Or,
    #[token("||")]
    OrOr,
    #[token("(")]
    ParenLeft,
    #[token(")")]
    ParenRight,
    #[token(";")]
    Semicolon,
    #[token("*")]
    Star,
    #[token("~")]
    Tilde,
    #[token("^")]
    Xor,
    #[token("+=")]
    PlusEqual,
    #[token("-=")]
    MinusEqual,
    #[token("*=")]
    TimesEqual,
    #[token("/=")]
    DivisionEqual,
    #[token("%=")]
    ModEqual,
    #[token("&=")]
    AndEqual,
    #[token("|=")]
    OrEqual,
    #[token("^=")]
    XorEqual,
    #[token(">>=")]
    ShiftRightEqual,
    #[token("<<=")]
    ShiftLeftEqual,

    #[regex(r"0[xX][0-9a-fA-F]+[iu]?", parse_hex)]
    #[regex(r"[0-9]+[iu]?", parse_decimal)]
    Int((i64, IntSuffix)),

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fh]?", parse_float)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?[fh]?", parse_float)]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+[fh]?", parse_float)]
    #[regex(r"[0-9]+[fh]", parse_float)]
    Float((f64, FloatSuffix)),

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Lexer over raw tokens, as seen by the literal and comment callbacks.
pub(crate) type RawLexer<'s> = Lexer<'s, RawToken>;
