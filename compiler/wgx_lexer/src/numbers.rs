//! Numeric literal callbacks.

use wgx_ir::{FloatSuffix, IntSuffix, LexError};

use crate::raw_token::RawLexer;

fn split_int_suffix(s: &str) -> (&str, IntSuffix) {
    match s.as_bytes().last() {
        Some(b'i') => (&s[..s.len() - 1], IntSuffix::I),
        Some(b'u') => (&s[..s.len() - 1], IntSuffix::U),
        _ => (s, IntSuffix::None),
    }
}

pub(crate) fn parse_decimal(lex: &mut RawLexer<'_>) -> Result<(i64, IntSuffix), LexError> {
    let (digits, suffix) = split_int_suffix(lex.slice());
    let value = digits.parse::<i64>().map_err(|_| LexError::MalformedNumber)?;
    Ok((value, suffix))
}

pub(crate) fn parse_hex(lex: &mut RawLexer<'_>) -> Result<(i64, IntSuffix), LexError> {
    let (digits, suffix) = split_int_suffix(&lex.slice()[2..]);
    let value = i64::from_str_radix(digits, 16).map_err(|_| LexError::MalformedNumber)?;
    Ok((value, suffix))
}

pub(crate) fn parse_float(lex: &mut RawLexer<'_>) -> Result<(f64, FloatSuffix), LexError> {
    let slice = lex.slice();
    let (digits, suffix) = match slice.as_bytes().last() {
        Some(b'f') => (&slice[..slice.len() - 1], FloatSuffix::F),
        Some(b'h') => (&slice[..slice.len() - 1], FloatSuffix::H),
        _ => (slice, FloatSuffix::None),
    };
    let value = digits.parse::<f64>().map_err(|_| LexError::MalformedNumber)?;
    if value.is_finite() {
        Ok((value, suffix))
    } else {
        Err(LexError::MalformedNumber)
    }
}
