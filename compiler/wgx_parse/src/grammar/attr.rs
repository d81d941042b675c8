//! Attribute parsing.
//!
//! Handles `@vertex`, `@fragment`, `@compute`, `@const`, `@invariant`,
//! `@must_use`, `@align(N)`, `@binding(N)`, `@group(N)`, `@location(N)`,
//! `@builtin(name)` and `@interpolate(type[, sampling])`. Numeric arguments
//! must be literal non-negative integers.

use smallvec::SmallVec;
use tracing::trace;
use wgx_ir::{Attribute, BuiltinValue, InterpolateSampling, InterpolateType, TokenKind};

use crate::{ParseError, Parser};

/// Attributes of one declaration; almost always four or fewer.
pub(crate) type AttrList = SmallVec<[Attribute; 4]>;

impl Parser<'_> {
    /// Parse zero or more attributes.
    pub(crate) fn attribute_list(&mut self) -> Result<AttrList, ParseError> {
        let mut attrs = AttrList::new();
        while self.cursor.check(&TokenKind::Attr) {
            attrs.push(self.attribute()?);
        }
        Ok(attrs)
    }

    fn attribute(&mut self) -> Result<Attribute, ParseError> {
        self.cursor.advance(); // '@'

        if self.cursor.eat(&TokenKind::Const) {
            return self.simple_attribute("const", Attribute::Const);
        }

        let Some(name) = self.cursor.check_ident() else {
            return Err(self.error_here("Unknown attribute"));
        };
        let attr = match self.text(name) {
            "invariant" => Some(("invariant", Attribute::Invariant)),
            "must_use" => Some(("must_use", Attribute::MustUse)),
            "vertex" => Some(("vertex", Attribute::Vertex)),
            "fragment" => Some(("fragment", Attribute::Fragment)),
            "compute" => Some(("compute", Attribute::Compute)),
            _ => None,
        };
        if let Some((spelling, attr)) = attr {
            self.cursor.advance();
            return self.simple_attribute(spelling, attr);
        }

        let attr = match self.text(name) {
            "align" => {
                self.cursor.advance();
                Attribute::Align(self.integer_argument("align")?)
            }
            "binding" => {
                self.cursor.advance();
                Attribute::Binding(self.integer_argument("binding")?)
            }
            "group" => {
                self.cursor.advance();
                Attribute::Group(self.integer_argument("group")?)
            }
            "location" => {
                self.cursor.advance();
                Attribute::Location(self.integer_argument("location")?)
            }
            "builtin" => {
                self.cursor.advance();
                self.builtin_argument()?
            }
            "interpolate" => {
                self.cursor.advance();
                self.interpolate_arguments()?
            }
            _ => return Err(self.error_here("Unknown attribute")),
        };
        trace!(%attr, "attribute");
        Ok(attr)
    }

    /// An argument-less attribute; a following `(` is an error.
    fn simple_attribute(&self, spelling: &str, attr: Attribute) -> Result<Attribute, ParseError> {
        if self.cursor.check(&TokenKind::ParenLeft) {
            return Err(self.error_here(format!("UnExpected '(' after {spelling} attribute")));
        }
        Ok(attr)
    }

    /// `( <int literal> )`
    fn integer_argument(&mut self, attr: &str) -> Result<u32, ParseError> {
        self.expect(&TokenKind::ParenLeft, &format!("Expected '(' after {attr} attribute"))?;

        let literal = match self.cursor.current_kind() {
            kind @ (TokenKind::Int(..) | TokenKind::Float(..) | TokenKind::True | TokenKind::False) => {
                self.cursor.advance();
                kind
            }
            _ => {
                return Err(self.error_here(format!("Expected integer literal after {attr} attribute")));
            }
        };

        self.expect(&TokenKind::ParenRight, &format!("Expected ')' after {attr} attribute"))?;

        let TokenKind::Int(value, _) = literal else {
            return Err(self.error_here(format!("Expected integer literal after {attr} attribute")));
        };
        if value < 0 {
            return Err(self.error_here(format!(
                "Expected positive integer literal after {attr} attribute"
            )));
        }
        u32::try_from(value)
            .map_err(|_| self.error_here(format!("Integer literal out of range in {attr} attribute")))
    }

    /// `( position | vertex_index | instance_index )`
    fn builtin_argument(&mut self) -> Result<Attribute, ParseError> {
        self.expect(&TokenKind::ParenLeft, "Expected '(' after builtin attribute")?;

        let value = self
            .cursor
            .check_ident()
            .and_then(|name| BuiltinValue::from_name(self.text(name)));
        let Some(value) = value else {
            return Err(self.error_here("Unsupported builtin attribute"));
        };
        self.cursor.advance();

        self.expect(&TokenKind::ParenRight, "Expected ')' after builtin attribute")?;
        Ok(Attribute::Builtin(value))
    }

    /// `( type [, sampling] )`
    fn interpolate_arguments(&mut self) -> Result<Attribute, ParseError> {
        self.expect(&TokenKind::ParenLeft, "Expected '(' after interpolate attribute")?;

        let Some(ty_name) = self.cursor.check_ident() else {
            return Err(self.error_here("Expected interpolate type after interpolate attribute"));
        };
        let Some(ty) = InterpolateType::from_name(self.text(ty_name)) else {
            return Err(self.error_here("Unknown interpolate type"));
        };
        self.cursor.advance();

        let mut sampling = InterpolateSampling::Undefined;
        if self.cursor.eat(&TokenKind::Comma) {
            let Some(sampling_name) = self.cursor.check_ident() else {
                return Err(self.error_here("Expected interpolate sampling after ','"));
            };
            let Some(value) = InterpolateSampling::from_name(self.text(sampling_name)) else {
                return Err(self.error_here("Unknown interpolate sampling"));
            };
            sampling = value;
            self.cursor.advance();
        }

        self.expect(&TokenKind::ParenRight, "Expected ')' after interpolate attribute")?;
        Ok(Attribute::Interpolate { ty, sampling })
    }
}
