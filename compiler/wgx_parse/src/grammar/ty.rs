//! Type specifiers and typed identifiers.

use wgx_ir::{ExprRange, Name, TokenKind, TypeRef, VarKind};

use crate::{ParseError, Parser};

/// `name : type` as written in a declaration.
pub(crate) struct TypedIdent {
    pub name: Name,
    pub ty: TypeRef,
}

impl Parser<'_> {
    /// `ident [ '<' expression_list '>' ]`
    pub(crate) fn type_specifier(&mut self) -> Result<TypeRef, ParseError> {
        let (name, start) = self.expect_ident()?;

        let args = if self.cursor.eat(&TokenKind::TemplateArgsLeft) {
            let args = self.expression_list()?;
            self.expect(&TokenKind::TemplateArgsRight, "Expected '>' after type specifier")?;
            args
        } else {
            ExprRange::EMPTY
        };

        Ok(TypeRef {
            name,
            args,
            span: self.span_from(start),
        })
    }

    /// `ident : type`
    ///
    /// Declarations that could infer their type (`var`, `let`, `const`) pass
    /// `inferable`; inference is not supported and reports so.
    pub(crate) fn ident_with_type(&mut self, inferable: bool) -> Result<TypedIdent, ParseError> {
        let (name, _) = self.expect_ident()?;

        if !self.cursor.eat(&TokenKind::Colon) {
            let message = if inferable {
                "Inferred type is not supported"
            } else {
                "Expected type annotation after identifier"
            };
            return Err(self.error_here(message));
        }

        let ty = self.type_specifier()?;
        Ok(TypedIdent { name, ty })
    }

    /// `[ '<' address_space [, access] '>' ]` after `var`.
    pub(crate) fn variable_qualifier(&mut self) -> Result<VarKind, ParseError> {
        if !self.cursor.eat(&TokenKind::TemplateArgsLeft) {
            return Ok(VarKind::Var {
                address_space: None,
                access: None,
            });
        }

        let (address_space, _) = self.expect_ident()?;
        let access = if self.cursor.eat(&TokenKind::Comma) {
            Some(self.expect_ident()?.0)
        } else {
            None
        };

        self.expect(&TokenKind::TemplateArgsRight, "Expected '>' after variable qualifier")?;
        Ok(VarKind::Var {
            address_space: Some(address_space),
            access,
        })
    }
}
