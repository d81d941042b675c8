//! Top-level declarations: global variables and constants, type aliases,
//! structs and functions.

use smallvec::SmallVec;
use tracing::{debug, trace};
use wgx_ir::{
    AttrRange, FuncId, Function, Module, Name, Span, StructMember, TokenKind, TypeDecl,
    TypeDeclId, TypeDeclKind, TypeRef, VarId, VarKind, VarRange, Variable,
};

use super::attr::AttrList;
use crate::error::ErrorContext;
use crate::{committed, require, ParseError, ParseOutcome, Parser};

/// One parsed top-level declaration.
enum GlobalItem {
    Type(TypeDeclId),
    Var(VarId),
    Function(FuncId),
}

impl Parser<'_> {
    /// Parse the whole token stream. The first hard error aborts.
    pub(crate) fn parse_module(mut self) -> Result<Module, ParseError> {
        let mut items = Vec::new();

        while !self.cursor.is_at_end() {
            match self
                .global_decl()
                .with_error_context(ErrorContext::GlobalDeclaration)
            {
                ParseOutcome::Matched { value: Some(item) } => items.push(item),
                ParseOutcome::Matched { value: None } => {}
                ParseOutcome::NotMatched { .. } => {
                    debug!(line = self.current().line, "unexpected top-level token");
                    return Err(self.error_here("Unexpected token"));
                }
                ParseOutcome::Fatal { error } => return Err(error),
            }
        }

        let mut module = Module::new(self.arena, self.interner);
        for item in items {
            match item {
                GlobalItem::Type(id) => module.add_type_decl(id),
                GlobalItem::Var(id) => module.add_global(id),
                GlobalItem::Function(id) => module.add_function(id),
            }
        }
        Ok(module)
    }

    /// One global declaration; `None` for a stray `;`.
    fn global_decl(&mut self) -> ParseOutcome<Option<GlobalItem>> {
        if self.cursor.eat(&TokenKind::Semicolon) {
            return ParseOutcome::matched(None);
        }

        let start = self.cursor.current_span();
        let attrs = committed!(self.attribute_list());
        if !attrs.is_empty() && self.cursor.is_at_end() {
            return ParseOutcome::fatal(self.error_here("Expected declaration after attributes"));
        }

        match self.cursor.current_kind() {
            TokenKind::Var => self
                .global_variable(&attrs, start)
                .with_error_context(ErrorContext::GlobalVariable)
                .map(|id| Some(GlobalItem::Var(id))),
            TokenKind::Let => {
                ParseOutcome::fatal(self.error_here("Let not allowed in global scope"))
            }
            TokenKind::Override => {
                ParseOutcome::fatal(self.error_here("Override not support yet"))
            }
            TokenKind::Const => self
                .global_constant(&attrs, start)
                .with_error_context(ErrorContext::GlobalConstant)
                .map(|id| Some(GlobalItem::Var(id))),
            TokenKind::Alias => {
                if !attrs.is_empty() {
                    return ParseOutcome::fatal(
                        self.error_here("Type alias declaration must not have attribute"),
                    );
                }
                self.type_alias()
                    .with_error_context(ErrorContext::TypeAlias)
                    .map(|id| Some(GlobalItem::Type(id)))
            }
            TokenKind::Struct => {
                if !attrs.is_empty() {
                    return ParseOutcome::fatal(
                        self.error_here("Unexpected attribute in struct declaration"),
                    );
                }
                self.struct_declaration()
                    .with_error_context(ErrorContext::StructDeclaration)
                    .map(|id| Some(GlobalItem::Type(id)))
            }
            TokenKind::Fn => self
                .function_declaration(&attrs, start)
                .with_error_context(ErrorContext::FunctionDeclaration)
                .map(|id| Some(GlobalItem::Function(id))),
            _ if !attrs.is_empty() => ParseOutcome::fatal(
                self.error_here("Unexpected attribute in function declaration"),
            ),
            _ => ParseOutcome::not_matched(self.cursor.position()),
        }
    }

    /// `[attrs] var[<space[, access]>] name: T [= init];`
    fn global_variable(&mut self, attrs: &AttrList, start: Span) -> ParseOutcome<VarId> {
        self.cursor.advance(); // 'var'
        let kind = committed!(self.variable_qualifier());
        let decl = committed!(self.ident_with_type(true));
        let init = if self.cursor.eat(&TokenKind::Equal) {
            Some(committed!(self.expression_required()))
        } else {
            None
        };
        committed!(self.expect(
            &TokenKind::Semicolon,
            "Expected ';' after global variable declaration"
        ));

        let attrs = self.arena.alloc_attrs(attrs.iter().copied());
        let span = self.span_from(start);
        trace!(name = self.text(decl.name), "global variable");
        ParseOutcome::matched(self.arena.alloc_var(Variable {
            kind,
            name: decl.name,
            ty: decl.ty,
            init,
            attrs,
            span,
        }))
    }

    /// `const name: T = init;`
    fn global_constant(&mut self, attrs: &AttrList, start: Span) -> ParseOutcome<VarId> {
        self.cursor.advance(); // 'const'
        let decl = committed!(self.ident_with_type(true));
        if !self.cursor.eat(&TokenKind::Equal) {
            return ParseOutcome::fatal(self.error_here("Const variable must have initializer"));
        }
        let init = committed!(self.expression_required());
        committed!(self.expect(
            &TokenKind::Semicolon,
            "Expected ';' after global const declaration"
        ));

        let attrs = self.arena.alloc_attrs(attrs.iter().copied());
        let span = self.span_from(start);
        ParseOutcome::matched(self.arena.alloc_var(Variable {
            kind: VarKind::Const,
            name: decl.name,
            ty: decl.ty,
            init: Some(init),
            attrs,
            span,
        }))
    }

    /// `alias name = T;`
    fn type_alias(&mut self) -> ParseOutcome<TypeDeclId> {
        let start = self.cursor.advance().span; // 'alias'
        let (name, _) = committed!(self.expect_ident());
        committed!(self.expect(&TokenKind::Equal, "Expected '=' after type alias name"));
        let target = committed!(self.type_specifier());
        committed!(self.expect(
            &TokenKind::Semicolon,
            "Expected ';' after type alias declaration"
        ));

        let span = self.span_from(start);
        ParseOutcome::matched(self.arena.alloc_type_decl(TypeDecl {
            name,
            kind: TypeDeclKind::Alias(target),
            span,
        }))
    }

    /// `struct name { [attrs] member: T, ... }`
    fn struct_declaration(&mut self) -> ParseOutcome<TypeDeclId> {
        let start = self.cursor.advance().span; // 'struct'
        let (name, _) = committed!(self.expect_ident());
        committed!(self.expect(&TokenKind::BraceLeft, "Expected '{' after struct name"));

        let mut members: SmallVec<[StructMember; 8]> = SmallVec::new();
        while !self.cursor.is_at_end() && !self.cursor.check(&TokenKind::BraceRight) {
            let member_start = self.cursor.current_span();
            let attrs = committed!(self.attribute_list());
            let decl = committed!(self.ident_with_type(false));
            let attrs = self.arena.alloc_attrs(attrs);
            members.push(StructMember {
                name: decl.name,
                ty: decl.ty,
                attrs,
                span: self.span_from(member_start),
            });
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        committed!(self.expect(&TokenKind::BraceRight, "Expected '}' after struct body"));

        let members = self.arena.alloc_members(members);
        let span = self.span_from(start);
        trace!(name = self.text(name), members = members.len(), "struct");
        ParseOutcome::matched(self.arena.alloc_type_decl(TypeDecl {
            name,
            kind: TypeDeclKind::Struct(members),
            span,
        }))
    }

    /// `[attrs] fn name(params) [-> [attrs] T] { body }`
    fn function_declaration(&mut self, attrs: &AttrList, start: Span) -> ParseOutcome<FuncId> {
        self.cursor.advance(); // 'fn'
        let header = committed!(self.function_header());
        let body = require!(self, self.compound_statement(), "Expected '{' here");

        let attrs = self.arena.alloc_attrs(attrs.iter().copied());
        let span = self.span_from(start);
        trace!(name = self.text(header.name), "function");
        ParseOutcome::matched(self.arena.alloc_function(Function {
            name: header.name,
            attrs,
            params: header.params,
            return_type: header.return_type,
            return_attrs: header.return_attrs,
            body,
            span,
        }))
    }

    fn function_header(&mut self) -> Result<FunctionHeader, ParseError> {
        let (name, _) = self.expect_ident()?;
        self.expect(&TokenKind::ParenLeft, "Expected '(' after function name")?;
        let params = self.parameter_list()?;
        self.expect(&TokenKind::ParenRight, "Expected ')' after function parameter list")?;

        let (return_type, return_attrs) = if self.cursor.eat(&TokenKind::Arrow) {
            let attrs = self.attribute_list()?;
            let ty = self.type_specifier()?;
            (Some(ty), self.arena.alloc_attrs(attrs))
        } else {
            (None, AttrRange::EMPTY)
        };

        Ok(FunctionHeader {
            name,
            params,
            return_type,
            return_attrs,
        })
    }

    /// `[attrs] name: T, ...`; a trailing comma is allowed.
    fn parameter_list(&mut self) -> Result<VarRange, ParseError> {
        let mut params: SmallVec<[VarId; 4]> = SmallVec::new();
        while self.cursor.check_ident().is_some() || self.cursor.check(&TokenKind::Attr) {
            let start = self.cursor.current_span();
            let attrs = self.attribute_list()?;
            let decl = self.ident_with_type(false)?;
            let attrs = self.arena.alloc_attrs(attrs);
            let span = self.span_from(start);
            params.push(self.arena.alloc_var(Variable {
                kind: VarKind::Param,
                name: decl.name,
                ty: decl.ty,
                init: None,
                attrs,
                span,
            }));
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.arena.alloc_var_list(params))
    }
}

struct FunctionHeader {
    name: Name,
    params: VarRange,
    return_type: Option<TypeRef>,
    return_attrs: AttrRange,
}
