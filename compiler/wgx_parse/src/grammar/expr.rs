//! Expression parsing.
//!
//! Precedence, loosest first:
//!
//! | Level          | Operators                    | Operands            |
//! |----------------|------------------------------|---------------------|
//! | short-circuit  | `&&` `\|\|` (one kind)         | relational          |
//! | bitwise        | `&` `\|` `^` (one kind)        | unary               |
//! | relational     | `< > <= >= == !=` (at most one) | shift            |
//! | shift          | `<<` `>>` (at most one)      | unary               |
//! | additive       | `+ -`                        | multiplicative      |
//! | multiplicative | `* / %`                      | unary               |
//!
//! Bitwise and short-circuit chains never mix operator kinds: `a & b | c`
//! stops after `a & b`.

use smallvec::SmallVec;
use tracing::trace;
use wgx_ir::{BinaryOp, Expr, ExprId, ExprKind, ExprRange, Ident, Name, TokenKind, UnaryOp};

use crate::{committed, one_of, require, ParseError, ParseOutcome, Parser};

fn multiplicative_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Multiply),
        TokenKind::ForwardSlash => Some(BinaryOp::Divide),
        TokenKind::Mod => Some(BinaryOp::Modulo),
        _ => None,
    }
}

fn additive_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Subtract),
        _ => None,
    }
}

fn shift_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::ShiftLeft => Some(BinaryOp::ShiftLeft),
        TokenKind::ShiftRight => Some(BinaryOp::ShiftRight),
        _ => None,
    }
}

fn relational_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::LessThan => Some(BinaryOp::LessThan),
        TokenKind::GreaterThan => Some(BinaryOp::GreaterThan),
        TokenKind::LessThanEqual => Some(BinaryOp::LessThanEqual),
        TokenKind::GreaterThanEqual => Some(BinaryOp::GreaterThanEqual),
        TokenKind::EqualEqual => Some(BinaryOp::Equal),
        TokenKind::NotEqual => Some(BinaryOp::NotEqual),
        _ => None,
    }
}

fn bitwise_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::And => Some(BinaryOp::And),
        TokenKind::Or => Some(BinaryOp::Or),
        TokenKind::Xor => Some(BinaryOp::Xor),
        _ => None,
    }
}

fn short_circuit_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::AndAnd => Some(BinaryOp::LogicalAnd),
        TokenKind::OrOr => Some(BinaryOp::LogicalOr),
        _ => None,
    }
}

impl Parser<'_> {
    /// Parse an expression. Declines if the current token cannot start one.
    pub(crate) fn expression(&mut self) -> ParseOutcome<ExprId> {
        wgx_stack::ensure_sufficient_stack(|| self.expression_inner())
    }

    fn expression_inner(&mut self) -> ParseOutcome<ExprId> {
        let lhs = match self.unary_expression() {
            ParseOutcome::Matched { value } => value,
            other => return other,
        };

        if let Some(op) = bitwise_op(self.cursor.current_kind()) {
            let op_kind = self.cursor.current_kind();
            let mut lhs = lhs;
            while self.cursor.eat(&op_kind) {
                let rhs = committed!(self.unary_required());
                lhs = self.binary(op, lhs, rhs);
            }
            return ParseOutcome::matched(lhs);
        }

        let mut lhs = committed!(self.relational_post(lhs));
        if let Some(op) = short_circuit_op(self.cursor.current_kind()) {
            let op_kind = self.cursor.current_kind();
            while self.cursor.eat(&op_kind) {
                let rhs = committed!(self.unary_required());
                let rhs = committed!(self.relational_post(rhs));
                lhs = self.binary(op, lhs, rhs);
            }
        }
        ParseOutcome::matched(lhs)
    }

    /// Parse an expression that must be present.
    pub(crate) fn expression_required(&mut self) -> Result<ExprId, ParseError> {
        match self.expression() {
            ParseOutcome::Matched { value } => Ok(value),
            ParseOutcome::Fatal { error } => Err(error),
            ParseOutcome::NotMatched { .. } => Err(self.error_here("Expected expression")),
        }
    }

    /// Comma-separated expressions; a trailing comma is allowed and the list
    /// may be empty.
    pub(crate) fn expression_list(&mut self) -> Result<ExprRange, ParseError> {
        let mut items: SmallVec<[ExprId; 8]> = SmallVec::new();
        loop {
            match self.expression() {
                ParseOutcome::Matched { value } => items.push(value),
                ParseOutcome::NotMatched { .. } => break,
                ParseOutcome::Fatal { error } => return Err(error),
            }
            if !self.cursor.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(self.arena.alloc_expr_list(items))
    }

    // === Binary levels (after a parsed unary left operand) ===

    fn relational_post(&mut self, lhs: ExprId) -> Result<ExprId, ParseError> {
        let lhs = self.shift_post(lhs)?;
        let Some(op) = relational_op(self.cursor.current_kind()) else {
            return Ok(lhs);
        };
        self.cursor.advance();
        let rhs = self.unary_required()?;
        let rhs = self.shift_post(rhs)?;
        Ok(self.binary(op, lhs, rhs))
    }

    fn shift_post(&mut self, lhs: ExprId) -> Result<ExprId, ParseError> {
        let Some(op) = shift_op(self.cursor.current_kind()) else {
            return self.additive_post(lhs);
        };
        self.cursor.advance();
        let rhs = self.unary_required()?;
        Ok(self.binary(op, lhs, rhs))
    }

    fn additive_post(&mut self, lhs: ExprId) -> Result<ExprId, ParseError> {
        let mut lhs = self.multiplicative_post(lhs)?;
        while let Some(op) = additive_op(self.cursor.current_kind()) {
            self.cursor.advance();
            let rhs = self.unary_required()?;
            let rhs = self.multiplicative_post(rhs)?;
            lhs = self.binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn multiplicative_post(&mut self, lhs: ExprId) -> Result<ExprId, ParseError> {
        let mut lhs = lhs;
        while let Some(op) = multiplicative_op(self.cursor.current_kind()) {
            self.cursor.advance();
            let rhs = self.unary_required()?;
            lhs = self.binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        let span = self.arena.expr(left).span.merge(self.arena.expr(right).span);
        self.arena.alloc_expr(Expr::new(ExprKind::Binary { op, left, right }, span))
    }

    // === Unary and postfix ===

    fn unary_required(&mut self) -> Result<ExprId, ParseError> {
        match self.unary_expression() {
            ParseOutcome::Matched { value } => Ok(value),
            ParseOutcome::Fatal { error } => Err(error),
            ParseOutcome::NotMatched { .. } => Err(self.error_here("Expected expression")),
        }
    }

    fn unary_expression(&mut self) -> ParseOutcome<ExprId> {
        let op = match self.cursor.current_kind() {
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                return ParseOutcome::fatal(self.error_here("Unary operator not support"));
            }
            TokenKind::Minus => UnaryOp::Negation,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::Complement,
            TokenKind::Star => UnaryOp::Indirection,
            TokenKind::And => UnaryOp::AddressOf,
            _ => return self.postfix_expression(),
        };
        let start = self.cursor.advance().span;

        let operand = require!(
            self,
            wgx_stack::ensure_sufficient_stack(|| self.unary_expression()),
            "Expected expression"
        );
        let span = self.span_from(start);
        ParseOutcome::matched(
            self.arena
                .alloc_expr(Expr::new(ExprKind::Unary { op, operand }, span)),
        )
    }

    /// Primary expression followed by `[index]` and `.member` accessors.
    fn postfix_expression(&mut self) -> ParseOutcome<ExprId> {
        let mut object = match self.primary_expression() {
            ParseOutcome::Matched { value } => value,
            other => return other,
        };
        let start = self.arena.expr(object).span;

        loop {
            if self.cursor.eat(&TokenKind::BracketLeft) {
                let index = committed!(self.expression_required());
                committed!(self.expect(&TokenKind::BracketRight, "Missing ']' after expression"));
                let span = self.span_from(start);
                object = self
                    .arena
                    .alloc_expr(Expr::new(ExprKind::Index { object, index }, span));
            } else if self.cursor.eat(&TokenKind::Period) {
                let Some(member) = self.cursor.check_ident() else {
                    return ParseOutcome::fatal(self.error_here("Expected identifier after '.'"));
                };
                self.cursor.advance();
                let span = self.span_from(start);
                object = self
                    .arena
                    .alloc_expr(Expr::new(ExprKind::Member { object, member }, span));
            } else {
                break;
            }
        }
        ParseOutcome::matched(object)
    }

    // === Primary ===

    fn primary_expression(&mut self) -> ParseOutcome<ExprId> {
        one_of!(
            self,
            self.literal(),
            self.ident_expression(),
            self.paren_expression(),
        )
    }

    fn literal(&mut self) -> ParseOutcome<ExprId> {
        let kind = match self.cursor.current_kind() {
            TokenKind::Int(value, suffix) => ExprKind::Int { value, suffix },
            TokenKind::Float(bits, suffix) => ExprKind::Float { bits, suffix },
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            _ => return ParseOutcome::not_matched(self.cursor.position()),
        };
        let span = self.cursor.advance().span;
        ParseOutcome::matched(self.arena.alloc_expr(Expr::new(kind, span)))
    }

    /// `ident [<args>] [(call args)]`
    fn ident_expression(&mut self) -> ParseOutcome<ExprId> {
        let Some(name) = self.cursor.check_ident() else {
            return ParseOutcome::not_matched(self.cursor.position());
        };
        let start = self.cursor.advance().span;

        let ident = committed!(self.template_ident(name));

        let kind = if self.cursor.eat(&TokenKind::ParenLeft) {
            let args = committed!(self.expression_list());
            committed!(self.expect(
                &TokenKind::ParenRight,
                "Missing function call end symbol ')'"
            ));
            trace!(callee = self.text(name), "call");
            ExprKind::Call {
                callee: ident,
                args,
            }
        } else {
            ExprKind::Ident(ident)
        };

        let span = self.span_from(start);
        ParseOutcome::matched(self.arena.alloc_expr(Expr::new(kind, span)))
    }

    /// Optional template arguments after an already consumed identifier.
    fn template_ident(&mut self, name: Name) -> Result<Ident, ParseError> {
        if !self.cursor.eat(&TokenKind::TemplateArgsLeft) {
            return Ok(Ident::plain(name));
        }
        let args = self.expression_list()?;
        if args.is_empty() {
            return Err(self.error_here("Empty template args"));
        }
        self.expect(&TokenKind::TemplateArgsRight, "Missing template args end symbol")?;
        Ok(Ident { name, args })
    }

    /// `( expression_list )`
    fn paren_expression(&mut self) -> ParseOutcome<ExprId> {
        if !self.cursor.check(&TokenKind::ParenLeft) {
            return ParseOutcome::not_matched(self.cursor.position());
        }
        let start = self.cursor.advance().span;

        let items = committed!(self.expression_list());
        if items.is_empty() {
            return ParseOutcome::fatal(self.error_here("Expected expression"));
        }
        committed!(self.expect(&TokenKind::ParenRight, "Expected ')' here"));

        let span = self.span_from(start);
        ParseOutcome::matched(self.arena.alloc_expr(Expr::new(ExprKind::Paren(items), span)))
    }
}
