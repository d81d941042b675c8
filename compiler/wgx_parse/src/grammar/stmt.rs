//! Statement parsing.
//!
//! A statement is one of:
//! - a simple statement terminated by `;` (return, call, variable
//!   declaration, break, continue, discard, assignment, `++`/`--`)
//! - `if`/`else if`/`else`, `switch`, `loop`, `for`, `while`
//! - a braced block
//!
//! Statement attributes are accepted before compound statements and then
//! ignored; on simple statements they are an error.

use smallvec::SmallVec;
use wgx_ir::{
    AttrRange, BinaryOp, CaseSelector, Expr, ExprId, ExprKind, Ident, Span, Stmt, StmtId,
    StmtKind, TokenKind, VarKind, Variable,
};

use super::ty::TypedIdent;
use crate::error::ErrorContext;
use crate::{committed, require, try_outcome, ParseError, ParseOutcome, Parser};

type StmtList = SmallVec<[StmtId; 8]>;

fn compound_assign_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::PlusEqual => Some(BinaryOp::Add),
        TokenKind::MinusEqual => Some(BinaryOp::Subtract),
        TokenKind::TimesEqual => Some(BinaryOp::Multiply),
        TokenKind::DivisionEqual => Some(BinaryOp::Divide),
        TokenKind::ModEqual => Some(BinaryOp::Modulo),
        TokenKind::AndEqual => Some(BinaryOp::And),
        TokenKind::OrEqual => Some(BinaryOp::Or),
        TokenKind::XorEqual => Some(BinaryOp::Xor),
        TokenKind::ShiftLeftEqual => Some(BinaryOp::ShiftLeft),
        TokenKind::ShiftRightEqual => Some(BinaryOp::ShiftRight),
        _ => None,
    }
}

impl Parser<'_> {
    fn alloc_stmt(&mut self, kind: StmtKind, start: Span) -> StmtId {
        let span = self.span_from(start);
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }

    /// Parse one statement. Declines at `}` and at tokens that cannot start
    /// a statement.
    pub(crate) fn statement(&mut self) -> ParseOutcome<StmtId> {
        wgx_stack::ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> ParseOutcome<StmtId> {
        while self.cursor.eat(&TokenKind::Semicolon) {}

        let attrs = committed!(self.attribute_list());

        if let Some(stmt) = try_outcome!(self, self.simple_statement()) {
            if !attrs.is_empty() {
                return ParseOutcome::fatal(self.error_here("Attributes are not allowed here"));
            }
            return ParseOutcome::matched(stmt);
        }

        let compound = match self.cursor.current_kind() {
            TokenKind::If => Some(self.if_statement().with_error_context(ErrorContext::IfStatement)),
            TokenKind::Switch => Some(
                self.switch_statement()
                    .with_error_context(ErrorContext::SwitchStatement),
            ),
            TokenKind::Loop => Some(
                self.loop_statement()
                    .with_error_context(ErrorContext::LoopStatement),
            ),
            TokenKind::For => Some(self.for_statement().with_error_context(ErrorContext::ForStatement)),
            TokenKind::While => Some(
                self.while_statement()
                    .with_error_context(ErrorContext::WhileStatement),
            ),
            TokenKind::BraceLeft => Some(self.block()),
            _ => None,
        };
        if let Some(outcome) = compound {
            return outcome;
        }

        if !attrs.is_empty() {
            return ParseOutcome::fatal(self.error_here("Attributes are not allowed here"));
        }
        ParseOutcome::not_matched(self.cursor.position())
    }

    /// Statements until one declines.
    fn statements(&mut self) -> Result<StmtList, ParseError> {
        let mut stmts = StmtList::new();
        while !self.cursor.is_at_end() {
            match self.statement() {
                ParseOutcome::Matched { value } => stmts.push(value),
                ParseOutcome::NotMatched { .. } => break,
                ParseOutcome::Fatal { error } => return Err(error),
            }
        }
        Ok(stmts)
    }

    /// `[attrs] { statements }`; declines without a `{`.
    pub(crate) fn compound_statement(&mut self) -> ParseOutcome<StmtId> {
        if self.cursor.check(&TokenKind::Attr) {
            committed!(self.attribute_list());
            if !self.cursor.check(&TokenKind::BraceLeft) {
                return ParseOutcome::fatal(self.error_here("Expected '{' here"));
            }
        }
        self.block()
    }

    /// `{ statements }`
    fn block(&mut self) -> ParseOutcome<StmtId> {
        if !self.cursor.check(&TokenKind::BraceLeft) {
            return ParseOutcome::not_matched(self.cursor.position());
        }
        let start = self.cursor.advance().span;
        let stmts = committed!(self.statements());
        committed!(self.expect(&TokenKind::BraceRight, "Expected '}' after block"));

        let range = self.arena.alloc_stmt_list(stmts);
        ParseOutcome::matched(self.alloc_stmt(StmtKind::Block(range), start))
    }

    /// A block that must be present after a committed keyword.
    fn required_block(&mut self) -> Result<StmtId, ParseError> {
        match self.compound_statement() {
            ParseOutcome::Matched { value } => Ok(value),
            ParseOutcome::Fatal { error } => Err(error),
            ParseOutcome::NotMatched { .. } => Err(self.error_here("Expected '{' here")),
        }
    }

    // === Simple statements ===

    /// A simple statement and its terminating `;`.
    fn simple_statement(&mut self) -> ParseOutcome<StmtId> {
        self.simple_statement_inner()
            .with_error_context(ErrorContext::Statement)
    }

    fn simple_statement_inner(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.current_span();
        let stmt = match self.cursor.current_kind() {
            TokenKind::Return => self.return_statement(),
            TokenKind::Const | TokenKind::Let | TokenKind::Var => self.variable_statement(),
            TokenKind::Break => {
                self.cursor.advance();
                ParseOutcome::matched(self.alloc_stmt(StmtKind::Break, start))
            }
            TokenKind::Continue => {
                self.cursor.advance();
                ParseOutcome::matched(self.alloc_stmt(StmtKind::Continue, start))
            }
            TokenKind::Discard => {
                self.cursor.advance();
                ParseOutcome::matched(self.alloc_stmt(StmtKind::Discard, start))
            }
            TokenKind::Ident(_) if self.cursor.peek_next_kind() == TokenKind::ParenLeft => {
                self.call_statement()
            }
            _ => self.variable_update_statement(),
        };

        let stmt = match stmt {
            ParseOutcome::Matched { value } => value,
            other => return other,
        };
        committed!(self.expect(&TokenKind::Semicolon, "Expected ';' after statement"));
        ParseOutcome::matched(stmt)
    }

    fn return_statement(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.advance().span;
        let value = try_outcome!(self, self.expression());
        ParseOutcome::matched(self.alloc_stmt(StmtKind::Return(value), start))
    }

    /// `ident ( args )` as a statement.
    fn call_statement(&mut self) -> ParseOutcome<StmtId> {
        let Some(name) = self.cursor.check_ident() else {
            return ParseOutcome::not_matched(self.cursor.position());
        };
        if self.cursor.peek_next_kind() != TokenKind::ParenLeft {
            return ParseOutcome::not_matched(self.cursor.position());
        }
        let start = self.cursor.advance().span;
        self.cursor.advance(); // '('

        let args = committed!(self.expression_list());
        committed!(self.expect(
            &TokenKind::ParenRight,
            "Expected ')' after function call params"
        ));

        let kind = StmtKind::Call {
            callee: Ident::plain(name),
            args,
        };
        ParseOutcome::matched(self.alloc_stmt(kind, start))
    }

    /// `const x: T = e`, `let x: T = e` or `var[<...>] x: T [= e]`.
    fn variable_statement(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.current_span();
        let (kind, keyword) = match self.cursor.current_kind() {
            TokenKind::Const => (VarKind::Const, "const"),
            TokenKind::Let => (VarKind::Let, "let"),
            TokenKind::Var => {
                self.cursor.advance();
                let kind = committed!(self.variable_qualifier());
                let decl = committed!(self.ident_with_type(true));
                let init = if self.cursor.eat(&TokenKind::Equal) {
                    Some(committed!(self.expression_required()))
                } else {
                    None
                };
                return ParseOutcome::matched(self.local_variable(kind, decl, init, start));
            }
            _ => return ParseOutcome::not_matched(self.cursor.position()),
        };
        self.cursor.advance();

        let decl = committed!(self.ident_with_type(true));
        if !self.cursor.eat(&TokenKind::Equal) {
            return ParseOutcome::fatal(
                self.error_here(format!("Expected '=' after {keyword} variable name")),
            );
        }
        let init = committed!(self.expression_required());
        ParseOutcome::matched(self.local_variable(kind, decl, Some(init), start))
    }

    fn local_variable(
        &mut self,
        kind: VarKind,
        decl: TypedIdent,
        init: Option<ExprId>,
        start: Span,
    ) -> StmtId {
        let span = self.span_from(start);
        let var = self.arena.alloc_var(Variable {
            kind,
            name: decl.name,
            ty: decl.ty,
            init,
            attrs: AttrRange::EMPTY,
            span,
        });
        self.alloc_stmt(StmtKind::VarDecl(var), start)
    }

    /// Assignment, compound assignment, phony assignment or `++`/`--`.
    fn variable_update_statement(&mut self) -> ParseOutcome<StmtId> {
        if self.cursor.check_ident().is_some() && self.cursor.peek_next_kind() == TokenKind::Colon {
            return ParseOutcome::fatal(self.error_here("UnExpected ':' after variable name"));
        }

        let start = self.cursor.current_span();
        let (lhs, op) = if self.cursor.eat(&TokenKind::Underscore) {
            committed!(self.expect(&TokenKind::Equal, "Expected '=' after '_'"));
            let phony = self.arena.alloc_expr(Expr::new(ExprKind::Phony, start));
            (phony, None)
        } else {
            let lhs = match self.expression() {
                ParseOutcome::Matched { value } => value,
                ParseOutcome::NotMatched { position } => {
                    return ParseOutcome::not_matched(position);
                }
                ParseOutcome::Fatal { error } => return ParseOutcome::fatal(error),
            };

            if self.cursor.eat(&TokenKind::PlusPlus) {
                let kind = StmtKind::IncDec {
                    target: lhs,
                    increment: true,
                };
                return ParseOutcome::matched(self.alloc_stmt(kind, start));
            }
            if self.cursor.eat(&TokenKind::MinusMinus) {
                let kind = StmtKind::IncDec {
                    target: lhs,
                    increment: false,
                };
                return ParseOutcome::matched(self.alloc_stmt(kind, start));
            }

            if let Some(op) = compound_assign_op(self.cursor.current_kind()) {
                self.cursor.advance();
                (lhs, Some(op))
            } else {
                committed!(self.expect(&TokenKind::Equal, "Expected '=' after variable name"));
                (lhs, None)
            }
        };

        let rhs = committed!(self.expression_required());
        ParseOutcome::matched(self.alloc_stmt(StmtKind::Assign { lhs, op, rhs }, start))
    }

    // === Compound statements ===

    /// `if c {..} else if c {..} else {..}`, folded into nested `If` nodes.
    fn if_statement(&mut self) -> ParseOutcome<StmtId> {
        let mut arms: SmallVec<[(Span, ExprId, StmtId); 4]> = SmallVec::new();
        let mut else_body = None;

        let start = self.cursor.advance().span; // 'if'
        let cond = committed!(self.expression_required());
        let body = committed!(self.required_block());
        arms.push((start, cond, body));

        while self.cursor.eat(&TokenKind::Else) {
            if self.cursor.check(&TokenKind::If) {
                let start = self.cursor.advance().span;
                let cond = committed!(self.expression_required());
                let body = committed!(self.required_block());
                arms.push((start, cond, body));
            } else {
                else_body = Some(committed!(self.required_block()));
                break;
            }
        }

        let mut else_branch = else_body;
        let mut head = body;
        for (start, cond, body) in arms.into_iter().rev() {
            let kind = StmtKind::If {
                cond,
                body,
                else_branch,
            };
            head = self.alloc_stmt(kind, start);
            else_branch = Some(head);
        }
        ParseOutcome::matched(head)
    }

    /// `switch e [attrs] { case a, b: {..} default {..} }`
    fn switch_statement(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.advance().span; // 'switch'
        let selector = committed!(self.expression_required());
        committed!(self.attribute_list());
        committed!(self.expect(&TokenKind::BraceLeft, "Expected '{' after switch statement"));

        let mut cases = StmtList::new();
        while let Some(case) = try_outcome!(self, self.switch_case()) {
            cases.push(case);
        }

        committed!(self.expect(&TokenKind::BraceRight, "Expected '}' after switch statement"));
        let cases = self.arena.alloc_stmt_list(cases);
        ParseOutcome::matched(self.alloc_stmt(StmtKind::Switch { selector, cases }, start))
    }

    fn switch_case(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.current_span();
        let mut selectors: SmallVec<[CaseSelector; 4]> = SmallVec::new();

        if self.cursor.eat(&TokenKind::Case) {
            loop {
                if self.cursor.eat(&TokenKind::Default) {
                    selectors.push(CaseSelector::Default);
                } else if let Some(expr) = try_outcome!(self, self.expression()) {
                    selectors.push(CaseSelector::Expr(expr));
                } else {
                    break;
                }
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
            if selectors.is_empty() {
                return ParseOutcome::fatal(self.error_here("Expected case selector"));
            }
        } else if self.cursor.eat(&TokenKind::Default) {
            selectors.push(CaseSelector::Default);
        } else {
            return ParseOutcome::not_matched(self.cursor.position());
        }

        self.cursor.eat(&TokenKind::Colon);
        let body = committed!(self.required_block());

        let selectors = self.arena.alloc_selectors(selectors);
        ParseOutcome::matched(self.alloc_stmt(StmtKind::Case { selectors, body }, start))
    }

    /// `loop [attrs] { statements [continuing { ... }] }`
    fn loop_statement(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.advance().span; // 'loop'
        committed!(self.attribute_list());
        let body_start =
            committed!(self.expect(&TokenKind::BraceLeft, "Expected '{' after loop statement"));

        let stmts = committed!(self.statements());
        let range = self.arena.alloc_stmt_list(stmts);
        let body = self.alloc_stmt(StmtKind::Block(range), body_start);

        let continuing = if self.cursor.check(&TokenKind::Continuing) {
            Some(require!(
                self,
                self.continuing_block()
                    .with_error_context(ErrorContext::ContinuingBlock),
                "Expected '{' here"
            ))
        } else {
            None
        };

        committed!(self.expect(&TokenKind::BraceRight, "Expected '}' after loop statement"));
        ParseOutcome::matched(self.alloc_stmt(StmtKind::Loop { body, continuing }, start))
    }

    /// `continuing [attrs] { statements [break if c;] }`
    fn continuing_block(&mut self) -> ParseOutcome<StmtId> {
        self.cursor.advance(); // 'continuing'
        committed!(self.attribute_list());
        let start = committed!(self.expect(&TokenKind::BraceLeft, "Expected '{' here"));

        let mut stmts = StmtList::new();
        while !self.cursor.is_at_end() {
            if self.cursor.check(&TokenKind::Break) && self.cursor.peek_next_kind() == TokenKind::If {
                stmts.push(committed!(self.break_if_statement()));
                continue;
            }
            match self.statement() {
                ParseOutcome::Matched { value } => stmts.push(value),
                ParseOutcome::NotMatched { .. } => break,
                ParseOutcome::Fatal { error } => return ParseOutcome::fatal(error),
            }
        }

        committed!(self.expect(&TokenKind::BraceRight, "Expected '}' after continuing block"));
        let range = self.arena.alloc_stmt_list(stmts);
        ParseOutcome::matched(self.alloc_stmt(StmtKind::Block(range), start))
    }

    fn break_if_statement(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.advance().span; // 'break'
        self.cursor.advance(); // 'if'
        let cond = self.expression_required()?;
        self.expect(&TokenKind::Semicolon, "Expected ';' after breakif expression")?;
        Ok(self.alloc_stmt(StmtKind::BreakIf(cond), start))
    }

    /// `for ( [init] ; [cond] ; [update] ) {..}`
    fn for_statement(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.advance().span; // 'for'
        committed!(self.expect(&TokenKind::ParenLeft, "Expected '(' after for statement"));

        let init = match self.cursor.current_kind() {
            TokenKind::Ident(_) if self.cursor.peek_next_kind() == TokenKind::ParenLeft => {
                try_outcome!(self, self.call_statement())
            }
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                try_outcome!(self, self.variable_statement())
            }
            _ => try_outcome!(self, self.variable_update_statement()),
        };
        committed!(self.expect(
            &TokenKind::Semicolon,
            "Expected ';' after initializer in for header"
        ));

        let cond = try_outcome!(self, self.expression());
        committed!(self.expect(
            &TokenKind::Semicolon,
            "Expected ';' after condition in for header"
        ));

        let update = match self.cursor.current_kind() {
            TokenKind::Ident(_) if self.cursor.peek_next_kind() == TokenKind::ParenLeft => {
                try_outcome!(self, self.call_statement())
            }
            _ => try_outcome!(self, self.variable_update_statement()),
        };
        committed!(self.expect(&TokenKind::ParenRight, "Expected ')' after for header"));

        let body = committed!(self.required_block());
        let kind = StmtKind::For {
            init,
            cond,
            update,
            body,
        };
        ParseOutcome::matched(self.alloc_stmt(kind, start))
    }

    /// `while c {..}`
    fn while_statement(&mut self) -> ParseOutcome<StmtId> {
        let start = self.cursor.advance().span; // 'while'
        let cond = committed!(self.expression_required());
        let body = committed!(self.required_block());
        ParseOutcome::matched(self.alloc_stmt(StmtKind::While { cond, body }, start))
    }
}
