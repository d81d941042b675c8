//! Statement nodes.

use crate::Span;

use super::{BinaryOp, ExprId, ExprRange, Ident, SelectorRange, StmtId, StmtRange, VarId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub const fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

/// One `case` selector; `default` may appear inside a selector list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CaseSelector {
    Default,
    Expr(ExprId),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StmtKind {
    /// `{ ... }`
    Block(StmtRange),
    /// `lhs = rhs`, `lhs op= rhs`, `_ = rhs` (lhs is `ExprKind::Phony`).
    Assign {
        lhs: ExprId,
        op: Option<BinaryOp>,
        rhs: ExprId,
    },
    /// `var`, `let` or `const` inside a function body.
    VarDecl(VarId),
    /// `name(args);`
    Call {
        callee: Ident,
        args: ExprRange,
    },
    Return(Option<ExprId>),
    Break,
    Continue,
    Discard,
    /// `else_branch` is a nested `If` for `else if`, or a `Block`.
    If {
        cond: ExprId,
        body: StmtId,
        else_branch: Option<StmtId>,
    },
    /// `cases` holds `Case` statements.
    Switch {
        selector: ExprId,
        cases: StmtRange,
    },
    Case {
        selectors: SelectorRange,
        body: StmtId,
    },
    /// `loop { body continuing { ... } }`; `continuing` is a `Block`.
    Loop {
        body: StmtId,
        continuing: Option<StmtId>,
    },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        update: Option<StmtId>,
        body: StmtId,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    /// `break if cond;`, only inside a continuing block.
    BreakIf(ExprId),
    /// `target++` / `target--`
    IncDec {
        target: ExprId,
        increment: bool,
    },
}
