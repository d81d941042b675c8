//! Expression nodes.

use crate::{FloatSuffix, IntSuffix, Name, Span};

use super::{BinaryOp, ExprId, ExprRange, UnaryOp};

/// A name reference, optionally carrying template arguments (`vec3<f32>`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: Name,
    pub args: ExprRange,
}

impl Ident {
    pub const fn plain(name: Name) -> Self {
        Ident {
            name,
            args: ExprRange::EMPTY,
        }
    }

    #[inline]
    pub const fn has_args(&self) -> bool {
        !self.args.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Bool(bool),
    Int {
        value: i64,
        suffix: IntSuffix,
    },
    /// Stored as `f64::to_bits`.
    Float {
        bits: u64,
        suffix: FloatSuffix,
    },
    Ident(Ident),
    /// `callee(args)`; constructors such as `vec4<f32>(...)` are calls too.
    Call {
        callee: Ident,
        args: ExprRange,
    },
    Paren(ExprRange),
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Index {
        object: ExprId,
        index: ExprId,
    },
    Member {
        object: ExprId,
        member: Name,
    },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `_` on the left of an assignment.
    Phony,
}

impl ExprKind {
    /// The float value of a `Float` literal.
    pub fn float_value(&self) -> Option<f64> {
        match self {
            ExprKind::Float { bits, .. } => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }
}
