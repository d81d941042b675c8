//! AST node set.
//!
//! Closed tagged variants for expressions, statements, attributes and
//! declarations. Every independent consumer (closure builder, GLSL backend,
//! MSL backend) walks these with its own exhaustive `match`.

mod attr;
mod decl;
mod expr;
mod ids;
mod module;
mod operators;
mod stmt;

pub use attr::{
    Attribute, AttributeSliceExt, BuiltinValue, InterpolateSampling, InterpolateType,
};
pub use decl::{
    Function, PipelineStage, StructMember, TypeDecl, TypeDeclKind, TypeRef, VarKind, Variable,
};
pub use expr::{Expr, ExprKind, Ident};
pub use ids::{
    AttrRange, ExprId, ExprRange, FuncId, MemberRange, SelectorRange, StmtId, StmtRange,
    TypeDeclId, VarId, VarRange,
};
pub use module::Module;
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{CaseSelector, Stmt, StmtKind};
