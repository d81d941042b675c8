//! wgx IR - tokens and AST for the shader cross-compiler.
//!
//! This crate contains the core data structures shared by every phase:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for scanner output
//! - `LineIndex` for line/column reporting
//! - The AST node set and its arena
//! - `Module`, the parsed form of one shader source
//! - `Visitor`, the shared read-only traversal
//!
//! # Design
//!
//! - **Intern identifiers**: strings become `Name(u32)`
//! - **Flatten the tree**: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Whole-arena teardown**: a `Module` owns every node it references
//!
//! Floats are stored as `u64` bits so tokens and nodes stay `Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod interner;
mod line_index;
mod name;
mod span;
mod token;
pub mod visitor;

pub use arena::AstArena;
pub use ast::{
    AttrRange, Attribute, AttributeSliceExt, BinaryOp, BuiltinValue, CaseSelector, Expr,
    ExprId, ExprKind, ExprRange, FuncId, Function, Ident, InterpolateSampling, InterpolateType,
    MemberRange, Module, PipelineStage, SelectorRange, Stmt, StmtId, StmtKind, StmtRange,
    StructMember, TypeDecl, TypeDeclId, TypeDeclKind, TypeRef, UnaryOp, VarId, VarKind, VarRange,
    Variable,
};
pub use interner::StringInterner;
pub use line_index::{is_line_break, LineIndex};
pub use name::Name;
pub use span::Span;
pub use token::{FloatSuffix, IntSuffix, LexError, Token, TokenKind, TokenList};
pub use visitor::Visitor;
