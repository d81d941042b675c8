//! Declarations: variables, type declarations and functions.

use crate::{Name, Span};

use super::{AttrRange, ExprId, ExprRange, MemberRange, StmtId, VarRange};

/// A type reference by name, e.g. `f32`, `vec3<f32>`, `array<Light, 4>`.
///
/// Template arguments are expressions, so `array<f32, 4>` holds one
/// identifier expression and one integer literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: Name,
    pub args: ExprRange,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// `var<address_space, access>`
    Var {
        address_space: Option<Name>,
        access: Option<Name>,
    },
    Const,
    Let,
    Param,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variable {
    pub kind: VarKind,
    pub name: Name,
    pub ty: TypeRef,
    pub init: Option<ExprId>,
    pub attrs: AttrRange,
    pub span: Span,
}

impl Variable {
    pub fn address_space(&self) -> Option<Name> {
        match self.kind {
            VarKind::Var { address_space, .. } => address_space,
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructMember {
    pub name: Name,
    pub ty: TypeRef,
    pub attrs: AttrRange,
    pub span: Span,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Alias(TypeRef),
    Struct(MemberRange),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeDecl {
    pub name: Name,
    pub kind: TypeDeclKind,
    pub span: Span,
}

/// Pipeline stage an entry point belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    Vertex,
    Fragment,
    Compute,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Function {
    pub name: Name,
    pub attrs: AttrRange,
    pub params: VarRange,
    pub return_type: Option<TypeRef>,
    pub return_attrs: AttrRange,
    /// Always a `StmtKind::Block`.
    pub body: StmtId,
    pub span: Span,
}
