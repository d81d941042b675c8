//! Arena allocation for the flat AST.
//!
//! All nodes of one compiling unit live in contiguous tables. Child
//! references use typed indices, lists use ranges into side tables, and the
//! whole tree is dropped at once with the arena.

use crate::ast::{
    AttrRange, Attribute, CaseSelector, Expr, ExprId, ExprRange, FuncId, Function, MemberRange,
    SelectorRange, Stmt, StmtId, StmtRange, StructMember, TypeDecl, TypeDeclId, VarId, VarRange,
    Variable,
};

/// Convert a table length to a `u32` index.
///
/// Every table grows by at least one source byte per entry and sources are
/// capped below `u32::MAX` bytes by the lexer.
#[inline]
fn index_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

macro_rules! alloc_list {
    ($fn_alloc:ident, $fn_get:ident, $table:ident, $item:ty, $range:ident) => {
        pub fn $fn_alloc(&mut self, items: impl IntoIterator<Item = $item>) -> $range {
            let start = index_of(self.$table.len());
            self.$table.extend(items);
            $range::new(start, index_of(self.$table.len()) - start)
        }

        #[inline]
        pub fn $fn_get(&self, range: $range) -> &[$item] {
            &self.$table[range.to_range()]
        }
    };
}

/// Contiguous storage for every node of one module.
#[derive(Clone, Debug, Default)]
pub struct AstArena {
    exprs: Vec<Expr>,
    expr_lists: Vec<ExprId>,
    stmts: Vec<Stmt>,
    stmt_lists: Vec<StmtId>,
    attrs: Vec<Attribute>,
    members: Vec<StructMember>,
    selectors: Vec<CaseSelector>,
    vars: Vec<Variable>,
    var_lists: Vec<VarId>,
    type_decls: Vec<TypeDecl>,
    functions: Vec<Function>,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on source size.
    /// Heuristic: ~1 expression per 8 bytes of shader source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated_exprs = source_len / 8;
        AstArena {
            exprs: Vec::with_capacity(estimated_exprs),
            expr_lists: Vec::with_capacity(estimated_exprs / 2),
            stmts: Vec::with_capacity(estimated_exprs / 4),
            stmt_lists: Vec::with_capacity(estimated_exprs / 4),
            attrs: Vec::with_capacity(estimated_exprs / 16),
            vars: Vec::with_capacity(estimated_exprs / 8),
            ..Self::default()
        }
    }

    // ===== Expressions =====

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(index_of(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` does not come from this arena.
    #[inline]
    #[track_caller]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    alloc_list!(alloc_expr_list, expr_list, expr_lists, ExprId, ExprRange);

    // ===== Statements =====

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(index_of(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    #[inline]
    #[track_caller]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    alloc_list!(alloc_stmt_list, stmt_list, stmt_lists, StmtId, StmtRange);

    // ===== Attributes, members, selectors =====

    alloc_list!(alloc_attrs, attrs, attrs, Attribute, AttrRange);
    alloc_list!(alloc_members, members, members, StructMember, MemberRange);
    alloc_list!(alloc_selectors, selectors, selectors, CaseSelector, SelectorRange);

    // ===== Variables =====

    #[inline]
    pub fn alloc_var(&mut self, var: Variable) -> VarId {
        let id = VarId::new(index_of(self.vars.len()));
        self.vars.push(var);
        id
    }

    #[inline]
    #[track_caller]
    pub fn var(&self, id: VarId) -> &Variable {
        &self.vars[id.index()]
    }

    alloc_list!(alloc_var_list, var_list, var_lists, VarId, VarRange);

    // ===== Declarations =====

    pub fn alloc_type_decl(&mut self, decl: TypeDecl) -> TypeDeclId {
        let id = TypeDeclId::new(index_of(self.type_decls.len()));
        self.type_decls.push(decl);
        id
    }

    #[inline]
    #[track_caller]
    pub fn type_decl(&self, id: TypeDeclId) -> &TypeDecl {
        &self.type_decls[id.index()]
    }

    pub fn alloc_function(&mut self, func: Function) -> FuncId {
        let id = FuncId::new(index_of(self.functions.len()));
        self.functions.push(func);
        id
    }

    #[inline]
    #[track_caller]
    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::Span;

    #[test]
    fn test_alloc_expr_list() {
        let mut arena = AstArena::new();
        let a = arena.alloc_expr(Expr::new(ExprKind::Bool(true), Span::DUMMY));
        let b = arena.alloc_expr(Expr::new(ExprKind::Bool(false), Span::DUMMY));
        let list = arena.alloc_expr_list([a, b]);
        assert_eq!(arena.expr_list(list), &[a, b]);
        assert_eq!(arena.expr(b).kind, ExprKind::Bool(false));
    }

    #[test]
    fn test_empty_list() {
        let mut arena = AstArena::new();
        let list = arena.alloc_attrs(std::iter::empty());
        assert!(list.is_empty());
        assert!(arena.attrs(list).is_empty());
    }

    #[test]
    fn test_nested_lists_stay_disjoint() {
        let mut arena = AstArena::new();
        let inner = arena.alloc_attrs([Attribute::Location(0)]);
        let outer = arena.alloc_attrs([Attribute::Vertex, Attribute::Group(1)]);
        assert_eq!(arena.attrs(inner), &[Attribute::Location(0)]);
        assert_eq!(arena.attrs(outer), &[Attribute::Vertex, Attribute::Group(1)]);
    }
}
