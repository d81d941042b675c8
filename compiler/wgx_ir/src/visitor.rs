//! AST visitor.
//!
//! Generic traversal over the flat AST. The visitor mutates its own state;
//! the arena stays immutable.
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! visits children depth-first, left to right. Override a `visit_*` method to
//! act on a node and call `walk_*` to keep descending.
//!
//! Every name reference is reported through [`Visitor::visit_name`]:
//! identifier expressions, call targets and type names alike. Member names
//! after `.` are not references and are not reported.

use crate::ast::{
    CaseSelector, ExprId, ExprKind, Function, Ident, StmtId, StmtKind, TypeDecl, TypeDeclKind,
    TypeRef, Variable,
};
use crate::{AstArena, Name};

pub trait Visitor<'ast> {
    fn visit_function(&mut self, function: &'ast Function, arena: &'ast AstArena) {
        walk_function(self, function, arena);
    }

    fn visit_variable(&mut self, variable: &'ast Variable, arena: &'ast AstArena) {
        walk_variable(self, variable, arena);
    }

    fn visit_type_decl(&mut self, decl: &'ast TypeDecl, arena: &'ast AstArena) {
        walk_type_decl(self, decl, arena);
    }

    fn visit_type_ref(&mut self, ty: &'ast TypeRef, arena: &'ast AstArena) {
        walk_type_ref(self, ty, arena);
    }

    fn visit_expr(&mut self, id: ExprId, arena: &'ast AstArena) {
        walk_expr(self, id, arena);
    }

    fn visit_stmt(&mut self, id: StmtId, arena: &'ast AstArena) {
        walk_stmt(self, id, arena);
    }

    /// A reference to a declaration by name.
    fn visit_name(&mut self, name: Name) {
        let _ = name;
    }
}

/// Parameters, return type, then body.
pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    function: &'ast Function,
    arena: &'ast AstArena,
) {
    for &param in arena.var_list(function.params) {
        visitor.visit_variable(arena.var(param), arena);
    }
    if let Some(return_type) = &function.return_type {
        visitor.visit_type_ref(return_type, arena);
    }
    visitor.visit_stmt(function.body, arena);
}

pub fn walk_variable<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    variable: &'ast Variable,
    arena: &'ast AstArena,
) {
    visitor.visit_type_ref(&variable.ty, arena);
    if let Some(init) = variable.init {
        visitor.visit_expr(init, arena);
    }
}

pub fn walk_type_decl<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    decl: &'ast TypeDecl,
    arena: &'ast AstArena,
) {
    match &decl.kind {
        TypeDeclKind::Alias(target) => visitor.visit_type_ref(target, arena),
        TypeDeclKind::Struct(members) => {
            for member in arena.members(*members) {
                visitor.visit_type_ref(&member.ty, arena);
            }
        }
    }
}

/// The type name, then its template arguments.
pub fn walk_type_ref<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    ty: &'ast TypeRef,
    arena: &'ast AstArena,
) {
    visitor.visit_name(ty.name);
    for &arg in arena.expr_list(ty.args) {
        visitor.visit_expr(arg, arena);
    }
}

fn walk_ident<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    ident: &Ident,
    arena: &'ast AstArena,
) {
    visitor.visit_name(ident.name);
    for &arg in arena.expr_list(ident.args) {
        visitor.visit_expr(arg, arena);
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, id: ExprId, arena: &'ast AstArena) {
    match &arena.expr(id).kind {
        ExprKind::Bool(_) | ExprKind::Int { .. } | ExprKind::Float { .. } | ExprKind::Phony => {}
        ExprKind::Ident(ident) => walk_ident(visitor, ident, arena),
        ExprKind::Call { callee, args } => {
            walk_ident(visitor, callee, arena);
            for &arg in arena.expr_list(*args) {
                visitor.visit_expr(arg, arena);
            }
        }
        ExprKind::Paren(exprs) => {
            for &expr in arena.expr_list(*exprs) {
                visitor.visit_expr(expr, arena);
            }
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr(*operand, arena),
        ExprKind::Index { object, index } => {
            visitor.visit_expr(*object, arena);
            visitor.visit_expr(*index, arena);
        }
        ExprKind::Member { object, .. } => visitor.visit_expr(*object, arena),
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(*left, arena);
            visitor.visit_expr(*right, arena);
        }
    }
}

/// Assignments visit the right-hand side before the target.
pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, id: StmtId, arena: &'ast AstArena) {
    match &arena.stmt(id).kind {
        StmtKind::Block(stmts) => {
            for &stmt in arena.stmt_list(*stmts) {
                visitor.visit_stmt(stmt, arena);
            }
        }
        StmtKind::Assign { lhs, rhs, .. } => {
            visitor.visit_expr(*rhs, arena);
            visitor.visit_expr(*lhs, arena);
        }
        StmtKind::VarDecl(var) => visitor.visit_variable(arena.var(*var), arena),
        StmtKind::Call { callee, args } => {
            walk_ident(visitor, callee, arena);
            for &arg in arena.expr_list(*args) {
                visitor.visit_expr(arg, arena);
            }
        }
        StmtKind::Return(value) => {
            if let Some(value) = value {
                visitor.visit_expr(*value, arena);
            }
        }
        StmtKind::Break | StmtKind::Continue | StmtKind::Discard => {}
        StmtKind::If {
            cond,
            body,
            else_branch,
        } => {
            visitor.visit_expr(*cond, arena);
            visitor.visit_stmt(*body, arena);
            if let Some(else_branch) = else_branch {
                visitor.visit_stmt(*else_branch, arena);
            }
        }
        StmtKind::Switch { selector, cases } => {
            visitor.visit_expr(*selector, arena);
            for &case in arena.stmt_list(*cases) {
                visitor.visit_stmt(case, arena);
            }
        }
        StmtKind::Case { selectors, body } => {
            for selector in arena.selectors(*selectors) {
                if let CaseSelector::Expr(expr) = selector {
                    visitor.visit_expr(*expr, arena);
                }
            }
            visitor.visit_stmt(*body, arena);
        }
        StmtKind::Loop { body, continuing } => {
            visitor.visit_stmt(*body, arena);
            if let Some(continuing) = continuing {
                visitor.visit_stmt(*continuing, arena);
            }
        }
        StmtKind::For {
            init,
            cond,
            update,
            body,
        } => {
            if let Some(init) = init {
                visitor.visit_stmt(*init, arena);
            }
            if let Some(cond) = cond {
                visitor.visit_expr(*cond, arena);
            }
            if let Some(update) = update {
                visitor.visit_stmt(*update, arena);
            }
            visitor.visit_stmt(*body, arena);
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr(*cond, arena);
            visitor.visit_stmt(*body, arena);
        }
        StmtKind::BreakIf(cond) => visitor.visit_expr(*cond, arena),
        StmtKind::IncDec { target, .. } => visitor.visit_expr(*target, arena),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Stmt};
    use crate::{Span, StringInterner};

    #[derive(Default)]
    struct NameCollector {
        names: Vec<Name>,
    }

    impl Visitor<'_> for NameCollector {
        fn visit_name(&mut self, name: Name) {
            self.names.push(name);
        }
    }

    #[test]
    fn test_assign_visits_value_first() {
        let mut interner = StringInterner::new();
        let target = interner.intern("target");
        let value = interner.intern("value");
        let field = interner.intern("field");

        let mut arena = AstArena::new();
        let object = arena.alloc_expr(Expr::new(ExprKind::Ident(Ident::plain(target)), Span::DUMMY));
        let lhs = arena.alloc_expr(Expr::new(
            ExprKind::Member {
                object,
                member: field,
            },
            Span::DUMMY,
        ));
        let rhs = arena.alloc_expr(Expr::new(ExprKind::Ident(Ident::plain(value)), Span::DUMMY));
        let stmt = arena.alloc_stmt(Stmt::new(StmtKind::Assign { lhs, op: None, rhs }, Span::DUMMY));

        let mut collector = NameCollector::default();
        collector.visit_stmt(stmt, &arena);
        assert_eq!(collector.names, vec![value, target]);
    }
}
