//! Statement lowering shared by both backends.
//!
//! The two targets agree on C-style statement syntax. A backend supplies
//! its own expression, call and declaration spellings through [`Emitter`]
//! and inherits the rest.

use wgx_ir::{
    BinaryOp, CaseSelector, ExprId, ExprKind, ExprRange, Ident, Module, StmtId, StmtKind, Variable,
};

use crate::writer::SourceWriter;
use crate::CodegenError;

pub(crate) trait Emitter<'m> {
    fn module(&self) -> &'m Module;

    fn out(&mut self) -> &mut SourceWriter;

    fn expr(&mut self, id: ExprId) -> Result<String, CodegenError>;

    fn call(&mut self, callee: Ident, args: ExprRange) -> Result<String, CodegenError>;

    /// A function-scope `var`, `let` or `const`, without the trailing `;`.
    fn local(&mut self, var: &Variable) -> Result<String, CodegenError>;

    fn discard(&self) -> &'static str {
        "discard;"
    }

    fn expr_list(&mut self, range: ExprRange) -> Result<String, CodegenError> {
        let ids = self.module().arena().expr_list(range);
        let mut parts = Vec::with_capacity(ids.len());
        for &id in ids {
            parts.push(self.expr(id)?);
        }
        Ok(parts.join(", "))
    }

    /// Write a function body between braces.
    fn body(&mut self, block: StmtId) -> Result<(), CodegenError> {
        self.out().writeln("{");
        self.out().indent();
        self.block_contents(block)?;
        self.out().dedent();
        self.out().writeln("}");
        Ok(())
    }

    /// Statements of a block at the current indentation, without braces.
    fn block_contents(&mut self, block: StmtId) -> Result<(), CodegenError> {
        let arena = self.module().arena();
        match arena.stmt(block).kind {
            StmtKind::Block(stmts) => {
                for &stmt in arena.stmt_list(stmts) {
                    self.stmt(stmt)?;
                }
                Ok(())
            }
            _ => self.stmt(block),
        }
    }

    /// `header {` + block + `}`.
    fn braced(&mut self, header: &str, block: StmtId) -> Result<(), CodegenError> {
        self.out().writeln(&format!("{header} {{"));
        self.out().indent();
        self.block_contents(block)?;
        self.out().dedent();
        self.out().writeln("}");
        Ok(())
    }

    fn stmt(&mut self, id: StmtId) -> Result<(), CodegenError> {
        wgx_stack::ensure_sufficient_stack(|| self.stmt_inner(id))
    }

    fn stmt_inner(&mut self, id: StmtId) -> Result<(), CodegenError> {
        let arena = self.module().arena();
        match arena.stmt(id).kind {
            StmtKind::Block(_) => self.body(id)?,
            StmtKind::Assign { .. }
            | StmtKind::VarDecl(_)
            | StmtKind::Call { .. }
            | StmtKind::IncDec { .. } => {
                let line = self.simple(id)?;
                self.out().writeln(&format!("{line};"));
            }
            StmtKind::Return(None) => self.out().writeln("return;"),
            StmtKind::Return(Some(value)) => {
                let value = self.expr(value)?;
                self.out().writeln(&format!("return {value};"));
            }
            StmtKind::Break => self.out().writeln("break;"),
            StmtKind::Continue => self.out().writeln("continue;"),
            StmtKind::Discard => {
                let discard = self.discard();
                self.out().writeln(discard);
            }
            StmtKind::If { .. } => self.if_chain(id)?,
            StmtKind::Switch { selector, cases } => {
                let selector_text = self.expr(selector)?;
                let selector_text = match arena.expr(selector).kind {
                    ExprKind::Paren(_) => selector_text,
                    _ => format!("({selector_text})"),
                };
                self.out().writeln(&format!("switch {selector_text} {{"));
                self.out().indent();
                for &case in arena.stmt_list(cases) {
                    self.case(case)?;
                }
                self.out().dedent();
                self.out().writeln("}");
            }
            StmtKind::Case { .. } => self.case(id)?,
            StmtKind::Loop { body, continuing } => {
                self.out().writeln("while (true) {");
                self.out().indent();
                self.block_contents(body)?;
                if let Some(continuing) = continuing {
                    self.block_contents(continuing)?;
                }
                self.out().dedent();
                self.out().writeln("}");
            }
            StmtKind::For {
                init,
                cond,
                update,
                body,
            } => {
                let init = init.map(|s| self.simple(s)).transpose()?.unwrap_or_default();
                let cond = cond.map(|e| self.expr(e)).transpose()?.unwrap_or_default();
                let update = update.map(|s| self.simple(s)).transpose()?.unwrap_or_default();
                self.braced(&format!("for ({init}; {cond}; {update})"), body)?;
            }
            StmtKind::While { cond, body } => {
                let cond = self.expr(cond)?;
                self.braced(&format!("while ({cond})"), body)?;
            }
            StmtKind::BreakIf(cond) => {
                let cond = self.expr(cond)?;
                self.out().writeln(&format!("if ({cond}) break;"));
            }
        }
        Ok(())
    }

    /// A statement that also fits a `for` header, without the `;`.
    fn simple(&mut self, id: StmtId) -> Result<String, CodegenError> {
        let module = self.module();
        let arena = module.arena();
        match arena.stmt(id).kind {
            StmtKind::Assign { lhs, op, rhs } => {
                let rhs = self.expr(rhs)?;
                if matches!(arena.expr(lhs).kind, ExprKind::Phony) {
                    return Ok(rhs);
                }
                let lhs = self.expr(lhs)?;
                let op = op.map_or("", BinaryOp::as_symbol);
                Ok(format!("{lhs} {op}= {rhs}"))
            }
            StmtKind::VarDecl(var) => self.local(module.var(var)),
            StmtKind::Call { callee, args } => self.call(callee, args),
            StmtKind::IncDec { target, increment } => {
                let target = self.expr(target)?;
                Ok(format!("{target}{}", if increment { "++" } else { "--" }))
            }
            _ => Err(CodegenError::Unsupported(
                "compound statement in a for-loop header".to_owned(),
            )),
        }
    }

    /// `if`, flattening `else if` chains.
    fn if_chain(&mut self, id: StmtId) -> Result<(), CodegenError> {
        let arena = self.module().arena();
        let StmtKind::If {
            cond,
            body,
            else_branch,
        } = arena.stmt(id).kind
        else {
            return self.stmt(id);
        };

        let cond = self.expr(cond)?;
        self.out().writeln(&format!("if ({cond}) {{"));
        self.out().indent();
        self.block_contents(body)?;
        self.out().dedent();

        let mut next = else_branch;
        while let Some(branch) = next {
            if let StmtKind::If {
                cond,
                body,
                else_branch,
            } = arena.stmt(branch).kind
            {
                let cond = self.expr(cond)?;
                self.out().writeln(&format!("}} else if ({cond}) {{"));
                self.out().indent();
                self.block_contents(body)?;
                self.out().dedent();
                next = else_branch;
            } else {
                self.out().writeln("} else {");
                self.out().indent();
                self.block_contents(branch)?;
                self.out().dedent();
                next = None;
            }
        }
        self.out().writeln("}");
        Ok(())
    }

    /// One switch clause. WGSL clauses never fall through, so each body
    /// ends with `break`.
    fn case(&mut self, id: StmtId) -> Result<(), CodegenError> {
        let arena = self.module().arena();
        let StmtKind::Case { selectors, body } = arena.stmt(id).kind else {
            return Err(CodegenError::Unsupported(
                "statement directly inside a switch".to_owned(),
            ));
        };
        for selector in arena.selectors(selectors) {
            match *selector {
                CaseSelector::Default => self.out().writeln("default:"),
                CaseSelector::Expr(value) => {
                    let value = self.expr(value)?;
                    self.out().writeln(&format!("case {value}:"));
                }
            }
        }
        self.out().writeln("{");
        self.out().indent();
        self.block_contents(body)?;
        self.out().writeln("break;");
        self.out().dedent();
        self.out().writeln("}");
        Ok(())
    }
}
