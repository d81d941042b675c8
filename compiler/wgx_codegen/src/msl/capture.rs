//! Uniform capture: the bound globals a helper function reads.
//!
//! MSL functions cannot see resources at program scope, so a helper gets
//! each one it touches, directly or through a helper it calls, as an
//! extra parameter.

use rustc_hash::FxHashSet;
use wgx_ir::visitor::{walk_function, Visitor};
use wgx_ir::{FuncId, Name, VarId, Variable};
use wgx_sema::EntryPoint;

pub(super) struct UniformCapture<'e, 'm, F> {
    entry: &'e EntryPoint<'m>,
    is_resource: F,
    visited: FxHashSet<FuncId>,
    captured: Vec<VarId>,
}

impl<'e, 'm, F: Fn(&Variable) -> bool> UniformCapture<'e, 'm, F> {
    /// Resources `func` reads, in first-use order.
    pub(super) fn run(entry: &'e EntryPoint<'m>, func: FuncId, is_resource: F) -> Vec<VarId> {
        let mut capture = UniformCapture {
            entry,
            is_resource,
            visited: FxHashSet::default(),
            captured: Vec::new(),
        };
        capture.visited.insert(func);
        let module = entry.module();
        walk_function(&mut capture, module.function(func), module.arena());
        capture.captured
    }
}

impl<'m, F: Fn(&Variable) -> bool> Visitor<'m> for UniformCapture<'_, 'm, F> {
    fn visit_name(&mut self, name: Name) {
        let module = self.entry.module();
        if let Some(var) = self.entry.global(name) {
            if (self.is_resource)(module.var(var)) && !self.captured.contains(&var) {
                self.captured.push(var);
            }
        } else if let Some(func) = self.entry.helper(name) {
            if self.visited.insert(func) {
                wgx_stack::ensure_sufficient_stack(|| {
                    walk_function(self, module.function(func), module.arena());
                });
            }
        }
    }
}
