//! Entry-point dependency closure.
//!
//! Starting at an entry point's parameter types, return type and body,
//! every name reference is resolved against the module, trying type
//! declarations first, then globals, then functions. A declaration is
//! walked the first time it is found and recorded after its own
//! dependencies, so each list is in dependency-first discovery order.

use rustc_hash::FxHashSet;
use tracing::debug;
use wgx_ir::visitor::{walk_function, walk_type_decl, walk_variable, Visitor};
use wgx_ir::{
    AttributeSliceExt, FuncId, Function, MemberRange, Module, Name, PipelineStage, TypeDecl,
    TypeDeclId, TypeDeclKind, VarId, Variable,
};

use crate::layout::{LayoutError, MemoryLayout};
use crate::reflect::{collect_bind_groups, BindGroup, ShaderStage};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClosureError {
    #[error("function `{0}` is not an entry point")]
    NotEntryPoint(String),
    #[error("`{first}` and `{second}` are both bound at group {group}, binding {binding}")]
    DuplicateBinding {
        group: u32,
        binding: u32,
        first: String,
        second: String,
    },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// An entry point with everything it transitively references.
///
/// The entry function itself is never in [`functions`](Self::functions),
/// even when it refers to itself.
#[derive(Clone, Debug)]
pub struct EntryPoint<'m> {
    module: &'m Module,
    func: FuncId,
    stage: PipelineStage,
    type_decls: Vec<TypeDeclId>,
    globals: Vec<VarId>,
    functions: Vec<FuncId>,
    bind_groups: Vec<BindGroup>,
}

impl<'m> EntryPoint<'m> {
    /// Build the closure of `func` and reflect its bindings under `layout`.
    pub fn new(module: &'m Module, func: FuncId, layout: MemoryLayout) -> Result<Self, ClosureError> {
        let Some(stage) = module.stage(func) else {
            let name = module.name(module.function(func).name);
            return Err(ClosureError::NotEntryPoint(name.to_owned()));
        };

        let mut collector = ClosureCollector::new(module, func);
        collector.visit_function(module.function(func), module.arena());
        let ClosureCollector {
            type_decls,
            globals,
            functions,
            ..
        } = collector;

        let bind_groups = collect_bind_groups(module, &globals, stage.into(), layout)?;

        debug!(
            entry = module.name(module.function(func).name),
            ?stage,
            types = type_decls.len(),
            globals = globals.len(),
            functions = functions.len(),
            groups = bind_groups.len(),
            "entry point closure"
        );

        Ok(EntryPoint {
            module,
            func,
            stage,
            type_decls,
            globals,
            functions,
            bind_groups,
        })
    }

    #[inline]
    pub fn module(&self) -> &'m Module {
        self.module
    }

    #[inline]
    pub fn func_id(&self) -> FuncId {
        self.func
    }

    #[inline]
    pub fn function(&self) -> &'m Function {
        self.module.function(self.func)
    }

    #[inline]
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    #[inline]
    pub fn shader_stage(&self) -> ShaderStage {
        self.stage.into()
    }

    pub fn type_decls(&self) -> &[TypeDeclId] {
        &self.type_decls
    }

    pub fn globals(&self) -> &[VarId] {
        &self.globals
    }

    /// Helper functions, excluding the entry point.
    pub fn functions(&self) -> &[FuncId] {
        &self.functions
    }

    pub fn bind_groups(&self) -> &[BindGroup] {
        &self.bind_groups
    }

    pub fn bind_group(&self, group: u32) -> Option<&BindGroup> {
        self.bind_groups.iter().find(|g| g.group == group)
    }

    pub fn into_bind_groups(self) -> Vec<BindGroup> {
        self.bind_groups
    }

    /// A type declaration in the closure, by name.
    pub fn type_decl(&self, name: Name) -> Option<&'m TypeDecl> {
        self.type_decls
            .iter()
            .map(|&id| self.module.type_decl(id))
            .find(|decl| decl.name == name)
    }

    /// A global in the closure, by name.
    pub fn global(&self, name: Name) -> Option<VarId> {
        self.globals
            .iter()
            .copied()
            .find(|&id| self.module.var(id).name == name)
    }

    /// A helper function in the closure, by name.
    pub fn helper(&self, name: Name) -> Option<FuncId> {
        self.functions
            .iter()
            .copied()
            .find(|&id| self.module.function(id).name == name)
    }

    /// Members of the struct `name` names, looking through one alias.
    pub fn struct_members(&self, name: Name) -> Option<MemberRange> {
        let mut decl = self.type_decl(name)?;
        if let TypeDeclKind::Alias(target) = decl.kind {
            decl = self.type_decl(target.name)?;
        }
        match decl.kind {
            TypeDeclKind::Struct(members) => Some(members),
            TypeDeclKind::Alias(_) => None,
        }
    }

    /// `@group` and `@binding` of a global.
    pub fn binding_of(&self, var: &Variable) -> Option<(u32, u32)> {
        let attrs = self.module.arena().attrs(var.attrs);
        Some((attrs.group()?, attrs.binding()?))
    }
}

struct ClosureCollector<'m> {
    module: &'m Module,
    entry: FuncId,
    seen_types: FxHashSet<TypeDeclId>,
    seen_globals: FxHashSet<VarId>,
    seen_functions: FxHashSet<FuncId>,
    type_decls: Vec<TypeDeclId>,
    globals: Vec<VarId>,
    functions: Vec<FuncId>,
}

impl<'m> ClosureCollector<'m> {
    fn new(module: &'m Module, entry: FuncId) -> Self {
        ClosureCollector {
            module,
            entry,
            seen_types: FxHashSet::default(),
            seen_globals: FxHashSet::default(),
            seen_functions: FxHashSet::default(),
            type_decls: Vec::new(),
            globals: Vec::new(),
            functions: Vec::new(),
        }
    }
}

impl<'m> Visitor<'m> for ClosureCollector<'m> {
    fn visit_name(&mut self, name: Name) {
        let module = self.module;
        let arena = module.arena();

        if let Some(id) = module.type_decl_by_name(name) {
            if self.seen_types.insert(id) {
                wgx_stack::ensure_sufficient_stack(|| {
                    walk_type_decl(self, module.type_decl(id), arena);
                });
                self.type_decls.push(id);
            }
        } else if let Some(id) = module.global_by_name(name) {
            if self.seen_globals.insert(id) {
                wgx_stack::ensure_sufficient_stack(|| {
                    walk_variable(self, module.var(id), arena);
                });
                self.globals.push(id);
            }
        } else if let Some(id) = module.function_by_name(name) {
            if id != self.entry && self.seen_functions.insert(id) {
                wgx_stack::ensure_sufficient_stack(|| {
                    walk_function(self, module.function(id), arena);
                });
                self.functions.push(id);
            }
        }
    }
}
