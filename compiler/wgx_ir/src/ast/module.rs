//! Parsed shader module.

use rustc_hash::FxHashMap;

use crate::{AstArena, Name, StringInterner};

use super::{Attribute, FuncId, Function, PipelineStage, TypeDecl, TypeDeclId, VarId, Variable};

/// A parsed shader source: the node arena, its interner and the three
/// top-level declaration lists in source order.
///
/// Name lookups resolve to the first declaration with that name.
#[derive(Clone, Debug, Default)]
pub struct Module {
    arena: AstArena,
    interner: StringInterner,
    type_decls: Vec<TypeDeclId>,
    globals: Vec<VarId>,
    functions: Vec<FuncId>,
    type_decl_names: FxHashMap<Name, TypeDeclId>,
    global_names: FxHashMap<Name, VarId>,
    function_names: FxHashMap<Name, FuncId>,
}

impl Module {
    pub fn new(arena: AstArena, interner: StringInterner) -> Self {
        Module {
            arena,
            interner,
            ..Self::default()
        }
    }

    pub fn add_type_decl(&mut self, id: TypeDeclId) {
        let name = self.arena.type_decl(id).name;
        self.type_decl_names.entry(name).or_insert(id);
        self.type_decls.push(id);
    }

    pub fn add_global(&mut self, id: VarId) {
        let name = self.arena.var(id).name;
        self.global_names.entry(name).or_insert(id);
        self.globals.push(id);
    }

    pub fn add_function(&mut self, id: FuncId) {
        let name = self.arena.function(id).name;
        self.function_names.entry(name).or_insert(id);
        self.functions.push(id);
    }

    #[inline]
    pub fn arena(&self) -> &AstArena {
        &self.arena
    }

    /// Mutable arena access for the parser, which keeps allocating while
    /// declarations are registered.
    #[inline]
    pub fn arena_mut(&mut self) -> &mut AstArena {
        &mut self.arena
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Resolve a name to its text.
    #[inline]
    pub fn name(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }

    pub fn type_decls(&self) -> &[TypeDeclId] {
        &self.type_decls
    }

    pub fn globals(&self) -> &[VarId] {
        &self.globals
    }

    pub fn functions(&self) -> &[FuncId] {
        &self.functions
    }

    pub fn type_decl_by_name(&self, name: Name) -> Option<TypeDeclId> {
        self.type_decl_names.get(&name).copied()
    }

    pub fn global_by_name(&self, name: Name) -> Option<VarId> {
        self.global_names.get(&name).copied()
    }

    pub fn function_by_name(&self, name: Name) -> Option<FuncId> {
        self.function_names.get(&name).copied()
    }

    /// Look up a function by source name.
    pub fn get_function(&self, name: &str) -> Option<FuncId> {
        self.function_by_name(self.interner.get(name)?)
    }

    pub fn get_type_decl(&self, name: &str) -> Option<TypeDeclId> {
        self.type_decl_by_name(self.interner.get(name)?)
    }

    pub fn get_global(&self, name: &str) -> Option<VarId> {
        self.global_by_name(self.interner.get(name)?)
    }

    #[inline]
    pub fn function(&self, id: FuncId) -> &Function {
        self.arena.function(id)
    }

    #[inline]
    pub fn var(&self, id: VarId) -> &Variable {
        self.arena.var(id)
    }

    #[inline]
    pub fn type_decl(&self, id: TypeDeclId) -> &TypeDecl {
        self.arena.type_decl(id)
    }

    /// Stage attribute of a function, if it is an entry point.
    pub fn stage(&self, id: FuncId) -> Option<PipelineStage> {
        let func = self.arena.function(id);
        self.arena.attrs(func.attrs).iter().find_map(|a| match a {
            Attribute::Vertex => Some(PipelineStage::Vertex),
            Attribute::Fragment => Some(PipelineStage::Fragment),
            Attribute::Compute => Some(PipelineStage::Compute),
            _ => None,
        })
    }

    pub fn is_entry_point(&self, id: FuncId) -> bool {
        self.stage(id).is_some()
    }
}
