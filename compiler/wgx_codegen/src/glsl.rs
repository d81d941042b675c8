//! GLSL backend.
//!
//! Emission order: stage inputs, stage outputs, type declarations, globals,
//! helpers, the entry function, then a `void main()` that copies stage
//! inputs into the entry's parameters, calls it and scatters the result
//! into stage outputs.
//!
//! Uniform buffers become std140 blocks wrapping a single `inner` member.
//! Textures become `sampler2D`s; WGSL samplers have no GLSL counterpart
//! and are folded into the texture they sample.

mod expr;
mod io;

use std::borrow::Cow;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use wgx_ir::{
    ExprId, ExprRange, Function, Ident, Module, Name, PipelineStage, TypeDeclId, TypeDeclKind, TypeRef,
    VarId, VarKind, Variable,
};
use wgx_sema::{BindGroup, EntryPoint};

use crate::common::{
    array_count, array_parts, bind_entry, check_vertex_output, element_type, escape, is_sampler,
    is_texture, matrix_shape, resolve_alias, vector_width,
};
use crate::emit::Emitter;
use crate::writer::SourceWriter;
use crate::{CodegenError, CompileOutput, CompilerContext, GlslOptions};

const RESERVED: &[&str] = &["in", "out", "main", "input", "output"];

/// Render `entry` as GLSL.
///
/// Slots continue from `context` when given. On error no text is returned.
pub fn write_glsl(
    entry: &EntryPoint<'_>,
    options: &GlslOptions,
    context: Option<CompilerContext>,
) -> Result<CompileOutput, CodegenError> {
    let mut writer = GlslWriter::new(entry, options, context.unwrap_or_default());
    writer.write()?;
    Ok(writer.finish())
}

pub(crate) struct GlslWriter<'a, 'm> {
    entry: &'a EntryPoint<'m>,
    module: &'m Module,
    options: &'a GlslOptions,
    out: SourceWriter,
    bind_groups: Vec<BindGroup>,
    ubo_index: u32,
    texture_index: u32,
    sampler_index: u32,
    /// Globals wrapped in a uniform block, read through `.inner`.
    uniforms: FxHashSet<VarId>,
    /// Texture unit assigned to each texture global.
    texture_units: FxHashMap<VarId, u32>,
}

impl<'a, 'm> GlslWriter<'a, 'm> {
    fn new(entry: &'a EntryPoint<'m>, options: &'a GlslOptions, context: CompilerContext) -> Self {
        GlslWriter {
            entry,
            module: entry.module(),
            options,
            out: SourceWriter::new(),
            bind_groups: entry.bind_groups().to_vec(),
            ubo_index: context.last_ubo_binding,
            texture_index: context.last_texture_binding,
            sampler_index: context.last_sampler_binding,
            uniforms: FxHashSet::default(),
            texture_units: FxHashMap::default(),
        }
    }

    fn finish(mut self) -> CompileOutput {
        CompileOutput {
            content: self.out.take_output(),
            bind_groups: self.bind_groups,
            context: CompilerContext {
                last_ubo_binding: self.ubo_index,
                last_texture_binding: self.texture_index,
                last_sampler_binding: self.sampler_index,
            },
        }
    }

    fn write(&mut self) -> Result<(), CodegenError> {
        let func = self.entry.function();
        let stage = self.entry.stage();
        let entry_name = self.module.name(func.name);
        if stage == PipelineStage::Compute {
            return Err(CodegenError::ComputeStage(entry_name.to_owned()));
        }
        debug!(entry = entry_name, ?stage, "writing GLSL");
        if stage == PipelineStage::Vertex {
            check_vertex_output(self.entry, func)?;
        }

        self.write_header(stage);
        self.write_inputs(func, stage)?;
        self.write_outputs(func, stage)?;
        self.out.newline();

        for &id in self.entry.type_decls() {
            self.write_type_decl(id)?;
        }
        for &id in self.entry.globals() {
            self.write_global(id)?;
        }
        if !self.entry.globals().is_empty() {
            self.out.newline();
        }
        for &id in self.entry.functions() {
            self.write_function(self.module.function(id))?;
        }
        self.write_function(func)?;
        self.write_main(func, stage)
    }

    fn write_header(&mut self, stage: PipelineStage) {
        let profile = if self.options.is_es() { "es" } else { "core" };
        self.out.writeln(&format!(
            "#version {}{}0 {profile}",
            self.options.major_version, self.options.minor_version
        ));
        self.out.newline();
        if self.options.is_es() && stage == PipelineStage::Fragment {
            self.out.writeln("precision highp float;");
            self.out.writeln("precision highp int;");
            self.out.newline();
        }
    }

    fn name(&self, name: Name) -> Cow<'m, str> {
        escape(self.module.name(name), RESERVED)
    }

    /// GLSL spelling of a type, split into base type and array suffix:
    /// `array<array<f32, 2>, 4>` is `("float", "[4][2]")`.
    fn type_parts(&self, name: Name, args: ExprRange) -> Result<(String, String), CodegenError> {
        let (name, args) = resolve_alias(self.entry, name, args)?;
        if let Some((element, count)) = array_parts(self.module, name, args) {
            let (base, inner) = wgx_stack::ensure_sufficient_stack(|| {
                self.type_parts(element.name, element.args)
            })?;
            let count = array_count(self.module, count, RESERVED)?;
            return Ok((base, format!("[{count}]{inner}")));
        }
        Ok((self.base_type(name, args), String::new()))
    }

    fn base_type(&self, name: Name, args: ExprRange) -> String {
        let text = self.module.name(name);
        let fixed = match text {
            "f32" | "f16" => Some("float"),
            "i32" => Some("int"),
            "u32" => Some("uint"),
            "bool" => Some("bool"),
            "texture_1d" => Some("sampler1D"),
            "texture_2d" => Some("sampler2D"),
            "texture_2d_array" => Some("sampler2DArray"),
            "texture_3d" => Some("sampler3D"),
            "texture_cube" => Some("samplerCube"),
            _ => None,
        };
        if let Some(fixed) = fixed {
            return fixed.to_owned();
        }

        let prefix = match element_type(self.module, args) {
            Some("i32") => "i",
            Some("u32") => "u",
            Some("bool") => "b",
            _ => "",
        };
        if let Some(width) = vector_width(text) {
            format!("{prefix}vec{width}")
        } else if let Some((columns, rows)) = matrix_shape(text) {
            if columns == rows {
                format!("mat{columns}")
            } else {
                format!("mat{columns}x{rows}")
            }
        } else {
            self.name(name).into_owned()
        }
    }

    /// A type where no name follows, such as a return type or constructor.
    fn type_name(&self, name: Name, args: ExprRange) -> Result<String, CodegenError> {
        let (base, dims) = self.type_parts(name, args)?;
        Ok(base + &dims)
    }

    /// `T name[N]`.
    fn decl(&self, ty: &TypeRef, name: &str) -> Result<String, CodegenError> {
        let (base, dims) = self.type_parts(ty.name, ty.args)?;
        Ok(format!("{base} {name}{dims}"))
    }

    fn write_type_decl(&mut self, id: TypeDeclId) -> Result<(), CodegenError> {
        let decl = self.module.type_decl(id);
        // GLSL has no aliases; uses are spelled as the target type.
        let TypeDeclKind::Struct(members) = decl.kind else {
            return Ok(());
        };
        self.out.writeln(&format!("struct {} {{", self.name(decl.name)));
        self.out.indent();
        for member in self.module.arena().members(members) {
            let line = self.decl(&member.ty, &self.name(member.name))?;
            self.out.writeln(&format!("{line};"));
        }
        self.out.dedent();
        self.out.writeln("};");
        self.out.newline();
        Ok(())
    }

    fn write_global(&mut self, id: VarId) -> Result<(), CodegenError> {
        let var = *self.module.var(id);
        let name = self.name(var.name);
        match var.kind {
            VarKind::Var {
                address_space: Some(space),
                ..
            } => {
                let space = self.module.name(space);
                match space {
                    "uniform" => self.write_uniform_block(id, &var),
                    "private" if self.entry.binding_of(&var).is_none() => {
                        self.write_plain_global(&var)
                    }
                    _ => Err(CodegenError::UnsupportedAddressSpace {
                        name: name.into_owned(),
                        space: space.to_owned(),
                    }),
                }
            }
            VarKind::Var { address_space: None, .. } => {
                let ty = self.module.name(var.ty.name);
                if is_sampler(ty) {
                    Ok(())
                } else if is_texture(ty) {
                    self.write_texture(id, &var)
                } else {
                    self.write_plain_global(&var)
                }
            }
            VarKind::Const => self.write_plain_global(&var),
            VarKind::Let | VarKind::Param => Err(CodegenError::Unsupported(format!(
                "module-scope `{name}` must be a `var` or `const`"
            ))),
        }
    }

    fn write_plain_global(&mut self, var: &Variable) -> Result<(), CodegenError> {
        let line = self.local(var)?;
        self.out.writeln(&format!("{line};"));
        Ok(())
    }

    fn write_uniform_block(&mut self, id: VarId, var: &Variable) -> Result<(), CodegenError> {
        let name = self.name(var.name);
        let block = format!("{name}block_ubo");
        let slot = self.ubo_index;

        let entry = bind_entry(&mut self.bind_groups, self.entry, var)?;
        entry.index = slot;
        entry.name.clone_from(&block);
        self.ubo_index += 1;
        debug!(name = %name, slot, "uniform block");

        let binding = if self.options.supports_binding_qualifier() {
            format!("binding = {slot}, ")
        } else {
            String::new()
        };
        self.out.writeln(&format!("layout({binding}std140) uniform {block} {{"));
        self.out.indent();
        let inner = self.decl(&var.ty, "inner")?;
        self.out.writeln(&format!("{inner};"));
        self.out.dedent();
        self.out.writeln(&format!("}} {name};"));
        self.uniforms.insert(id);
        Ok(())
    }

    fn write_texture(&mut self, id: VarId, var: &Variable) -> Result<(), CodegenError> {
        let slot = self.texture_index;
        bind_entry(&mut self.bind_groups, self.entry, var)?.index = slot;
        self.texture_index += 1;
        self.texture_units.insert(id, slot);
        debug!(name = self.module.name(var.name), slot, "texture");

        let ty = self.base_type(var.ty.name, var.ty.args);
        self.out.writeln(&format!("uniform {ty} {};", self.name(var.name)));
        Ok(())
    }

    fn write_function(&mut self, func: &Function) -> Result<(), CodegenError> {
        let arena = self.module.arena();
        let return_type = match &func.return_type {
            Some(ty) => self.type_name(ty.name, ty.args)?,
            None => "void".to_owned(),
        };
        let mut params = Vec::with_capacity(func.params.len());
        for &param in arena.var_list(func.params) {
            let param = self.module.var(param);
            params.push(self.decl(&param.ty, &self.name(param.name))?);
        }

        self.out.writeln(&format!(
            "{return_type} {}({})",
            self.name(func.name),
            params.join(", ")
        ));
        self.body(func.body)?;
        self.out.newline();
        Ok(())
    }
}

impl<'m> Emitter<'m> for GlslWriter<'_, 'm> {
    fn module(&self) -> &'m Module {
        self.module
    }

    fn out(&mut self) -> &mut SourceWriter {
        &mut self.out
    }

    fn expr(&mut self, id: ExprId) -> Result<String, CodegenError> {
        wgx_stack::ensure_sufficient_stack(|| self.expr_inner(id))
    }

    fn call(&mut self, callee: Ident, args: ExprRange) -> Result<String, CodegenError> {
        self.call_inner(callee, args)
    }

    fn local(&mut self, var: &Variable) -> Result<String, CodegenError> {
        let decl = self.decl(&var.ty, &self.name(var.name))?;
        let prefix = if var.kind == VarKind::Const { "const " } else { "" };
        match var.init {
            Some(init) => Ok(format!("{prefix}{decl} = {}", self.expr(init)?)),
            None => Ok(format!("{prefix}{decl}")),
        }
    }
}
