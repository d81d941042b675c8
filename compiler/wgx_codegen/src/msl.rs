//! MSL backend.
//!
//! Bound globals become parameters of the entry function with explicit
//! `[[buffer(i)]]`, `[[texture(i)]]` and `[[sampler(i)]]` slots. MSL has no
//! program-scope resources, so every helper that reads one receives it as
//! a trailing parameter, and every call to that helper passes it along.
//!
//! Entry parameters carrying only `@location` are gathered into a
//! synthesized `<entry>_in` struct passed as the single `[[stage_in]]`.

mod capture;
mod expr;

use std::borrow::Cow;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use wgx_ir::{
    Attribute, AttributeSliceExt, BuiltinValue, ExprId, ExprRange, FuncId, Function, Ident,
    Module, Name, PipelineStage, TypeDeclId, TypeDeclKind, TypeRef, VarId, VarKind, Variable,
};
use wgx_sema::{BindGroup, EntryPoint};

use crate::common::{
    array_count, array_parts, bind_entry, check_vertex_output, element_type, escape, is_sampler,
    is_texture, matrix_shape, resolve_alias, vector_width,
};
use crate::emit::Emitter;
use crate::writer::SourceWriter;
use crate::{CodegenError, CompileOutput, CompilerContext, MslOptions};

use capture::UniformCapture;

const RESERVED: &[&str] = &["vertex", "fragment"];

/// Render `entry` as MSL.
///
/// Each slot counter starts at the option's base index, or at the
/// context's value when that is higher.
pub fn write_msl(
    entry: &EntryPoint<'_>,
    options: &MslOptions,
    context: Option<CompilerContext>,
) -> Result<CompileOutput, CodegenError> {
    let mut writer = MslWriter::new(entry, options, context.unwrap_or_default());
    writer.write()?;
    Ok(writer.finish())
}

/// Which side of a stage boundary an interface struct sits on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Interface {
    Input,
    Output,
}

pub(crate) struct MslWriter<'a, 'm> {
    entry: &'a EntryPoint<'m>,
    module: &'m Module,
    options: &'a MslOptions,
    out: SourceWriter,
    bind_groups: Vec<BindGroup>,
    buffer_index: u32,
    texture_index: u32,
    sampler_index: u32,
    /// Bound globals, in closure order.
    resources: Vec<VarId>,
    /// Bound globals each helper reads, directly or through callees.
    captures: FxHashMap<FuncId, Vec<VarId>>,
    input_structs: FxHashSet<Name>,
    output_struct: Option<Name>,
}

impl<'a, 'm> MslWriter<'a, 'm> {
    fn new(entry: &'a EntryPoint<'m>, options: &'a MslOptions, context: CompilerContext) -> Self {
        MslWriter {
            entry,
            module: entry.module(),
            options,
            out: SourceWriter::new(),
            bind_groups: entry.bind_groups().to_vec(),
            buffer_index: options.buffer_base_index.max(context.last_ubo_binding),
            texture_index: options.texture_base_index.max(context.last_texture_binding),
            sampler_index: options.sampler_base_index.max(context.last_sampler_binding),
            resources: Vec::new(),
            captures: FxHashMap::default(),
            input_structs: FxHashSet::default(),
            output_struct: None,
        }
    }

    fn finish(mut self) -> CompileOutput {
        CompileOutput {
            content: self.out.take_output(),
            bind_groups: self.bind_groups,
            context: CompilerContext {
                last_ubo_binding: self.buffer_index,
                last_texture_binding: self.texture_index,
                last_sampler_binding: self.sampler_index,
            },
        }
    }

    fn write(&mut self) -> Result<(), CodegenError> {
        let func = self.entry.function();
        let stage = self.entry.stage();
        let entry_name = self.module.name(func.name);
        let keyword = match stage {
            PipelineStage::Vertex => "vertex",
            PipelineStage::Fragment => "fragment",
            PipelineStage::Compute => {
                return Err(CodegenError::ComputeStage(entry_name.to_owned()));
            }
        };
        debug!(entry = entry_name, ?stage, "writing MSL");
        if stage == PipelineStage::Vertex {
            check_vertex_output(self.entry, func)?;
        }

        self.out.writeln("#include <metal_stdlib>");
        self.out.writeln("#include <simd/simd.h>");
        self.out.newline();
        self.out.writeln("using namespace metal;");
        self.out.newline();

        self.collect_interface_structs(func)?;
        for &id in self.entry.type_decls() {
            self.write_type_decl(id)?;
        }

        let mut wrote_constant = false;
        for &id in self.entry.globals() {
            wrote_constant |= self.write_global(id)?;
        }
        if wrote_constant {
            self.out.newline();
        }

        for &id in self.entry.functions() {
            let captured = UniformCapture::run(self.entry, id, |var| self.is_resource(var));
            self.captures.insert(id, captured);
        }
        for &id in self.entry.functions() {
            self.write_helper(id)?;
        }

        self.write_entry(func, stage, keyword)
    }

    fn name(&self, name: Name) -> Cow<'m, str> {
        escape(self.module.name(name), RESERVED)
    }

    /// A module-scope `var` passed in through a slot.
    fn is_resource(&self, var: &Variable) -> bool {
        let attrs = self.module.arena().attrs(var.attrs);
        matches!(var.kind, VarKind::Var { .. })
            && (attrs.group().is_some() || attrs.binding().is_some())
    }

    fn collect_interface_structs(&mut self, func: &Function) -> Result<(), CodegenError> {
        for &param in self.module.arena().var_list(func.params) {
            let ty = self.module.var(param).ty;
            let (name, _) = resolve_alias(self.entry, ty.name, ty.args)?;
            self.input_structs.insert(name);
        }
        if let Some(ty) = func.return_type {
            self.output_struct = Some(resolve_alias(self.entry, ty.name, ty.args)?.0);
        }
        Ok(())
    }

    fn type_name(&self, name: Name, args: ExprRange) -> Result<String, CodegenError> {
        if let Some((element, count)) = array_parts(self.module, name, args) {
            let element = wgx_stack::ensure_sufficient_stack(|| {
                self.type_name(element.name, element.args)
            })?;
            let count = array_count(self.module, count, RESERVED)?;
            return Ok(format!("array<{element}, {count}>"));
        }

        let text = self.module.name(name);
        if let Some(scalar) = scalar_type(text) {
            return Ok(scalar.to_owned());
        }
        let element = element_type(self.module, args).and_then(scalar_type);
        if let Some(width) = vector_width(text) {
            return Ok(format!("{}{width}", element.unwrap_or("float")));
        }
        if let Some((columns, rows)) = matrix_shape(text) {
            return Ok(format!("{}{columns}x{rows}", element.unwrap_or("float")));
        }
        if is_sampler(text) {
            return Ok("sampler".to_owned());
        }
        if let Some(kind) = texture_kind(text) {
            return Ok(format!("{kind}<{}>", element.unwrap_or("float")));
        }
        Ok(self.name(name).into_owned())
    }

    fn decl(&self, ty: &TypeRef, name: &str) -> Result<String, CodegenError> {
        Ok(format!("{} {name}", self.type_name(ty.name, ty.args)?))
    }

    /// `[[...]]` contents for a stage interface item.
    fn interface_attrs(&self, attrs: &[Attribute], side: Interface, allow_flat: bool) -> Vec<String> {
        let stage = self.entry.stage();
        let mut out = Vec::new();
        if let Some(builtin) = attrs.builtin() {
            out.push(builtin_attr(builtin).to_owned());
        }
        if let Some(location) = attrs.location() {
            out.push(match (side, stage) {
                (Interface::Input, PipelineStage::Vertex) => format!("attribute({location})"),
                (Interface::Output, PipelineStage::Fragment) => format!("color({location})"),
                _ => format!("user(locn{location})"),
            });
        }
        if allow_flat && attrs.is_flat() {
            out.push("flat".to_owned());
        }
        out
    }

    fn write_type_decl(&mut self, id: TypeDeclId) -> Result<(), CodegenError> {
        let decl = self.module.type_decl(id);
        let name = self.name(decl.name);
        match decl.kind {
            TypeDeclKind::Alias(target) => {
                let target = self.type_name(target.name, target.args)?;
                self.out.writeln(&format!("typedef {target} {name};"));
                self.out.newline();
            }
            TypeDeclKind::Struct(members) => {
                let side = if self.input_structs.contains(&decl.name) {
                    Some(Interface::Input)
                } else if self.output_struct == Some(decl.name) {
                    Some(Interface::Output)
                } else {
                    None
                };
                let arena = self.module.arena();
                self.out.writeln(&format!("struct {name} {{"));
                self.out.indent();
                for member in arena.members(members) {
                    let mut line = self.decl(&member.ty, &self.name(member.name))?;
                    if let Some(side) = side {
                        let attrs = self.interface_attrs(arena.attrs(member.attrs), side, true);
                        if !attrs.is_empty() {
                            line.push_str(&format!(" [[{}]]", attrs.join(", ")));
                        }
                    }
                    line.push(';');
                    self.out.writeln(&line);
                }
                self.out.dedent();
                self.out.writeln("};");
                self.out.newline();
            }
        }
        Ok(())
    }

    /// Write a module-scope constant, or record a resource. Returns
    /// whether a line was written.
    fn write_global(&mut self, id: VarId) -> Result<bool, CodegenError> {
        let var = *self.module.var(id);
        if self.is_resource(&var) {
            self.resources.push(id);
            return Ok(false);
        }
        let name = self.name(var.name);
        match var.kind {
            VarKind::Const => {
                let mut line = format!("constant {}", self.decl(&var.ty, &name)?);
                if let Some(init) = var.init {
                    line.push_str(&format!(" = {}", self.expr(init)?));
                }
                line.push(';');
                self.out.writeln(&line);
                Ok(true)
            }
            VarKind::Var {
                address_space: Some(space),
                ..
            } => Err(CodegenError::UnsupportedAddressSpace {
                name: name.into_owned(),
                space: self.module.name(space).to_owned(),
            }),
            VarKind::Var {
                address_space: None,
                ..
            } => Err(CodegenError::MissingBinding(name.into_owned())),
            VarKind::Let | VarKind::Param => Err(CodegenError::Unsupported(format!(
                "module-scope `{name}` must be a `var` or `const`"
            ))),
        }
    }

    /// `constant T& name` for buffers, `T name` for textures and samplers.
    fn resource_param(&self, var: &Variable) -> Result<String, CodegenError> {
        let ty = self.type_name(var.ty.name, var.ty.args)?;
        let name = self.name(var.name);
        let Some(space) = var.address_space() else {
            return Ok(format!("{ty} {name}"));
        };
        match self.module.name(space) {
            "uniform" => Ok(format!("constant {ty}& {name}")),
            "storage" => Ok(format!("device {ty}& {name}")),
            other => Err(CodegenError::UnsupportedAddressSpace {
                name: name.into_owned(),
                space: other.to_owned(),
            }),
        }
    }

    /// Take the next slot of the resource's category and record it in
    /// reflection.
    fn assign_slot(&mut self, var: &Variable) -> Result<(&'static str, u32), CodegenError> {
        let ty = self.module.name(var.ty.name);
        let (kind, counter) = if is_sampler(ty) {
            ("sampler", &mut self.sampler_index)
        } else if is_texture(ty) {
            ("texture", &mut self.texture_index)
        } else {
            ("buffer", &mut self.buffer_index)
        };
        let slot = *counter;
        bind_entry(&mut self.bind_groups, self.entry, var)?.index = slot;
        *counter += 1;
        debug!(name = self.module.name(var.name), kind, slot, "resource slot");
        Ok((kind, slot))
    }

    fn write_helper(&mut self, id: FuncId) -> Result<(), CodegenError> {
        let func = self.module.function(id);
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
        for &var in self.captures.get(&id).map(Vec::as_slice).unwrap_or_default() {
            params.push(self.resource_param(self.module.var(var))?);
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

    fn write_entry(
        &mut self,
        func: &Function,
        stage: PipelineStage,
        keyword: &str,
    ) -> Result<(), CodegenError> {
        let module = self.module;
        let arena = module.arena();
        let entry_name = self.name(func.name);

        // Loose `@location` parameters travel in one synthesized struct.
        let mut loose = Vec::new();
        let mut params = Vec::new();
        for &param in arena.var_list(func.params) {
            let param = module.var(param);
            let attrs = arena.attrs(param.attrs);
            let decl = self.decl(&param.ty, &self.name(param.name))?;
            if self.entry.struct_members(param.ty.name).is_some() {
                params.push(format!("{decl} [[stage_in]]"));
            } else if let Some(builtin) = attrs.builtin() {
                params.push(format!("{decl} [[{}]]", builtin_attr(builtin)));
            } else if attrs.location().is_some() {
                loose.push(param);
            } else {
                return Err(CodegenError::Unsupported(format!(
                    "entry parameter `{}` has neither @builtin nor @location",
                    module.name(param.name)
                )));
            }
        }

        if !loose.is_empty() {
            let struct_name = format!("{entry_name}_in");
            self.out.writeln(&format!("struct {struct_name} {{"));
            self.out.indent();
            for param in &loose {
                let decl = self.decl(&param.ty, &self.name(param.name))?;
                let flat = stage == PipelineStage::Fragment;
                let attrs = self.interface_attrs(arena.attrs(param.attrs), Interface::Input, flat);
                self.out.writeln(&format!("{decl} [[{}]];", attrs.join(", ")));
            }
            self.out.dedent();
            self.out.writeln("};");
            self.out.newline();
            params.insert(0, format!("{struct_name} stage_input [[stage_in]]"));
        }

        for var in self.resources.clone() {
            let var = module.var(var);
            let (kind, slot) = self.assign_slot(var)?;
            params.push(format!("{} [[{kind}({slot})]]", self.resource_param(var)?));
        }

        let return_type = match &func.return_type {
            Some(ty) => self.type_name(ty.name, ty.args)?,
            None => "void".to_owned(),
        };
        let prefix = if self.options.supports_stage_attributes() {
            format!("[[{keyword}]]")
        } else {
            keyword.to_owned()
        };
        self.out.writeln(&format!(
            "{prefix} {return_type} {entry_name}({})",
            params.join(", ")
        ));

        self.out.writeln("{");
        self.out.indent();
        for param in &loose {
            let name = self.name(param.name);
            let decl = self.decl(&param.ty, &name)?;
            self.out.writeln(&format!("{decl} = stage_input.{name};"));
        }
        self.block_contents(func.body)?;
        self.out.dedent();
        self.out.writeln("}");
        Ok(())
    }
}

impl<'m> Emitter<'m> for MslWriter<'_, 'm> {
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

    fn discard(&self) -> &'static str {
        "discard_fragment();"
    }
}

fn scalar_type(name: &str) -> Option<&'static str> {
    match name {
        "f32" => Some("float"),
        "f16" => Some("half"),
        "i32" => Some("int"),
        "u32" => Some("uint"),
        "bool" => Some("bool"),
        _ => None,
    }
}

fn texture_kind(name: &str) -> Option<&'static str> {
    match name {
        "texture_1d" => Some("texture1d"),
        "texture_2d" => Some("texture2d"),
        "texture_2d_array" => Some("texture2d_array"),
        "texture_3d" => Some("texture3d"),
        "texture_cube" => Some("texturecube"),
        _ => None,
    }
}

fn builtin_attr(builtin: BuiltinValue) -> &'static str {
    match builtin {
        BuiltinValue::Position => "position",
        BuiltinValue::VertexIndex => "vertex_id",
        BuiltinValue::InstanceIndex => "instance_id",
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
