//! Stage interface: `in`/`out` declarations and the `main()` wrapper.
//!
//! Vertex inputs are `in_X`, varyings `vs_out_X` on both sides, fragment
//! struct outputs `out_X` and a bare fragment return value `fragColor`.

use wgx_ir::{AttributeSliceExt, BuiltinValue, Function, Name, PipelineStage, TypeRef};

use super::GlslWriter;
use crate::CodegenError;

impl GlslWriter<'_, '_> {
    pub(super) fn write_inputs(&mut self, func: &Function, stage: PipelineStage) -> Result<(), CodegenError> {
        let module = self.module;
        let arena = module.arena();
        for &param in arena.var_list(func.params) {
            let param = module.var(param);
            if let Some(members) = self.entry.struct_members(param.ty.name) {
                for member in arena.members(members) {
                    let attrs = arena.attrs(member.attrs);
                    if let Some(location) = attrs.location() {
                        self.write_varying(true, stage, location, attrs.is_flat(), &member.ty, member.name)?;
                    }
                }
            } else {
                let attrs = arena.attrs(param.attrs);
                if let Some(location) = attrs.location() {
                    self.write_varying(true, stage, location, attrs.is_flat(), &param.ty, param.name)?;
                }
            }
        }
        Ok(())
    }

    pub(super) fn write_outputs(&mut self, func: &Function, stage: PipelineStage) -> Result<(), CodegenError> {
        let module = self.module;
        let arena = module.arena();
        let Some(ret) = func.return_type else {
            return Ok(());
        };

        if let Some(members) = self.entry.struct_members(ret.name) {
            for member in arena.members(members) {
                let attrs = arena.attrs(member.attrs);
                if let Some(location) = attrs.location() {
                    self.write_varying(false, stage, location, attrs.is_flat(), &member.ty, member.name)?;
                }
            }
            return Ok(());
        }

        // A bare vertex return is `gl_Position`.
        if stage == PipelineStage::Vertex {
            return Ok(());
        }
        let layout = arena
            .attrs(func.return_attrs)
            .location()
            .map(|location| format!("layout(location = {location}) "))
            .unwrap_or_default();
        let decl = self.decl(&ret, "fragColor")?;
        self.out.writeln(&format!("{layout}out {decl};"));
        Ok(())
    }

    fn write_varying(
        &mut self,
        input: bool,
        stage: PipelineStage,
        location: u32,
        flat: bool,
        ty: &TypeRef,
        name: Name,
    ) -> Result<(), CodegenError> {
        let mut line = String::new();
        let fixed_location = (input && stage == PipelineStage::Vertex)
            || (!input && stage == PipelineStage::Fragment);
        if fixed_location || self.options.locations_on_all_interfaces() {
            line.push_str(&format!("layout(location = {location}) "));
        }
        if flat {
            line.push_str("flat ");
        }
        line.push_str(if input { "in " } else { "out " });
        line.push_str(&self.decl(ty, &self.varying_name(input, stage, name))?);
        line.push(';');
        self.out.writeln(&line);
        Ok(())
    }

    fn varying_name(&self, input: bool, stage: PipelineStage, name: Name) -> String {
        let name = self.module.name(name);
        match (input, stage) {
            (true, PipelineStage::Vertex) => format!("in_{name}"),
            (false, PipelineStage::Fragment) => format!("out_{name}"),
            _ => format!("vs_out_{name}"),
        }
    }

    fn builtin_input(&self, stage: PipelineStage, builtin: BuiltinValue) -> Result<&'static str, CodegenError> {
        match (stage, builtin) {
            (PipelineStage::Fragment, BuiltinValue::Position) => Ok("gl_FragCoord"),
            (PipelineStage::Vertex, BuiltinValue::VertexIndex) => Ok("uint(gl_VertexID)"),
            (PipelineStage::Vertex, BuiltinValue::InstanceIndex) => Ok("uint(gl_InstanceID)"),
            _ => Err(CodegenError::Unsupported(format!(
                "@builtin({}) as a {stage:?} input",
                builtin.as_str()
            ))),
        }
    }

    /// `void main()`: gather inputs, call the entry, scatter its result.
    pub(super) fn write_main(&mut self, func: &Function, stage: PipelineStage) -> Result<(), CodegenError> {
        let module = self.module;
        let arena = module.arena();

        self.out.writeln("void main() {");
        self.out.indent();

        let mut args = Vec::with_capacity(func.params.len());
        for &param in arena.var_list(func.params) {
            let param = module.var(param);
            let name = self.name(param.name);
            if let Some(members) = self.entry.struct_members(param.ty.name) {
                let decl = self.decl(&param.ty, &name)?;
                self.out.writeln(&format!("{decl};"));
                for member in arena.members(members) {
                    let attrs = arena.attrs(member.attrs);
                    let value = if let Some(builtin) = attrs.builtin() {
                        self.builtin_input(stage, builtin)?.to_owned()
                    } else if attrs.location().is_some() {
                        self.varying_name(true, stage, member.name)
                    } else {
                        continue;
                    };
                    self.out.writeln(&format!("{name}.{} = {value};", self.name(member.name)));
                }
            } else {
                let attrs = arena.attrs(param.attrs);
                let value = if let Some(builtin) = attrs.builtin() {
                    self.builtin_input(stage, builtin)?.to_owned()
                } else if attrs.location().is_some() {
                    self.varying_name(true, stage, param.name)
                } else {
                    return Err(CodegenError::Unsupported(format!(
                        "entry parameter `{name}` has neither @builtin nor @location"
                    )));
                };
                let decl = self.decl(&param.ty, &name)?;
                self.out.writeln(&format!("{decl} = {value};"));
            }
            args.push(name);
        }
        if !args.is_empty() {
            self.out.newline();
        }

        let call = format!("{}({})", self.name(func.name), args.join(", "));
        let Some(ret) = func.return_type else {
            self.out.writeln(&format!("{call};"));
            self.out.dedent();
            self.out.writeln("}");
            return Ok(());
        };

        let ret_type = self.type_name(ret.name, ret.args)?;
        self.out.writeln(&format!("{ret_type} entry_point_out = {call};"));
        if let Some(members) = self.entry.struct_members(ret.name) {
            for member in arena.members(members) {
                let attrs = arena.attrs(member.attrs);
                let member_name = self.name(member.name);
                if attrs.builtin() == Some(BuiltinValue::Position) && stage == PipelineStage::Vertex {
                    self.out.writeln(&format!("gl_Position = entry_point_out.{member_name};"));
                } else if attrs.location().is_some() {
                    let target = self.varying_name(false, stage, member.name);
                    self.out.writeln(&format!("{target} = entry_point_out.{member_name};"));
                }
            }
        } else if stage == PipelineStage::Vertex {
            self.out.writeln("gl_Position = entry_point_out;");
        } else {
            self.out.writeln("fragColor = entry_point_out;");
        }

        self.out.dedent();
        self.out.writeln("}");
        Ok(())
    }
}
