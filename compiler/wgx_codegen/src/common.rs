//! AST queries and spellings shared by both backends.

use std::borrow::Cow;

use wgx_ir::{
    AttributeSliceExt, BuiltinValue, ExprId, ExprKind, ExprRange, Function, Ident, IntSuffix,
    Module, Name, TypeDeclKind, UnaryOp, VarId, Variable,
};
use wgx_sema::{BindGroup, BindGroupEntry, EntryPoint};

use crate::CodegenError;

/// Suffix a target-language reserved word with `_1`.
pub(crate) fn escape<'a>(name: &'a str, reserved: &[&str]) -> Cow<'a, str> {
    if reserved.contains(&name) {
        Cow::Owned(format!("{name}_1"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Shortest spelling that reads back as the same value and keeps a `.`
/// or exponent, so integral values stay floats (`2.0`, `1e20`).
pub(crate) fn float_literal(value: f64) -> String {
    format!("{value:?}")
}

/// `op` applied to a rendered operand. An operand starting with the same
/// symbol is spaced off, so `- -x` never reads back as `--x`.
pub(crate) fn unary(op: UnaryOp, operand: &str) -> String {
    let symbol = op.as_symbol();
    if operand.starts_with(symbol) {
        format!("{symbol} {operand}")
    } else {
        format!("{symbol}{operand}")
    }
}

/// A vertex entry must return `@builtin(position)`, either directly or as
/// a member of its output struct.
pub(crate) fn check_vertex_output(entry: &EntryPoint<'_>, func: &Function) -> Result<(), CodegenError> {
    let module = entry.module();
    let arena = module.arena();
    let entry_name = module.name(func.name);
    let Some(ret) = func.return_type else {
        return Err(CodegenError::UnattributedVertexOutput(entry_name.to_owned()));
    };
    let has_position = match entry.struct_members(ret.name) {
        Some(members) => arena
            .members(members)
            .iter()
            .any(|member| arena.attrs(member.attrs).builtin() == Some(BuiltinValue::Position)),
        None => {
            let attrs = arena.attrs(func.return_attrs);
            if attrs.is_empty() {
                return Err(CodegenError::UnattributedVertexOutput(entry_name.to_owned()));
            }
            attrs.builtin() == Some(BuiltinValue::Position)
        }
    };
    if has_position {
        Ok(())
    } else {
        Err(CodegenError::MissingPosition(entry_name.to_owned()))
    }
}

pub(crate) fn int_literal(value: i64, suffix: IntSuffix) -> String {
    match suffix {
        IntSuffix::U => format!("{value}u"),
        IntSuffix::None | IntSuffix::I => value.to_string(),
    }
}

pub(crate) fn vector_width(name: &str) -> Option<u8> {
    match name {
        "vec2" => Some(2),
        "vec3" => Some(3),
        "vec4" => Some(4),
        _ => None,
    }
}

/// `matCxR` as `(columns, rows)`.
pub(crate) fn matrix_shape(name: &str) -> Option<(u8, u8)> {
    let (columns, rows) = name.strip_prefix("mat")?.split_once('x')?;
    let columns: u8 = columns.parse().ok()?;
    let rows: u8 = rows.parse().ok()?;
    ((2..=4).contains(&columns) && (2..=4).contains(&rows)).then_some((columns, rows))
}

#[inline]
pub(crate) fn is_texture(name: &str) -> bool {
    name.starts_with("texture_")
}

#[inline]
pub(crate) fn is_sampler(name: &str) -> bool {
    matches!(name, "sampler" | "sampler_comparison")
}

/// The first template argument when it is a plain type name, e.g. `f32`
/// in `vec3<f32>`.
pub(crate) fn element_type(module: &Module, args: ExprRange) -> Option<&str> {
    let first = *module.arena().expr_list(args).first()?;
    match module.arena().expr(first).kind {
        ExprKind::Ident(ident) => Some(module.name(ident.name)),
        _ => None,
    }
}

/// Element type and count expression of `array<T, N>`.
pub(crate) fn array_parts(module: &Module, name: Name, args: ExprRange) -> Option<(Ident, ExprId)> {
    if module.name(name) != "array" {
        return None;
    }
    let arena = module.arena();
    let &[element, count] = arena.expr_list(args) else {
        return None;
    };
    match arena.expr(element).kind {
        ExprKind::Ident(ident) => Some((ident, count)),
        _ => None,
    }
}

/// Follow closure aliases until a non-alias type.
pub(crate) fn resolve_alias(
    entry: &EntryPoint<'_>,
    mut name: Name,
    mut args: ExprRange,
) -> Result<(Name, ExprRange), CodegenError> {
    for _ in 0..=entry.type_decls().len() {
        match entry.type_decl(name).map(|decl| decl.kind) {
            Some(TypeDeclKind::Alias(target)) => {
                name = target.name;
                args = target.args;
            }
            _ => return Ok((name, args)),
        }
    }
    Err(CodegenError::Unsupported(format!(
        "recursive alias `{}`",
        entry.module().name(name)
    )))
}

/// Array element count: an integer literal or a constant's name.
pub(crate) fn array_count(module: &Module, count: ExprId, reserved: &[&str]) -> Result<String, CodegenError> {
    match module.arena().expr(count).kind {
        ExprKind::Int { value, .. } => Ok(value.to_string()),
        ExprKind::Ident(ident) if !ident.has_args() => {
            Ok(escape(module.name(ident.name), reserved).into_owned())
        }
        _ => Err(CodegenError::Unsupported(
            "array element count must be an integer literal or a constant name".to_owned(),
        )),
    }
}

/// The closure global an identifier expression refers to.
pub(crate) fn global_of(entry: &EntryPoint<'_>, id: ExprId) -> Option<VarId> {
    match entry.module().arena().expr(id).kind {
        ExprKind::Ident(ident) => entry.global(ident.name),
        _ => None,
    }
}

/// The reflected entry of a bound global.
pub(crate) fn bind_entry<'g>(
    groups: &'g mut [BindGroup],
    entry: &EntryPoint<'_>,
    var: &Variable,
) -> Result<&'g mut BindGroupEntry, CodegenError> {
    let module = entry.module();
    let name = module.name(var.name);
    let attrs = module.arena().attrs(var.attrs);
    let (Some(group), Some(binding)) = (attrs.group(), attrs.binding()) else {
        return Err(CodegenError::MissingBinding(name.to_owned()));
    };
    groups
        .iter_mut()
        .find(|g| g.group == group)
        .and_then(|g| g.entry_mut(binding))
        .ok_or_else(|| CodegenError::UnresolvedBinding {
            name: name.to_owned(),
            group,
            binding,
        })
}
