//! MSL expressions and intrinsic rewrites.

use wgx_ir::{ExprId, ExprKind, ExprRange, Ident};

use super::MslWriter;
use crate::common::{array_parts, float_literal, int_literal, unary};
use crate::emit::Emitter;
use crate::CodegenError;

impl MslWriter<'_, '_> {
    pub(super) fn expr_inner(&mut self, id: ExprId) -> Result<String, CodegenError> {
        let arena = self.module.arena();
        Ok(match arena.expr(id).kind {
            ExprKind::Bool(value) => value.to_string(),
            ExprKind::Int { value, suffix } => int_literal(value, suffix),
            ExprKind::Float { bits, .. } => float_literal(f64::from_bits(bits)),
            ExprKind::Ident(ident) if ident.has_args() => self.type_name(ident.name, ident.args)?,
            ExprKind::Ident(ident) => self.name(ident.name).into_owned(),
            ExprKind::Call { callee, args } => self.call_inner(callee, args)?,
            ExprKind::Paren(exprs) => format!("({})", self.expr_list(exprs)?),
            ExprKind::Unary { op, operand } => unary(op, &self.expr(operand)?),
            ExprKind::Index { object, index } => {
                format!("{}[{}]", self.expr(object)?, self.expr(index)?)
            }
            ExprKind::Member { object, member } => {
                format!("{}.{}", self.expr(object)?, self.name(member))
            }
            ExprKind::Binary { op, left, right } => {
                format!("{} {op} {}", self.expr(left)?, self.expr(right)?)
            }
            ExprKind::Phony => {
                return Err(CodegenError::Unsupported(
                    "`_` outside the left side of an assignment".to_owned(),
                ))
            }
        })
    }

    pub(super) fn call_inner(&mut self, callee: Ident, args: ExprRange) -> Result<String, CodegenError> {
        let module = self.module;
        let ids = module.arena().expr_list(args);
        match module.name(callee.name) {
            "textureSample" => {
                let [texture, sampler, rest @ ..] = ids else {
                    return Err(CodegenError::MalformedIntrinsic("textureSample".to_owned()));
                };
                let mut parts = vec![self.expr(*sampler)?];
                for &arg in rest {
                    parts.push(self.expr(arg)?);
                }
                Ok(format!("{}.sample({})", self.expr(*texture)?, parts.join(", ")))
            }
            "textureDimensions" => match *ids {
                [texture] => {
                    let texture = self.expr(texture)?;
                    Ok(format!("uint2({texture}.get_width(), {texture}.get_height())"))
                }
                [texture, level] => {
                    let texture = self.expr(texture)?;
                    let level = self.expr(level)?;
                    Ok(format!(
                        "uint2({texture}.get_width({level}), {texture}.get_height({level}))"
                    ))
                }
                _ => Err(CodegenError::MalformedIntrinsic("textureDimensions".to_owned())),
            },
            "atan2" => Ok(format!("precise::atan2({})", self.expr_list(args)?)),
            _ => {
                let name = self.type_name(callee.name, callee.args)?;
                let mut args = self.expr_list(args)?;
                if array_parts(module, callee.name, callee.args).is_some() {
                    return Ok(format!("{name}{{{args}}}"));
                }
                if let Some(helper) = self.entry.helper(callee.name) {
                    let captured = self.captures.get(&helper).map(Vec::as_slice).unwrap_or_default();
                    for &var in captured {
                        if !args.is_empty() {
                            args.push_str(", ");
                        }
                        args.push_str(&self.name(module.var(var).name));
                    }
                }
                Ok(format!("{name}({args})"))
            }
        }
    }
}
