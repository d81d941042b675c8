//! GLSL expressions and intrinsic rewrites.

use wgx_ir::{ExprId, ExprKind, ExprRange, Ident};

use super::GlslWriter;
use crate::common::{bind_entry, float_literal, global_of, int_literal, unary};
use crate::emit::Emitter;
use crate::CodegenError;

impl GlslWriter<'_, '_> {
    pub(super) fn expr_inner(&mut self, id: ExprId) -> Result<String, CodegenError> {
        let arena = self.module.arena();
        Ok(match arena.expr(id).kind {
            ExprKind::Bool(value) => value.to_string(),
            ExprKind::Int { value, suffix } => int_literal(value, suffix),
            ExprKind::Float { bits, .. } => float_literal(f64::from_bits(bits)),
            ExprKind::Ident(ident) => self.ident(ident)?,
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

    fn ident(&self, ident: Ident) -> Result<String, CodegenError> {
        if ident.has_args() {
            return self.type_name(ident.name, ident.args);
        }
        let name = self.name(ident.name);
        match self.entry.global(ident.name) {
            Some(var) if self.uniforms.contains(&var) => Ok(format!("{name}.inner")),
            _ => Ok(name.into_owned()),
        }
    }

    pub(super) fn call_inner(&mut self, callee: Ident, args: ExprRange) -> Result<String, CodegenError> {
        let module = self.module;
        let ids = module.arena().expr_list(args);
        match module.name(callee.name) {
            "textureSample" => self.texture_sample(ids),
            "textureDimensions" => match *ids {
                [texture] => Ok(format!("textureSize({}, 0)", self.expr(texture)?)),
                [texture, level] => Ok(format!(
                    "textureSize({}, {})",
                    self.expr(texture)?,
                    self.expr(level)?
                )),
                _ => Err(CodegenError::MalformedIntrinsic("textureDimensions".to_owned())),
            },
            "select" => match *ids {
                [if_false, if_true, cond] => Ok(format!(
                    "({} ? {} : {})",
                    self.expr(cond)?,
                    self.expr(if_true)?,
                    self.expr(if_false)?
                )),
                _ => Err(CodegenError::MalformedIntrinsic("select".to_owned())),
            },
            _ => {
                let callee = self.type_name(callee.name, callee.args)?;
                Ok(format!("{callee}({})", self.expr_list(args)?))
            }
        }
    }

    /// `textureSample(t, s, uv, ...)` is `texture(t, uv, ...)`. The
    /// texture's unit is recorded on the sampler's bind group entry.
    fn texture_sample(&mut self, args: &[ExprId]) -> Result<String, CodegenError> {
        let malformed = || CodegenError::MalformedIntrinsic("textureSample".to_owned());
        let [texture, sampler, rest @ ..] = args else {
            return Err(malformed());
        };
        let texture_var = global_of(self.entry, *texture).ok_or_else(malformed)?;
        let sampler_var = global_of(self.entry, *sampler).ok_or_else(malformed)?;
        let unit = *self.texture_units.get(&texture_var).ok_or_else(malformed)?;

        let sampler_entry = bind_entry(&mut self.bind_groups, self.entry, self.module.var(sampler_var))?;
        let units = sampler_entry.units.get_or_insert_with(Vec::new);
        if !units.contains(&unit) {
            units.push(unit);
        }

        let mut parts = vec![self.expr(*texture)?];
        for &arg in rest {
            parts.push(self.expr(arg)?);
        }
        Ok(format!("texture({})", parts.join(", ")))
    }
}
