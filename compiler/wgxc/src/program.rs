//! Parse-once, compile-per-entry-point facade.

use tracing::debug;
use wgx_codegen::{CodegenError, CompileOutput, CompilerContext, GlslOptions, MslOptions};
use wgx_diagnostic::Diagnosis;
use wgx_ir::{Module, PipelineStage, StringInterner};
use wgx_sema::{BindGroup, ClosureError, EntryPoint, LayoutError, MemoryLayout, MergeError};

/// Why a compile request produced no output.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("source failed to parse at {0}")]
    Parse(Diagnosis),
    #[error("no function named `{0}`")]
    MissingEntryPoint(String),
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
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl From<ClosureError> for CompileError {
    fn from(error: ClosureError) -> Self {
        match error {
            ClosureError::NotEntryPoint(name) => CompileError::NotEntryPoint(name),
            ClosureError::DuplicateBinding {
                group,
                binding,
                first,
                second,
            } => CompileError::DuplicateBinding {
                group,
                binding,
                first,
                second,
            },
            ClosureError::Layout(error) => CompileError::Layout(error),
        }
    }
}

/// Flag-style view of a compile, for callers that only check `success`.
///
/// A failed compile has empty `content`, no bind groups and a default
/// context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileResult {
    pub content: String,
    pub bind_groups: Vec<BindGroup>,
    pub success: bool,
    pub context: CompilerContext,
}

impl From<Result<CompileOutput, CompileError>> for CompileResult {
    fn from(result: Result<CompileOutput, CompileError>) -> Self {
        match result {
            Ok(output) => CompileResult {
                content: output.content,
                bind_groups: output.bind_groups,
                success: true,
                context: output.context,
            },
            Err(_) => CompileResult::default(),
        }
    }
}

/// A parsed shader source.
///
/// Holds either the module or the first parse error. The module lives as
/// long as the program; closures and reflection are rebuilt per request.
#[derive(Clone, Debug)]
pub struct Program {
    parsed: Result<Module, Diagnosis>,
}

impl Program {
    /// Scan and parse `source`. Never fails; check [`diagnosis`](Self::diagnosis).
    pub fn parse(source: &str) -> Self {
        let mut interner = StringInterner::new();
        let tokens = wgx_lexer::lex(source, &mut interner);
        let parsed = wgx_parse::parse(&tokens, interner).map_err(|error| {
            debug!(%error, "parse failed");
            error.to_diagnosis()
        });
        Program { parsed }
    }

    /// The first parse error, if parsing failed.
    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        self.parsed.as_ref().err()
    }

    pub fn module(&self) -> Option<&Module> {
        self.parsed.as_ref().ok()
    }

    /// Names and stages of all entry points, in source order.
    pub fn entry_points(&self) -> Vec<(&str, PipelineStage)> {
        let Some(module) = self.module() else {
            return Vec::new();
        };
        module
            .functions()
            .iter()
            .filter_map(|&id| {
                let stage = module.stage(id)?;
                Some((module.name(module.function(id).name), stage))
            })
            .collect()
    }

    /// Compile `entry` to GLSL, continuing slot numbering from `context`.
    #[tracing::instrument(level = "debug", skip(self, options, context))]
    pub fn write_to_glsl(
        &self,
        entry: &str,
        options: &GlslOptions,
        context: Option<CompilerContext>,
    ) -> Result<CompileOutput, CompileError> {
        let entry = self.entry_point(entry, MemoryLayout::Std140)?;
        Ok(wgx_codegen::write_glsl(&entry, options, context)?)
    }

    /// Compile `entry` to MSL, continuing slot numbering from `context`.
    #[tracing::instrument(level = "debug", skip(self, options, context))]
    pub fn write_to_msl(
        &self,
        entry: &str,
        options: &MslOptions,
        context: Option<CompilerContext>,
    ) -> Result<CompileOutput, CompileError> {
        let entry = self.entry_point(entry, MemoryLayout::Std430Msl)?;
        Ok(wgx_codegen::write_msl(&entry, options, context)?)
    }

    /// Bind groups of `entry` with the source's own binding numbers and
    /// WGSL buffer layout, for callers that consume the source directly.
    pub fn wgsl_bind_groups(&self, entry: &str) -> Result<Vec<BindGroup>, CompileError> {
        let entry = self.entry_point(entry, MemoryLayout::Wgsl)?;
        let mut groups = entry.into_bind_groups();
        for group in &mut groups {
            for binding in &mut group.entries {
                binding.index = binding.binding;
            }
        }
        Ok(groups)
    }

    fn entry_point(&self, name: &str, layout: MemoryLayout) -> Result<EntryPoint<'_>, CompileError> {
        let module = self.parsed.as_ref().map_err(|d| CompileError::Parse(d.clone()))?;
        let func = module
            .get_function(name)
            .ok_or_else(|| CompileError::MissingEntryPoint(name.to_owned()))?;
        Ok(EntryPoint::new(module, func, layout)?)
    }
}

/// Fold another stage's bind groups into `into`.
///
/// Groups are matched by index; unmatched groups are appended. `into` is
/// left unchanged if any group conflicts.
pub fn merge_bind_groups(into: &mut Vec<BindGroup>, other: &[BindGroup]) -> Result<(), MergeError> {
    let mut merged = into.clone();
    for incoming in other {
        match merged.iter_mut().find(|g| g.group == incoming.group) {
            Some(group) => group.merge(incoming)?,
            None => merged.push(incoming.clone()),
        }
    }
    *into = merged;
    Ok(())
}
