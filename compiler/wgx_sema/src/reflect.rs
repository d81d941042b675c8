//! Bind-group reflection.
//!
//! Every closure global carrying both `@group` and `@binding` becomes one
//! [`BindGroupEntry`], filed under its group. Backends later fill in the
//! slot they actually assigned (`index`), so the reflection a caller gets
//! back always matches the emitted text.

use std::rc::Rc;

use bitflags::bitflags;
use tracing::trace;
use wgx_ir::{AttributeSliceExt, Module, PipelineStage, VarId};

use crate::closure::ClosureError;
use crate::layout::{MemoryLayout, TypeDefinition};

bitflags! {
    /// Pipeline stages that use a binding.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ShaderStage: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
    }
}

impl From<PipelineStage> for ShaderStage {
    fn from(stage: PipelineStage) -> Self {
        match stage {
            PipelineStage::Vertex => ShaderStage::VERTEX,
            PipelineStage::Fragment => ShaderStage::FRAGMENT,
            PipelineStage::Compute => ShaderStage::empty(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BindingType {
    #[default]
    Undefined,
    UniformBuffer,
    Texture,
    Sampler,
}

impl BindingType {
    /// Classify a bound global by address space and declared type name.
    pub fn classify(has_address_space: bool, type_name: &str) -> Self {
        if has_address_space {
            BindingType::UniformBuffer
        } else if type_name == "texture_2d" {
            BindingType::Texture
        } else if type_name == "sampler" {
            BindingType::Sampler
        } else {
            BindingType::Undefined
        }
    }
}

/// One resource of a bind group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindGroupEntry {
    pub ty: BindingType,
    /// Binding index in the shader source.
    pub binding: u32,
    /// Source name. The GLSL backend appends `block_ubo` to uniform buffers,
    /// matching the emitted block name.
    pub name: String,
    /// Slot the target language actually uses.
    pub index: u32,
    /// Texture units a sampler is paired with. GLSL only.
    pub units: Option<Vec<u32>>,
    pub stage: ShaderStage,
    /// Buffer layout of a uniform buffer. Use `Rc::make_mut` to stage data.
    pub type_definition: Option<Rc<TypeDefinition>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindGroup {
    pub group: u32,
    pub entries: Vec<BindGroupEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("cannot merge bind group {found} into bind group {expected}")]
    GroupMismatch { expected: u32, found: u32 },
    #[error("binding {binding} is `{existing}` ({existing_ty:?}) in one stage and `{incoming}` ({incoming_ty:?}) in another")]
    Conflict {
        binding: u32,
        existing: String,
        existing_ty: BindingType,
        incoming: String,
        incoming_ty: BindingType,
    },
}

impl BindGroup {
    pub fn new(group: u32) -> Self {
        BindGroup {
            group,
            entries: Vec::new(),
        }
    }

    pub fn entry(&self, binding: u32) -> Option<&BindGroupEntry> {
        self.entries.iter().find(|e| e.binding == binding)
    }

    pub fn entry_mut(&mut self, binding: u32) -> Option<&mut BindGroupEntry> {
        self.entries.iter_mut().find(|e| e.binding == binding)
    }

    /// Fold another stage's view of the same group into this one.
    ///
    /// A binding present in both must agree on kind and name; its stages
    /// are OR-combined and sampler units are unioned. Bindings only in
    /// `other` are appended. On conflict `self` is left unchanged.
    pub fn merge(&mut self, other: &BindGroup) -> Result<(), MergeError> {
        if other.group != self.group {
            return Err(MergeError::GroupMismatch {
                expected: self.group,
                found: other.group,
            });
        }

        for incoming in &other.entries {
            if let Some(existing) = self.entry(incoming.binding) {
                if existing.ty != incoming.ty || existing.name != incoming.name {
                    return Err(MergeError::Conflict {
                        binding: incoming.binding,
                        existing: existing.name.clone(),
                        existing_ty: existing.ty,
                        incoming: incoming.name.clone(),
                        incoming_ty: incoming.ty,
                    });
                }
            }
        }

        for incoming in &other.entries {
            let Some(existing) = self.entry_mut(incoming.binding) else {
                self.entries.push(incoming.clone());
                continue;
            };
            existing.stage |= incoming.stage;
            if existing.type_definition.is_none() {
                existing.type_definition.clone_from(&incoming.type_definition);
            }
            if let Some(units) = &incoming.units {
                let merged = existing.units.get_or_insert_with(Vec::new);
                for &unit in units {
                    if !merged.contains(&unit) {
                        merged.push(unit);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Build bind groups for `globals`, in order, tagged with `stage`.
///
/// Groups appear in first-use order; entries in closure order. Globals
/// that are not `var`s, lack either attribute, or have an unrecognized
/// resource type are skipped. Two globals filed at the same group and
/// binding are an error.
pub(crate) fn collect_bind_groups(
    module: &Module,
    globals: &[VarId],
    stage: ShaderStage,
    layout: MemoryLayout,
) -> Result<Vec<BindGroup>, ClosureError> {
    let mut groups: Vec<BindGroup> = Vec::new();

    for &id in globals {
        let var = module.var(id);
        if !matches!(var.kind, wgx_ir::VarKind::Var { .. }) {
            continue;
        }
        let attrs = module.arena().attrs(var.attrs);
        let (Some(group), Some(binding)) = (attrs.group(), attrs.binding()) else {
            continue;
        };

        let ty = BindingType::classify(var.address_space().is_some(), module.name(var.ty.name));
        if ty == BindingType::Undefined {
            continue;
        }
        let type_definition = if ty == BindingType::UniformBuffer {
            Some(Rc::new(TypeDefinition::from_type_ref(module, &var.ty, layout)?))
        } else {
            None
        };

        let entry = BindGroupEntry {
            ty,
            binding,
            name: module.name(var.name).to_owned(),
            index: 0,
            units: None,
            stage,
            type_definition,
        };
        trace!(group, binding, name = %entry.name, ?ty, "bind group entry");

        match groups.iter_mut().find(|g| g.group == group) {
            Some(bind_group) => {
                if let Some(first) = bind_group.entry(binding) {
                    return Err(ClosureError::DuplicateBinding {
                        group,
                        binding,
                        first: first.name.clone(),
                        second: entry.name,
                    });
                }
                bind_group.entries.push(entry);
            }
            None => groups.push(BindGroup {
                group,
                entries: vec![entry],
            }),
        }
    }

    Ok(groups)
}
