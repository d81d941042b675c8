//! Buffer memory layout.
//!
//! A [`TypeDefinition`] mirrors the byte layout the GPU compiler gives a
//! uniform buffer type, so the host can stage values and write them at the
//! right offsets. The offset arithmetic here must agree exactly with the
//! target language's own rules; a one-byte drift corrupts every member that
//! follows it.

use std::fmt;

use rustc_hash::FxHashSet;
use tracing::trace;
use wgx_ir::{AttributeSliceExt, ExprId, ExprKind, Module, Name, TypeDeclKind, TypeRef};

/// Layout policy for buffer types.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MemoryLayout {
    /// GLSL uniform blocks: array alignment rounds up to 16.
    #[default]
    Std140,
    Std430,
    /// Metal's packing: like std430, but `vec3` occupies four elements.
    Std430Msl,
    /// Native WGSL reflection, no extra rounding.
    Wgsl,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("unknown type `{0}`")]
    UnknownType(String),
    #[error("unsupported matrix type `{0}`")]
    UnsupportedMatrix(String),
    #[error("malformed array type: {0}")]
    MalformedArray(String),
    #[error("struct `{0}` has no members")]
    EmptyStruct(String),
    #[error("type `{0}` contains itself")]
    RecursiveType(String),
    #[error("type `{0}` is larger than {MAX_BUFFER_SIZE} bytes")]
    TooLarge(String),
}

/// Largest buffer type a layout is computed for. Host staging keeps one
/// node per array element, so this stays well below storage-buffer limits
/// while leaving room above WebGPU's 64 KiB default uniform-buffer limit.
pub const MAX_BUFFER_SIZE: usize = 1 << 20;

/// `⌈n / k⌉ × k`.
///
/// A zero `k` leaves `n` unchanged.
#[inline]
pub fn round_up(k: usize, n: usize) -> usize {
    if k == 0 {
        return n;
    }
    n.div_ceil(k) * k
}

/// One struct member at its byte offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub offset: usize,
    pub ty: TypeDefinition,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// Scalar, vector or matrix.
    ///
    /// `data` is `size` bytes of staging storage. `packed` is the byte count
    /// a caller may hand to `set_data` besides the full size; it differs from
    /// `size` only for an MSL `vec3`, which stores three elements in the
    /// space of four.
    Leaf { data: Vec<u8>, packed: usize },
    Array {
        elements: Vec<TypeDefinition>,
        stride: usize,
    },
    Struct { members: Vec<Field> },
}

/// Layout of one buffer type, with staged host data for its leaves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDefinition {
    name: String,
    size: usize,
    alignment: usize,
    kind: TypeKind,
}

impl TypeDefinition {
    /// Build the layout of `ty` as declared in `module`.
    pub fn from_type_ref(
        module: &Module,
        ty: &TypeRef,
        layout: MemoryLayout,
    ) -> Result<Self, LayoutError> {
        let mut builder = LayoutBuilder {
            module,
            layout,
            in_progress: FxHashSet::default(),
        };
        builder.build(ty.name, module.arena().expr_list(ty.args))
    }

    fn leaf(name: impl Into<String>, size: usize, alignment: usize) -> Self {
        Self::leaf_packed(name, size, alignment, size)
    }

    fn leaf_packed(name: impl Into<String>, size: usize, alignment: usize, packed: usize) -> Self {
        TypeDefinition {
            name: name.into(),
            size,
            alignment,
            kind: TypeKind::Leaf {
                data: vec![0; size],
                packed,
            },
        }
    }

    fn array(element: TypeDefinition, count: usize, layout: MemoryLayout) -> Result<Self, LayoutError> {
        let array_align = match layout {
            MemoryLayout::Std140 => round_up(16, element.alignment),
            MemoryLayout::Std430 | MemoryLayout::Std430Msl | MemoryLayout::Wgsl => {
                element.alignment
            }
        };
        let stride = round_up(array_align, element.size);
        let name = format!("array<{}, {count}>", element.name);
        let Some(size) = stride.checked_mul(count).filter(|&size| size <= MAX_BUFFER_SIZE) else {
            return Err(LayoutError::MalformedArray(format!(
                "{name} is larger than {MAX_BUFFER_SIZE} bytes"
            )));
        };
        Ok(TypeDefinition {
            name,
            size,
            alignment: array_align,
            kind: TypeKind::Array {
                elements: vec![element; count],
                stride,
            },
        })
    }

    fn structure(name: String, members: Vec<(String, TypeDefinition)>) -> Self {
        let alignment = members.iter().map(|(_, ty)| ty.alignment).max().unwrap_or(0);

        let mut offset = 0;
        let mut fields = Vec::with_capacity(members.len());
        for (member_name, ty) in members {
            offset = round_up(ty.alignment, offset);
            let size = ty.size;
            fields.push(Field {
                name: member_name,
                offset,
                ty,
            });
            offset += size;
        }

        TypeDefinition {
            name,
            size: round_up(alignment, offset),
            alignment,
            kind: TypeKind::Struct { members: fields },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct { .. })
    }

    /// Element stride of an array.
    pub fn stride(&self) -> Option<usize> {
        match &self.kind {
            TypeKind::Array { stride, .. } => Some(*stride),
            _ => None,
        }
    }

    /// Element count of an array, 0 otherwise.
    pub fn count(&self) -> usize {
        match &self.kind {
            TypeKind::Array { elements, .. } => elements.len(),
            _ => 0,
        }
    }

    /// Staged bytes of a leaf.
    pub fn data(&self) -> Option<&[u8]> {
        match &self.kind {
            TypeKind::Leaf { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn element_at(&self, index: usize) -> Option<&TypeDefinition> {
        match &self.kind {
            TypeKind::Array { elements, .. } => elements.get(index),
            _ => None,
        }
    }

    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut TypeDefinition> {
        match &mut self.kind {
            TypeKind::Array { elements, .. } => elements.get_mut(index),
            _ => None,
        }
    }

    pub fn member(&self, name: &str) -> Option<&Field> {
        match &self.kind {
            TypeKind::Struct { members } => members.iter().find(|m| m.name == name),
            _ => None,
        }
    }

    pub fn member_mut(&mut self, name: &str) -> Option<&mut Field> {
        match &mut self.kind {
            TypeKind::Struct { members } => members.iter_mut().find(|m| m.name == name),
            _ => None,
        }
    }

    /// Stage host data.
    ///
    /// Leaves take exactly their size (or the packed size of an MSL
    /// `vec3`). Arrays and structs take their full size, which is split by
    /// element stride or member offset. Returns `false` and leaves earlier
    /// leaves written on a size mismatch.
    pub fn set_data(&mut self, bytes: &[u8]) -> bool {
        let size = self.size;
        match &mut self.kind {
            TypeKind::Leaf { data, packed } => {
                if bytes.len() != size && bytes.len() != *packed {
                    return false;
                }
                data[..bytes.len()].copy_from_slice(bytes);
                true
            }
            TypeKind::Array { elements, stride } => {
                if bytes.len() != size {
                    return false;
                }
                let stride = *stride;
                elements.iter_mut().enumerate().all(|(i, element)| {
                    let start = i * stride;
                    element.set_data(&bytes[start..start + element.size])
                })
            }
            TypeKind::Struct { members } => {
                if bytes.len() != size {
                    return false;
                }
                members.iter_mut().all(|member| {
                    let start = member.offset;
                    member.ty.set_data(&bytes[start..start + member.ty.size])
                })
            }
        }
    }

    /// Write every staged leaf into `buffer` at `offset` plus its computed
    /// offset. Returns `false` without writing if the buffer is too short.
    pub fn write_to_buffer(&self, buffer: &mut [u8], offset: usize) -> bool {
        if offset + self.size > buffer.len() {
            return false;
        }
        self.write_unchecked(buffer, offset);
        true
    }

    fn write_unchecked(&self, buffer: &mut [u8], offset: usize) {
        match &self.kind {
            TypeKind::Leaf { data, .. } => {
                buffer[offset..offset + data.len()].copy_from_slice(data);
            }
            TypeKind::Array { elements, stride } => {
                for (i, element) in elements.iter().enumerate() {
                    element.write_unchecked(buffer, offset + i * stride);
                }
            }
            TypeKind::Struct { members } => {
                for member in members {
                    member.ty.write_unchecked(buffer, offset + member.offset);
                }
            }
        }
    }
}

impl fmt::Display for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (size {}, align {})", self.name, self.size, self.alignment)
    }
}

struct LayoutBuilder<'m> {
    module: &'m Module,
    layout: MemoryLayout,
    /// Structs currently being laid out, to reject self-containing types.
    in_progress: FxHashSet<Name>,
}

impl LayoutBuilder<'_> {
    fn build(&mut self, name: Name, args: &[ExprId]) -> Result<TypeDefinition, LayoutError> {
        wgx_stack::ensure_sufficient_stack(|| self.build_inner(name, args))
    }

    fn build_inner(
        &mut self,
        name: Name,
        args: &[ExprId],
    ) -> Result<TypeDefinition, LayoutError> {
        let module = self.module;
        let text = module.name(name);
        match text {
            "f32" | "i32" | "u32" | "bool" => return Ok(TypeDefinition::leaf(text, 4, 4)),
            "f16" => return Ok(TypeDefinition::leaf(text, 2, 2)),
            "vec2" | "vec3" | "vec4" => return self.vector(text, args),
            "array" => return self.array_of(args),
            _ => {}
        }
        if text.starts_with("mat") {
            return Self::matrix(text, args, module);
        }

        let Some(decl_id) = module.type_decl_by_name(name) else {
            return Err(LayoutError::UnknownType(text.to_owned()));
        };
        if !self.in_progress.insert(name) {
            return Err(LayoutError::RecursiveType(text.to_owned()));
        }
        let decl = module.type_decl(decl_id);
        match decl.kind {
            TypeDeclKind::Alias(target) => {
                let target_args = module.arena().expr_list(target.args);
                let def = self.build(target.name, target_args)?;
                self.in_progress.remove(&name);
                Ok(def)
            }
            TypeDeclKind::Struct(members) => {
                let mut fields = Vec::with_capacity(members.len());
                for member in module.arena().members(members) {
                    let member_args = module.arena().expr_list(member.ty.args);
                    let mut ty = self.build(member.ty.name, member_args)?;
                    if let Some(align) = module.arena().attrs(member.attrs).align() {
                        ty.alignment = align as usize;
                    }
                    fields.push((module.name(member.name).to_owned(), ty));
                }
                self.in_progress.remove(&name);

                if fields.is_empty() {
                    return Err(LayoutError::EmptyStruct(text.to_owned()));
                }
                let def = TypeDefinition::structure(text.to_owned(), fields);
                if def.size > MAX_BUFFER_SIZE {
                    return Err(LayoutError::TooLarge(text.to_owned()));
                }
                trace!(name = text, size = def.size, align = def.alignment, "struct layout");
                Ok(def)
            }
        }
    }

    /// Element scalar name from `<T>` template arguments.
    fn element_name<'a>(module: &'a Module, args: &[ExprId]) -> Option<&'a str> {
        let [arg] = args else {
            return None;
        };
        match &module.arena().expr(*arg).kind {
            ExprKind::Ident(ident) if !ident.has_args() => Some(module.name(ident.name)),
            _ => None,
        }
    }

    fn vector(&self, text: &str, args: &[ExprId]) -> Result<TypeDefinition, LayoutError> {
        let element = Self::element_name(self.module, args)
            .ok_or_else(|| LayoutError::UnknownType(text.to_owned()))?;
        let scalar = match element {
            "f32" | "i32" | "u32" | "bool" => 4,
            "f16" => 2,
            _ => return Err(LayoutError::UnknownType(format!("{text}<{element}>"))),
        };
        let name = format!("{text}<{element}>");
        Ok(match text {
            "vec2" => TypeDefinition::leaf(name, 2 * scalar, 2 * scalar),
            "vec3" if self.layout == MemoryLayout::Std430Msl => {
                TypeDefinition::leaf_packed(name, 4 * scalar, 4 * scalar, 3 * scalar)
            }
            "vec3" => TypeDefinition::leaf(name, 3 * scalar, 4 * scalar),
            _ => TypeDefinition::leaf(name, 4 * scalar, 4 * scalar),
        })
    }

    fn matrix(
        text: &str,
        args: &[ExprId],
        module: &Module,
    ) -> Result<TypeDefinition, LayoutError> {
        let element = Self::element_name(module, args).unwrap_or("f32");
        if element != "f32" {
            return Err(LayoutError::UnsupportedMatrix(format!("{text}<{element}>")));
        }
        let name = format!("{text}<f32>");
        match text {
            "mat2x2" => Ok(TypeDefinition::leaf(name, 16, 8)),
            "mat3x3" => Ok(TypeDefinition::leaf(name, 48, 16)),
            "mat4x4" => Ok(TypeDefinition::leaf(name, 64, 16)),
            "mat2x3" | "mat2x4" | "mat3x2" | "mat3x4" | "mat4x2" | "mat4x3" => {
                Err(LayoutError::UnsupportedMatrix(text.to_owned()))
            }
            _ => Err(LayoutError::UnknownType(text.to_owned())),
        }
    }

    fn array_of(&mut self, args: &[ExprId]) -> Result<TypeDefinition, LayoutError> {
        let module = self.module;
        let [element, count] = args else {
            return Err(LayoutError::MalformedArray(format!(
                "expected 2 template arguments, found {}",
                args.len()
            )));
        };
        let ExprKind::Ident(element) = &module.arena().expr(*element).kind else {
            return Err(LayoutError::MalformedArray(
                "element type is not a type name".to_owned(),
            ));
        };
        let count = match module.arena().expr(*count).kind {
            ExprKind::Int { value, .. } if value > 0 => {
                usize::try_from(value).map_err(|_| {
                    LayoutError::MalformedArray(format!("element count {value} is too large"))
                })?
            }
            _ => {
                return Err(LayoutError::MalformedArray(
                    "element count is not a positive integer literal".to_owned(),
                ))
            }
        };

        let element_args = module.arena().expr_list(element.args);
        let element = self.build(element.name, element_args)?;
        TypeDefinition::array(element, count, self.layout)
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
