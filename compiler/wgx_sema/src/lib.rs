//! Semantic passes over a parsed shader module.
//!
//! - [`EntryPoint`]: the dependency closure of one entry point, i.e. the
//!   type declarations, globals and helper functions it transitively
//!   reaches, in first-discovery order
//! - [`BindGroup`] reflection for every `@group`/`@binding` resource in
//!   that closure
//! - [`TypeDefinition`]: the byte layout of a uniform buffer type under a
//!   given [`MemoryLayout`], with host-side data staging
//!
//! Backends consume an [`EntryPoint`] and never look at declarations
//! outside of it.

mod closure;
mod layout;
mod reflect;

pub use closure::{ClosureError, EntryPoint};
pub use layout::{
    round_up, Field, LayoutError, MemoryLayout, TypeDefinition, TypeKind, MAX_BUFFER_SIZE,
};
pub use reflect::{BindGroup, BindGroupEntry, BindingType, MergeError, ShaderStage};
