//! GLSL and MSL backends for wgx.
//!
//! Each backend renders a single entry point, together with its
//! dependency closure, into one target-language source string.
//!
//! # Architecture
//!
//! ```text
//! Module + entry FuncId
//!        ↓
//!   EntryPoint       (closure + bind-group reflection, wgx_sema)
//!        ↓
//!   GlslWriter / MslWriter   (slot assignment + text)
//!        ↓
//!   CompileOutput    (source + bind groups + next free slots)
//! ```
//!
//! Slot counters travel in a [`CompilerContext`]. Feeding the context a
//! vertex compile returns into the fragment compile of the same pipeline
//! keeps the two stages' slots disjoint.

mod common;
mod emit;
mod error;
pub mod glsl;
pub mod msl;
mod options;
mod writer;

pub use error::CodegenError;
pub use glsl::write_glsl;
pub use msl::write_msl;
pub use options::{CompilerContext, GlslOptions, GlslStandard, MslOptions};

use wgx_sema::BindGroup;

/// Text and reflection produced by one successful backend run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompileOutput {
    /// Generated target source.
    pub content: String,
    /// Bind groups of the entry point, with `index` set to the slot the
    /// generated text uses.
    pub bind_groups: Vec<BindGroup>,
    /// Next free slots, for chaining another stage.
    pub context: CompilerContext,
}
