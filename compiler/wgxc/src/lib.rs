//! wgx shader compiler.
//!
//! [`Program`] parses a source once and compiles any of its entry points
//! to GLSL or MSL on demand:
//!
//! ```text
//! source ──lex/parse──▶ Program ──write_to_glsl(entry)──▶ CompileOutput
//!                              └──write_to_msl(entry)───▶ CompileOutput
//! ```
//!
//! A parse failure is kept on the program as a [`Diagnosis`]; every later
//! compile request on it fails with [`CompileError::Parse`].

pub mod commands;
mod program;

use std::sync::Once;

pub use program::{merge_bind_groups, CompileError, CompileResult, Program};
pub use wgx_codegen::{CompileOutput, CompilerContext, GlslOptions, GlslStandard, MslOptions};
pub use wgx_diagnostic::Diagnosis;
pub use wgx_sema::{BindGroup, BindGroupEntry, BindingType, ShaderStage};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=wgx_parse=trace`,
/// `RUST_LOG=wgx_codegen=debug` and so on.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
