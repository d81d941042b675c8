// Test code uses unwrap/expect for clarity - panics provide good test failure messages
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Phase-based compiler tests.
//!
//! Unit tests inside each crate cover one phase in isolation. The tests
//! here drive several phases at once through the `wgxc` facade.
//!
//! # Organization
//!
//! - `parse/` - Scanner and parser (`wgx_lexer`, `wgx_parse`)
//! - `sema/` - Closure, reflection and buffer layout (`wgx_sema`)
//! - `codegen/` - GLSL and MSL emission (`wgx_codegen`)
//! - `common/` - Shared test utilities
//!
//! # Running Phase Tests
//!
//! ```bash
//! cargo test -p wgxc --test phases
//! cargo test -p wgxc --test phases codegen
//! ```

#[path = "phases/common/mod.rs"]
mod common;

#[path = "phases/parse/mod.rs"]
mod parse;

#[path = "phases/sema/mod.rs"]
mod sema;

#[path = "phases/codegen/mod.rs"]
mod codegen;
