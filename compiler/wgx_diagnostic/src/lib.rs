//! Diagnostics for shader compilation.
//!
//! Parsing stops at the first error, so a compile produces at most one
//! [`Diagnosis`]. The terminal emitter renders it with the offending source
//! line and a caret under the reported column.

mod diagnosis;
pub mod emitter;

pub use diagnosis::{Diagnosis, Severity};
