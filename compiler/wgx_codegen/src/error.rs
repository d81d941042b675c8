//! Emission errors.
//!
//! A backend stops at the first error and hands back no text.

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
    #[error("compute entry point `{0}` is not supported")]
    ComputeStage(String),
    #[error("`{0}` has no @group or @binding attribute")]
    MissingBinding(String),
    #[error("no bind group entry for `{name}` at group {group}, binding {binding}")]
    UnresolvedBinding { name: String, group: u32, binding: u32 },
    #[error("address space `{space}` of `{name}` is not supported")]
    UnsupportedAddressSpace { name: String, space: String },
    #[error("vertex entry point `{0}` must return a value with a @builtin or @location attribute")]
    UnattributedVertexOutput(String),
    #[error("vertex entry point `{0}` does not write @builtin(position)")]
    MissingPosition(String),
    #[error("malformed call to `{0}`")]
    MalformedIntrinsic(String),
    #[error("unsupported construct: {0}")]
    Unsupported(String),
}
