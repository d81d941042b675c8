//! GLSL and MSL emission through the `Program` facade.
//!
//! - `glsl` / `msl`: per-backend output and reflection checks
//! - `pipeline`: vertex and fragment compiles chained through a context

mod glsl;
mod msl;
mod pipeline;

use wgxc::{BindGroupEntry, CompileOutput};

/// Vertex and fragment stages that each bind a uniform, a texture and a
/// sampler of their own.
pub const SHARED: &str = "
struct Params { scale: vec4<f32> }
struct Varyings {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@group(0) @binding(0) var<uniform> vertex_params: Params;
@group(0) @binding(1) var height_map: texture_2d<f32>;
@group(0) @binding(2) var height_sampler: sampler;
@group(1) @binding(0) var<uniform> fragment_params: Params;
@group(1) @binding(1) var color_map: texture_2d<f32>;
@group(1) @binding(2) var color_sampler: sampler;

@vertex
fn vs(@location(0) uv: vec2<f32>) -> Varyings {
    var v: Varyings;
    v.position = textureSample(height_map, height_sampler, uv) * vertex_params.scale;
    v.uv = uv;
    return v;
}

@fragment
fn fs(v: Varyings) -> @location(0) vec4<f32> {
    return textureSample(color_map, color_sampler, v.uv) * fragment_params.scale;
}
";

/// Every bind group entry of a compile: groups in first-use order, entries
/// in closure order.
pub fn entries(output: &CompileOutput) -> Vec<&BindGroupEntry> {
    output.bind_groups.iter().flat_map(|group| &group.entries).collect()
}
