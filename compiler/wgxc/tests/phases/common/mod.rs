//! Shared test utilities for phase tests.
//!
//! Helpers parse or compile a source and panic with the source and error
//! on an unexpected outcome.

use wgxc::{CompileOutput, CompilerContext, Diagnosis, GlslOptions, MslOptions, Program};

/// Parse source and assert it succeeds.
pub fn parse_ok(source: &str) -> Program {
    let program = Program::parse(source);
    if let Some(diagnosis) = program.diagnosis() {
        panic!("unexpected parse error {diagnosis}\nSource:\n{source}");
    }
    program
}

/// Parse source and assert it fails, returning the diagnosis.
pub fn parse_err(source: &str) -> Diagnosis {
    match Program::parse(source).diagnosis() {
        Some(diagnosis) => diagnosis.clone(),
        None => panic!("expected a parse error\nSource:\n{source}"),
    }
}

/// Compile `entry` to GLSL and assert it succeeds.
pub fn glsl_ok(
    program: &Program,
    entry: &str,
    options: &GlslOptions,
    context: Option<CompilerContext>,
) -> CompileOutput {
    match program.write_to_glsl(entry, options, context) {
        Ok(output) => output,
        Err(error) => panic!("GLSL compile of `{entry}` failed: {error}"),
    }
}

/// Compile `entry` to MSL and assert it succeeds.
pub fn msl_ok(
    program: &Program,
    entry: &str,
    options: &MslOptions,
    context: Option<CompilerContext>,
) -> CompileOutput {
    match program.write_to_msl(entry, options, context) {
        Ok(output) => output,
        Err(error) => panic!("MSL compile of `{entry}` failed: {error}"),
    }
}

/// A two-stage pipeline plus a compute entry point. The vertex stage reads
/// one uniform directly and one through a helper; the fragment stage reads
/// a uniform, a texture and a sampler.
pub const PIPELINE: &str = "
struct Camera { view_proj: mat4x4<f32> }
struct Model { transform: mat4x4<f32> }
struct Material { tint: vec4<f32>, roughness: f32 }
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}
struct Unused { x: f32 }

@group(0) @binding(0) var<uniform> camera: Camera;
@group(1) @binding(0) var<uniform> model: Model;
@group(0) @binding(1) var<uniform> material: Material;
@group(0) @binding(2) var albedo: texture_2d<f32>;
@group(0) @binding(3) var albedo_sampler: sampler;
@group(2) @binding(0) var<uniform> unused: Unused;

fn world(p: vec3<f32>) -> vec4<f32> {
    return model.transform * vec4<f32>(p, 1.0);
}

fn never_called() -> f32 {
    return unused.x;
}

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = camera.view_proj * world(position);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color: vec4<f32> = textureSample(albedo, albedo_sampler, in.uv);
    return color * material.tint;
}

@compute
fn cs_main() {}
";
