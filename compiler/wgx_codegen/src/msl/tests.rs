use pretty_assertions::assert_eq;
use wgx_ir::StringInterner;
use wgx_sema::{BindingType, MemoryLayout};

use super::*;

fn parse_ok(source: &str) -> Module {
    let mut interner = StringInterner::new();
    let tokens = wgx_lexer::lex(source, &mut interner);
    match wgx_parse::parse(&tokens, interner) {
        Ok(module) => module,
        Err(error) => panic!("unexpected parse error: {error}"),
    }
}

fn msl_with(
    source: &str,
    entry: &str,
    options: &MslOptions,
    context: Option<CompilerContext>,
) -> Result<CompileOutput, CodegenError> {
    let module = parse_ok(source);
    let func = module.get_function(entry).unwrap();
    let entry = EntryPoint::new(&module, func, MemoryLayout::Std430Msl).unwrap();
    write_msl(&entry, options, context)
}

fn msl(source: &str, entry: &str) -> CompileOutput {
    msl_with(source, entry, &MslOptions::default(), None).unwrap()
}

const HEADER: &str = "\
#include <metal_stdlib>
#include <simd/simd.h>

using namespace metal;

";

const SHADER: &str = "
struct Transform { mvp: mat4x4<f32> }
struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@group(0) @binding(0) var<uniform> transform: Transform;
@group(0) @binding(1) var color_texture: texture_2d<f32>;
@group(0) @binding(2) var color_sampler: sampler;

const SCALE: f32 = 2.0;

fn scale(v: vec4<f32>) -> vec4<f32> {
    return v * SCALE;
}

fn project(p: vec2<f32>) -> vec4<f32> {
    return scale(transform.mvp * vec4<f32>(p, 0.0, 1.0));
}

@vertex
fn vs_main(@location(0) pos: vec2<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.position = project(pos);
    out.uv = uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(color_texture, color_sampler, in.uv);
}
";

#[test]
fn test_vertex_shader() {
    let output = msl(SHADER, "vs_main");
    let expected = format!(
        "{HEADER}\
struct VertexOutput {{
    float4 position [[position]];
    float2 uv [[user(locn0)]];
}};

struct Transform {{
    float4x4 mvp;
}};

constant float SCALE = 2.0;

float4 scale(float4 v)
{{
    return v * SCALE;
}}

float4 project(float2 p, constant Transform& transform)
{{
    return scale(transform.mvp * float4(p, 0.0, 1.0));
}}

struct vs_main_in {{
    float2 pos [[attribute(0)]];
    float2 uv [[attribute(1)]];
}};

[[vertex]] VertexOutput vs_main(vs_main_in stage_input [[stage_in]], constant Transform& transform [[buffer(2)]])
{{
    float2 pos = stage_input.pos;
    float2 uv = stage_input.uv;
    VertexOutput out;
    out.position = project(pos, transform);
    out.uv = uv;
    return out;
}}
"
    );
    assert_eq!(output.content, expected);

    let transform = output.bind_groups[0].entry(0).unwrap();
    assert_eq!((transform.ty, transform.index), (BindingType::UniformBuffer, 2));
    assert_eq!(transform.name, "transform");
    assert_eq!(transform.type_definition.as_ref().unwrap().size(), 64);
    assert_eq!(
        output.context,
        CompilerContext {
            last_ubo_binding: 3,
            last_texture_binding: 0,
            last_sampler_binding: 0,
        }
    );
}

#[test]
fn test_fragment_shader() {
    let output = msl(SHADER, "fs_main");
    let expected = format!(
        "{HEADER}\
struct VertexOutput {{
    float4 position [[position]];
    float2 uv [[user(locn0)]];
}};

[[fragment]] float4 fs_main(VertexOutput in [[stage_in]], texture2d<float> color_texture [[texture(0)]], sampler color_sampler [[sampler(0)]])
{{
    return color_texture.sample(color_sampler, in.uv);
}}
"
    );
    assert_eq!(output.content, expected);

    let group = &output.bind_groups[0];
    assert_eq!(group.entry(1).map(|e| e.index), Some(0));
    assert_eq!(group.entry(2).map(|e| e.index), Some(0));
    assert_eq!(group.entry(2).and_then(|e| e.units.clone()), None);
    assert_eq!(output.context.last_texture_binding, 1);
    assert_eq!(output.context.last_sampler_binding, 1);
}

#[test]
fn test_old_versions_use_stage_keywords() {
    let options = MslOptions {
        msl_version_major: 2,
        msl_version_minor: 2,
        ..MslOptions::default()
    };
    let output = msl_with(SHADER, "fs_main", &options, None).unwrap();
    assert!(output.content.contains("\nfragment float4 fs_main("));
    assert!(!output.content.contains("[[fragment]]"));
}

const PIPELINE: &str = "
struct Globals { tint: vec4<f32> }
@group(0) @binding(0) var<uniform> vertex_globals: Globals;
@group(0) @binding(1) var<uniform> fragment_globals: Globals;
@group(0) @binding(2) var tex: texture_2d<f32>;
@group(0) @binding(3) var samp: sampler;

@vertex
fn vs(@builtin(vertex_index) index: u32) -> @builtin(position) vec4<f32> {
    return vertex_globals.tint * f32(index);
}

@fragment
fn fs() -> @location(0) vec4<f32> {
    return fragment_globals.tint * textureSample(tex, samp, vec2<f32>(0.5));
}
";

#[test]
fn test_context_chains_stages() {
    let vertex = msl(PIPELINE, "vs");
    assert!(vertex.content.contains(
        "[[vertex]] float4 vs(uint index [[vertex_id]], constant Globals& vertex_globals [[buffer(2)]])"
    ));

    let fragment = msl_with(PIPELINE, "fs", &MslOptions::default(), Some(vertex.context)).unwrap();
    assert!(fragment
        .content
        .contains("constant Globals& fragment_globals [[buffer(3)]]"));
    assert!(fragment.content.contains("tex.sample(samp, float2(0.5))"));
    assert_eq!(
        fragment.context,
        CompilerContext {
            last_ubo_binding: 4,
            last_texture_binding: 1,
            last_sampler_binding: 1,
        }
    );
}

#[test]
fn test_base_indices_win_over_lower_context() {
    let options = MslOptions {
        buffer_base_index: 5,
        texture_base_index: 1,
        ..MslOptions::default()
    };
    let context = CompilerContext {
        last_ubo_binding: 3,
        last_texture_binding: 4,
        last_sampler_binding: 0,
    };
    let output = msl_with(PIPELINE, "fs", &options, Some(context)).unwrap();
    assert!(output.content.contains("[[buffer(5)]]"));
    assert!(output.content.contains("[[texture(4)]]"));
    assert_eq!(output.bind_groups[0].entry(1).unwrap().index, 5);
    assert_eq!(output.bind_groups[0].entry(2).unwrap().index, 4);
}

#[test]
fn test_helpers_receive_captured_resources() {
    let source = "
struct U { x: f32 }
@group(0) @binding(0) var<uniform> a: U;
@group(0) @binding(1) var t: texture_2d<f32>;
@group(0) @binding(2) var s: sampler;
fn sample_at(uv: vec2<f32>) -> vec4<f32> { return textureSample(t, s, uv) * a.x; }
fn shade() -> vec4<f32> { return sample_at(vec2<f32>(0.5)); }
@fragment fn fs() -> @location(0) vec4<f32> { return shade(); }
";
    let output = msl(source, "fs");
    let content = &output.content;
    assert!(content
        .contains("float4 sample_at(float2 uv, texture2d<float> t, sampler s, constant U& a)\n"));
    assert!(content.contains("    return t.sample(s, uv) * a.x;\n"));
    assert!(content.contains("float4 shade(texture2d<float> t, sampler s, constant U& a)\n"));
    assert!(content.contains("    return sample_at(float2(0.5), t, s, a);\n"));
    assert!(content.contains(
        "[[fragment]] float4 fs(texture2d<float> t [[texture(0)]], sampler s [[sampler(0)]], constant U& a [[buffer(2)]])\n"
    ));
    assert!(content.contains("    return shade(t, s, a);\n"));
}

#[test]
fn test_interface_attributes() {
    let source = "
struct FragmentOutput {
    @location(0) color: vec4<f32>,
    @location(1) normal: vec4<f32>,
}
@fragment
fn fs(@location(0) @interpolate(flat) id: u32, @builtin(position) coord: vec4<f32>) -> FragmentOutput {
    var out: FragmentOutput;
    out.color = coord;
    out.normal = vec4<f32>(f32(id));
    return out;
}
";
    let output = msl(source, "fs");
    let content = &output.content;
    assert!(content.contains("    float4 color [[color(0)]];\n    float4 normal [[color(1)]];\n"));
    assert!(content.contains("struct fs_in {\n    uint id [[user(locn0), flat]];\n};\n"));
    assert!(content.contains(
        "[[fragment]] FragmentOutput fs(fs_in stage_input [[stage_in]], float4 coord [[position]])\n{\n    uint id = stage_input.id;\n"
    ));
}

#[test]
fn test_expressions_and_aliases() {
    let source = "
alias Pair = array<f32, 2>;
@group(0) @binding(0) var t: texture_2d<f32>;
@fragment
fn fs() -> @location(0) vec4<f32> {
    let pair: Pair = array<f32, 2>(1.0, 2.0);
    let size: vec2<u32> = textureDimensions(t);
    let angle: f32 = atan2(pair[0], pair[1]);
    let m: mat2x3<f32> = mat2x3<f32>();
    if angle > 1.0 {
        discard;
    }
    return vec4<f32>(f32(size.x), angle, 0.0, 1.0);
}
";
    let output = msl(source, "fs");
    let content = &output.content;
    assert!(content.contains("typedef array<float, 2> Pair;\n"));
    assert!(content.contains("    Pair pair = array<float, 2>{1.0, 2.0};\n"));
    assert!(content.contains("uint2 size = uint2(t.get_width(), t.get_height());"));
    assert!(content.contains("float angle = precise::atan2(pair[0], pair[1]);"));
    assert!(content.contains("float2x3 m = float2x3();"));
    assert!(content.contains("        discard_fragment();\n"));
}

#[test]
fn test_reserved_names() {
    let source = "
fn vertex(x: f32) -> f32 { return x; }
@fragment fn fragment() -> @location(0) vec4<f32> { return vec4<f32>(vertex(1.0)); }
";
    let output = msl(source, "fragment");
    assert!(output.content.contains("float vertex_1(float x)\n"));
    assert!(output
        .content
        .contains("[[fragment]] float4 fragment_1()\n{\n    return float4(vertex_1(1.0));\n}\n"));
}

#[test]
fn test_compute_is_rejected() {
    let result = msl_with("@compute fn main() {}", "main", &MslOptions::default(), None);
    assert_eq!(result, Err(CodegenError::ComputeStage("main".to_owned())));
}

#[test]
fn test_private_globals_are_unsupported() {
    let source = "
var<private> counter: u32;
@fragment fn fs() -> @location(0) vec4<f32> { return vec4<f32>(f32(counter)); }
";
    let result = msl_with(source, "fs", &MslOptions::default(), None);
    assert_eq!(
        result,
        Err(CodegenError::UnsupportedAddressSpace {
            name: "counter".to_owned(),
            space: "private".to_owned(),
        })
    );
}

#[test]
fn test_unresolved_binding_fails() {
    let source = "
@group(0) var<uniform> u: vec4<f32>;
@fragment fn fs() -> @location(0) vec4<f32> { return u; }
";
    let result = msl_with(source, "fs", &MslOptions::default(), None);
    assert_eq!(result, Err(CodegenError::MissingBinding("u".to_owned())));
}

#[test]
fn test_nested_unary_keeps_operators_apart() {
    let source = "
@fragment fn fs() -> @location(0) vec4<f32> {
    var b: f32 = 2.0;
    let a: f32 = - -b;
    let c: f32 = - -1.0;
    return vec4<f32>(a, c, -b, 1.0);
}
";
    let content = msl(source, "fs").content;
    assert!(content.contains("    float a = - -b;\n"), "{content}");
    assert!(content.contains("    float c = - -1.0;\n"), "{content}");
    assert!(content.contains("float4(a, c, -b, 1.0)"), "{content}");
    assert!(!content.contains("--"), "{content}");
}

#[test]
fn test_vertex_output_needs_position() {
    let cases = [
        (
            "@vertex fn vs() { }",
            CodegenError::UnattributedVertexOutput("vs".to_owned()),
        ),
        (
            "@vertex fn vs() -> vec4<f32> { return vec4<f32>(1.0); }",
            CodegenError::UnattributedVertexOutput("vs".to_owned()),
        ),
        (
            "@vertex fn vs() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
            CodegenError::MissingPosition("vs".to_owned()),
        ),
        (
            "struct O { @location(0) c: vec4<f32> }\n@vertex fn vs() -> O { var o: O; return o; }",
            CodegenError::MissingPosition("vs".to_owned()),
        ),
    ];
    for (source, expected) in cases {
        let result = msl_with(source, "vs", &MslOptions::default(), None);
        assert_eq!(result, Err(expected), "{source}");
    }
}

#[test]
fn test_arguments_buffer_flag_does_not_change_output() {
    let flat = msl(SHADER, "fs_main");
    let options = MslOptions {
        use_arguments_buffer: true,
        ..MslOptions::default()
    };
    let flagged = msl_with(SHADER, "fs_main", &options, None).unwrap();
    assert_eq!(flagged, flat);
}
