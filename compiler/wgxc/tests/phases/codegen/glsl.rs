use pretty_assertions::assert_eq;
use wgx_codegen::CodegenError;
use wgxc::{BindingType, CompileError, CompileOutput, CompilerContext, GlslOptions};

use super::{entries, SHARED};
use crate::common::{glsl_ok, parse_ok, PIPELINE};

fn gl42() -> GlslOptions {
    GlslOptions {
        major_version: 4,
        minor_version: 2,
        ..GlslOptions::default()
    }
}

/// Every reflected uniform buffer and texture is declared with its slot,
/// every declared resource is reflected, and sampler units point at
/// reflected textures.
fn assert_slots_match(output: &CompileOutput) {
    let content = &output.content;
    let all = entries(output);
    let textures: Vec<u32> = all
        .iter()
        .filter(|e| e.ty == BindingType::Texture)
        .map(|e| e.index)
        .collect();

    let mut declared = 0;
    for entry in &all {
        match entry.ty {
            BindingType::UniformBuffer => {
                let line = format!("layout(binding = {}, std140) uniform {} {{", entry.index, entry.name);
                assert!(content.contains(&line), "missing `{line}` in\n{content}");
                declared += 1;
            }
            BindingType::Texture => {
                let line = format!("uniform sampler2D {};", entry.name);
                assert!(content.contains(&line), "missing `{line}` in\n{content}");
                declared += 1;
            }
            BindingType::Sampler => {
                let units = entry.units.clone().unwrap_or_default();
                assert!(!units.is_empty(), "sampler `{}` has no units", entry.name);
                assert!(units.iter().all(|unit| textures.contains(unit)));
            }
            BindingType::Undefined => panic!("undefined binding `{}`", entry.name),
        }
    }
    let uniform_lines = content.lines().filter(|line| line.contains("uniform ")).count();
    assert_eq!(uniform_lines, declared, "{content}");
}

#[test]
fn test_reflection_matches_text() {
    let program = parse_ok(PIPELINE);
    for entry in ["vs_main", "fs_main"] {
        assert_slots_match(&glsl_ok(&program, entry, &gl42(), None));
    }
    assert_slots_match(&glsl_ok(&parse_ok(SHARED), "vs", &gl42(), None));
}

#[test]
fn test_helper_reads_uniform_directly() {
    let program = parse_ok(PIPELINE);
    let output = glsl_ok(&program, "vs_main", &gl42(), None);
    assert!(output.content.contains("vec4 world(vec3 p)\n{\n    return model.inner.transform * vec4(p, 1.0);\n}\n"));
    assert!(output.content.contains("layout(location = 0) in vec3 in_position;"));
    assert!(output.content.contains("layout(location = 0) out vec2 vs_out_uv;"));
    assert!(!output.content.contains("unused"));

    let names: Vec<_> = entries(&output).iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["camerablock_ubo", "modelblock_ubo"]);
}

#[test]
fn test_es_fragment_header() {
    let program = parse_ok(PIPELINE);
    let output = glsl_ok(&program, "fs_main", &GlslOptions::es(3, 0), None);
    assert!(output.content.starts_with(
        "#version 300 es\n\nprecision highp float;\nprecision highp int;\n\nin vec2 vs_out_uv;\nlayout(location = 0) out vec4 fragColor;\n"
    ));
    assert!(output.content.contains("layout(std140) uniform materialblock_ubo {"));
    assert!(output.content.contains("vec4 color = texture(albedo, in_1.uv);"));
}

#[test]
fn test_compute_is_rejected() {
    let program = parse_ok(PIPELINE);
    assert_eq!(
        program.write_to_glsl("cs_main", &gl42(), None),
        Err(CompileError::Codegen(CodegenError::ComputeStage("cs_main".to_owned())))
    );
}

#[test]
fn test_context_offsets_slots() {
    let program = parse_ok(SHARED);
    let context = CompilerContext {
        last_ubo_binding: 4,
        last_texture_binding: 7,
        last_sampler_binding: 9,
    };
    let output = glsl_ok(&program, "fs", &gl42(), Some(context));
    let slots: Vec<_> = entries(&output).iter().map(|e| (e.ty, e.index)).collect();
    assert_eq!(
        slots,
        vec![
            (BindingType::Texture, 7),
            (BindingType::Sampler, 0),
            (BindingType::UniformBuffer, 4),
        ]
    );
    assert_eq!(
        output.context,
        CompilerContext {
            last_ubo_binding: 5,
            last_texture_binding: 8,
            last_sampler_binding: 9,
        }
    );
}
