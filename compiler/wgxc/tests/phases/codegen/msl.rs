use pretty_assertions::assert_eq;
use wgx_codegen::CodegenError;
use wgxc::{BindingType, CompileError, CompileOutput, CompilerContext, MslOptions};

use super::{entries, SHARED};
use crate::common::{msl_ok, parse_ok, PIPELINE};

/// Every reflected resource appears as an entry parameter with its slot,
/// and no parameter carries a slot that was not reflected.
fn assert_slots_match(output: &CompileOutput) {
    let content = &output.content;
    let all = entries(output);
    for entry in &all {
        let kind = match entry.ty {
            BindingType::UniformBuffer => "buffer",
            BindingType::Texture => "texture",
            BindingType::Sampler => "sampler",
            BindingType::Undefined => panic!("undefined binding `{}`", entry.name),
        };
        let param = format!("{} [[{kind}({})]]", entry.name, entry.index);
        assert!(content.contains(&param), "missing `{param}` in\n{content}");
    }
    let slots = ["[[buffer(", "[[texture(", "[[sampler("]
        .iter()
        .map(|marker| content.matches(marker).count())
        .sum::<usize>();
    assert_eq!(slots, all.len(), "{content}");
}

#[test]
fn test_reflection_matches_text() {
    let program = parse_ok(PIPELINE);
    for entry in ["vs_main", "fs_main"] {
        assert_slots_match(&msl_ok(&program, entry, &MslOptions::default(), None));
    }
    let shared = parse_ok(SHARED);
    for entry in ["vs", "fs"] {
        assert_slots_match(&msl_ok(&shared, entry, &MslOptions::default(), None));
    }
}

#[test]
fn test_helper_receives_captured_uniform() {
    let program = parse_ok(PIPELINE);
    let output = msl_ok(&program, "vs_main", &MslOptions::default(), None);
    let content = &output.content;
    assert!(content.contains("float4 world(float3 p, constant Model& model)\n"));
    assert!(content.contains("out.position = camera.view_proj * world(position, model);"));
    assert!(content.contains("    float3 position [[attribute(0)]];\n    float2 uv [[attribute(1)]];\n"));
    assert!(!content.contains("unused"));
    assert!(!content.contains("never_called"));

    let slots: Vec<_> = entries(&output).iter().map(|e| (e.name.as_str(), e.index)).collect();
    assert_eq!(slots, vec![("camera", 2), ("model", 3)]);
    assert_eq!(
        output.context,
        CompilerContext {
            last_ubo_binding: 4,
            last_texture_binding: 0,
            last_sampler_binding: 0,
        }
    );
}

#[test]
fn test_fragment_samples_through_method() {
    let program = parse_ok(PIPELINE);
    let output = msl_ok(&program, "fs_main", &MslOptions::default(), None);
    assert!(output.content.contains("[[fragment]] float4 fs_main(VertexOutput in [[stage_in]]"));
    assert!(output.content.contains("float4 color = albedo.sample(albedo_sampler, in.uv);"));
}

#[test]
fn test_compute_is_rejected() {
    let program = parse_ok(PIPELINE);
    assert_eq!(
        program.write_to_msl("cs_main", &MslOptions::default(), None),
        Err(CompileError::Codegen(CodegenError::ComputeStage("cs_main".to_owned())))
    );
}

#[test]
fn test_context_above_base_is_kept() {
    let program = parse_ok(SHARED);
    let context = CompilerContext {
        last_ubo_binding: 6,
        last_texture_binding: 3,
        last_sampler_binding: 2,
    };
    let output = msl_ok(&program, "fs", &MslOptions::default(), Some(context));
    let slots: Vec<_> = entries(&output).iter().map(|e| (e.ty, e.index)).collect();
    assert_eq!(
        slots,
        vec![
            (BindingType::Texture, 3),
            (BindingType::Sampler, 2),
            (BindingType::UniformBuffer, 6),
        ]
    );
    assert_eq!(
        output.context,
        CompilerContext {
            last_ubo_binding: 7,
            last_texture_binding: 4,
            last_sampler_binding: 3,
        }
    );
}
