use pretty_assertions::assert_eq;
use proptest::prelude::*;
use wgxc::{BindingType, CompileOutput, CompilerContext, GlslOptions, MslOptions, Program};

use super::{entries, SHARED};
use crate::common::{glsl_ok, msl_ok, parse_ok, PIPELINE};

fn gl42() -> GlslOptions {
    GlslOptions {
        major_version: 4,
        minor_version: 2,
        ..GlslOptions::default()
    }
}

fn slots(output: &CompileOutput, ty: BindingType) -> Vec<u32> {
    entries(output).iter().filter(|e| e.ty == ty).map(|e| e.index).collect()
}

fn chain_glsl(program: &Program, context: Option<CompilerContext>) -> (CompileOutput, CompileOutput) {
    let vertex = glsl_ok(program, "vs", &gl42(), context);
    let fragment = glsl_ok(program, "fs", &gl42(), Some(vertex.context));
    (vertex, fragment)
}

fn chain_msl(program: &Program, context: Option<CompilerContext>) -> (CompileOutput, CompileOutput) {
    let vertex = msl_ok(program, "vs", &MslOptions::default(), context);
    let fragment = msl_ok(program, "fs", &MslOptions::default(), Some(vertex.context));
    (vertex, fragment)
}

fn assert_disjoint(vertex: &CompileOutput, fragment: &CompileOutput, ty: BindingType) {
    let first = slots(vertex, ty);
    for slot in slots(fragment, ty) {
        assert!(!first.contains(&slot), "{ty:?} slot {slot} reused across stages");
    }
}

#[test]
fn test_glsl_chain() {
    let program = parse_ok(SHARED);
    let (vertex, fragment) = chain_glsl(&program, None);
    assert_eq!(slots(&vertex, BindingType::Texture), vec![0]);
    assert_eq!(slots(&vertex, BindingType::UniformBuffer), vec![0]);
    assert_eq!(
        vertex.context,
        CompilerContext {
            last_ubo_binding: 1,
            last_texture_binding: 1,
            last_sampler_binding: 0,
        }
    );
    assert_eq!(slots(&fragment, BindingType::Texture), vec![1]);
    assert_eq!(slots(&fragment, BindingType::UniformBuffer), vec![1]);
    assert!(fragment.content.contains("layout(binding = 1, std140) uniform fragment_paramsblock_ubo {"));

    assert_disjoint(&vertex, &fragment, BindingType::Texture);
    assert_disjoint(&vertex, &fragment, BindingType::UniformBuffer);
}

#[test]
fn test_msl_chain() {
    let program = parse_ok(SHARED);
    let (vertex, fragment) = chain_msl(&program, None);
    assert_eq!(
        vertex.context,
        CompilerContext {
            last_ubo_binding: 3,
            last_texture_binding: 1,
            last_sampler_binding: 1,
        }
    );
    assert_eq!(slots(&fragment, BindingType::Texture), vec![1]);
    assert_eq!(slots(&fragment, BindingType::Sampler), vec![1]);
    assert_eq!(slots(&fragment, BindingType::UniformBuffer), vec![3]);
    assert!(fragment.content.contains("constant Params& fragment_params [[buffer(3)]]"));

    for ty in [BindingType::Texture, BindingType::Sampler, BindingType::UniformBuffer] {
        assert_disjoint(&vertex, &fragment, ty);
    }
}

#[test]
fn test_msl_chain_across_entry_names() {
    let program = parse_ok(PIPELINE);
    let vertex = msl_ok(&program, "vs_main", &MslOptions::default(), None);
    let fragment = msl_ok(&program, "fs_main", &MslOptions::default(), Some(vertex.context));
    let found: Vec<_> = entries(&fragment)
        .iter()
        .map(|e| (e.name.as_str(), e.ty, e.index))
        .collect();
    assert_eq!(
        found,
        vec![
            ("albedo", BindingType::Texture, 0),
            ("albedo_sampler", BindingType::Sampler, 0),
            ("material", BindingType::UniformBuffer, 4),
        ]
    );
    assert_eq!(
        fragment.context,
        CompilerContext {
            last_ubo_binding: 5,
            last_texture_binding: 1,
            last_sampler_binding: 1,
        }
    );
}

proptest! {
    #[test]
    fn prop_msl_stages_never_share_slots(ubo in 0u32..32, texture in 0u32..32, sampler in 0u32..32) {
        let program = parse_ok(SHARED);
        let context = CompilerContext {
            last_ubo_binding: ubo,
            last_texture_binding: texture,
            last_sampler_binding: sampler,
        };
        let (vertex, fragment) = chain_msl(&program, Some(context));
        prop_assert_eq!(slots(&vertex, BindingType::UniformBuffer), vec![ubo.max(2)]);
        prop_assert_eq!(slots(&fragment, BindingType::UniformBuffer), vec![ubo.max(2) + 1]);
        prop_assert_eq!(slots(&fragment, BindingType::Texture), vec![texture + 1]);
        prop_assert_eq!(slots(&fragment, BindingType::Sampler), vec![sampler + 1]);
    }

    #[test]
    fn prop_glsl_stages_never_share_slots(ubo in 0u32..32, texture in 0u32..32) {
        let program = parse_ok(SHARED);
        let context = CompilerContext {
            last_ubo_binding: ubo,
            last_texture_binding: texture,
            last_sampler_binding: 0,
        };
        let (vertex, fragment) = chain_glsl(&program, Some(context));
        prop_assert_eq!(slots(&vertex, BindingType::Texture), vec![texture]);
        prop_assert_eq!(slots(&fragment, BindingType::Texture), vec![texture + 1]);
        prop_assert_eq!(slots(&fragment, BindingType::UniformBuffer), vec![ubo + 1]);
        prop_assert_eq!(fragment.context.last_sampler_binding, 0);
    }
}
