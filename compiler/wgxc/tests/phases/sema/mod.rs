//! Closure, reflection and buffer layout as seen from compile results.

use pretty_assertions::assert_eq;
use rustc_hash::FxHashSet;
use wgx_ir::Module;
use wgx_sema::{EntryPoint, MemoryLayout, TypeDefinition, TypeKind};
use wgxc::{BindingType, GlslOptions, MslOptions};

use crate::common::{glsl_ok, msl_ok, parse_ok, PIPELINE};

fn closure<'m>(module: &'m Module, entry: &str) -> EntryPoint<'m> {
    EntryPoint::new(module, module.get_function(entry).unwrap(), MemoryLayout::Std140).unwrap()
}

fn offsets(def: &TypeDefinition) -> Vec<(&str, usize)> {
    let TypeKind::Struct { members } = def.kind() else {
        panic!("{} is not a struct", def.name());
    };
    members.iter().map(|m| (m.name.as_str(), m.offset)).collect()
}

#[test]
fn test_closures_are_exact_and_duplicate_free() {
    let program = parse_ok(PIPELINE);
    let module = program.module().unwrap();

    let names = |entry: &EntryPoint<'_>| {
        let types: Vec<_> =
            entry.type_decls().iter().map(|&id| module.name(module.type_decl(id).name)).collect();
        let globals: Vec<_> = entry.globals().iter().map(|&id| module.name(module.var(id).name)).collect();
        let functions: Vec<_> =
            entry.functions().iter().map(|&id| module.name(module.function(id).name)).collect();
        (types, globals, functions)
    };

    let vertex = closure(module, "vs_main");
    assert_eq!(
        names(&vertex),
        (
            vec!["VertexOutput", "Camera", "Model"],
            vec!["camera", "model"],
            vec!["world"]
        )
    );

    let fragment = closure(module, "fs_main");
    assert_eq!(
        names(&fragment),
        (
            vec!["VertexOutput", "Material"],
            vec!["albedo", "albedo_sampler", "material"],
            vec![]
        )
    );

    for entry in [&vertex, &fragment] {
        let declared: FxHashSet<_> = module.globals().iter().collect();
        let unique: FxHashSet<_> = entry.globals().iter().collect();
        assert_eq!(unique.len(), entry.globals().len());
        assert!(unique.is_subset(&declared));
    }
}

#[test]
fn test_std140_layout_of_compiled_uniform() {
    let source = "
struct S { a: f32, b: vec3<f32>, c: array<f32, 4> }
@group(0) @binding(0) var<uniform> u: S;
@fragment fn fs() -> @location(0) vec4<f32> {
    return vec4<f32>(u.b, u.a + u.c[3]);
}
";
    let program = parse_ok(source);
    let output = glsl_ok(&program, "fs", &GlslOptions::default(), None);
    let entry = output.bind_groups[0].entry(0).unwrap();
    assert_eq!(entry.ty, BindingType::UniformBuffer);

    let def = entry.type_definition.as_ref().unwrap();
    assert_eq!(offsets(def), vec![("a", 0), ("b", 16), ("c", 32)]);
    assert_eq!(def.member("c").unwrap().ty.stride(), Some(16));
    assert_eq!(def.size(), 96);

    let output = msl_ok(&program, "fs", &MslOptions::default(), None);
    let def = output.bind_groups[0].entry(0).unwrap().type_definition.clone().unwrap();
    assert_eq!(offsets(&def), vec![("a", 0), ("b", 16), ("c", 32)]);
    assert_eq!(def.member("b").unwrap().ty.size(), 16);
    assert_eq!(def.size(), 48);
}

#[test]
fn test_staged_data_lands_at_gpu_offsets() {
    let program = parse_ok(PIPELINE);
    let output = glsl_ok(&program, "fs_main", &GlslOptions::default(), None);
    let mut def = output
        .bind_groups
        .iter()
        .flat_map(|group| &group.entries)
        .find(|entry| entry.ty == BindingType::UniformBuffer)
        .and_then(|entry| entry.type_definition.as_deref().cloned())
        .unwrap();
    assert_eq!(def.name(), "Material");

    let roughness = &mut def.member_mut("roughness").unwrap().ty;
    assert!(roughness.set_data(&0.5f32.to_le_bytes()));

    let mut buffer = vec![0u8; def.size()];
    assert!(def.write_to_buffer(&mut buffer, 0));
    assert_eq!(&buffer[16..20], &0.5f32.to_le_bytes());
    assert_eq!(buffer.len(), 32);
}
