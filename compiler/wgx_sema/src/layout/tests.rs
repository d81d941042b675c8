use super::*;
use pretty_assertions::assert_eq;
use wgx_ir::StringInterner;

fn parse_ok(source: &str) -> Module {
    let mut interner = StringInterner::new();
    let tokens = wgx_lexer::lex(source, &mut interner);
    match wgx_parse::parse(&tokens, interner) {
        Ok(module) => module,
        Err(error) => panic!("unexpected parse error: {error}"),
    }
}

/// Layout of the type of global `u`.
fn layout_of(source: &str, layout: MemoryLayout) -> Result<TypeDefinition, LayoutError> {
    let module = parse_ok(source);
    let global = module.get_global("u").unwrap();
    TypeDefinition::from_type_ref(&module, &module.var(global).ty, layout)
}

fn offsets(def: &TypeDefinition) -> Vec<(&str, usize)> {
    let TypeKind::Struct { members } = def.kind() else {
        panic!("{} is not a struct", def.name());
    };
    members.iter().map(|m| (m.name.as_str(), m.offset)).collect()
}

const MIXED: &str = "
struct S { a: f32, b: vec3<f32>, c: array<f32, 4> }
@group(0) @binding(0) var<uniform> u: S;
";

#[test]
fn test_std140_struct_offsets() {
    let def = layout_of(MIXED, MemoryLayout::Std140).unwrap();
    assert_eq!(offsets(&def), vec![("a", 0), ("b", 16), ("c", 32)]);
    assert_eq!(def.member("c").unwrap().ty.stride(), Some(16));
    assert_eq!(def.member("c").unwrap().ty.size(), 64);
    assert_eq!(def.alignment(), 16);
    assert_eq!(def.size(), 96);
}

#[test]
fn test_std430_array_is_not_rounded() {
    let def = layout_of(MIXED, MemoryLayout::Std430).unwrap();
    assert_eq!(offsets(&def), vec![("a", 0), ("b", 16), ("c", 28)]);
    assert_eq!(def.member("c").unwrap().ty.stride(), Some(4));
    assert_eq!(def.size(), 48);
}

#[test]
fn test_msl_vec3_takes_four_elements() {
    let def = layout_of(MIXED, MemoryLayout::Std430Msl).unwrap();
    assert_eq!(offsets(&def), vec![("a", 0), ("b", 16), ("c", 32)]);
    assert_eq!(def.member("b").unwrap().ty.size(), 16);
    assert_eq!(def.size(), 48);
}

#[test]
fn test_wgsl_layout_matches_std430_for_scalars() {
    let def = layout_of(MIXED, MemoryLayout::Wgsl).unwrap();
    assert_eq!(def.member("c").unwrap().ty.stride(), Some(4));
}

#[test]
fn test_scalar_and_vector_sizes() {
    let source = "
struct S { a: f16, b: vec2<f32>, c: vec4<u32>, d: vec2<f16>, e: bool }
@group(0) @binding(0) var<uniform> u: S;
";
    let def = layout_of(source, MemoryLayout::Std140).unwrap();
    let sizes: Vec<_> = ["a", "b", "c", "d", "e"]
        .iter()
        .map(|n| {
            let ty = &def.member(n).unwrap().ty;
            (ty.size(), ty.alignment())
        })
        .collect();
    assert_eq!(sizes, vec![(2, 2), (8, 8), (16, 16), (4, 4), (4, 4)]);
    assert_eq!(offsets(&def), vec![("a", 0), ("b", 8), ("c", 16), ("d", 32), ("e", 36)]);
    assert_eq!(def.size(), 48);
}

#[test]
fn test_matrix_shapes() {
    let source = "
struct S { m2: mat2x2<f32>, m3: mat3x3<f32>, m4: mat4x4<f32> }
@group(0) @binding(0) var<uniform> u: S;
";
    let def = layout_of(source, MemoryLayout::Std140).unwrap();
    assert_eq!(offsets(&def), vec![("m2", 0), ("m3", 16), ("m4", 64)]);
    assert_eq!(def.size(), 128);
}

#[test]
fn test_non_square_matrix_is_unsupported() {
    let source = "@group(0) @binding(0) var<uniform> u: mat2x3<f32>;";
    assert_eq!(
        layout_of(source, MemoryLayout::Std140),
        Err(LayoutError::UnsupportedMatrix("mat2x3".to_owned()))
    );
}

#[test]
fn test_align_attribute_overrides_alignment() {
    let source = "
struct S { a: f32, @align(32) b: f32 }
@group(0) @binding(0) var<uniform> u: S;
";
    let def = layout_of(source, MemoryLayout::Std140).unwrap();
    assert_eq!(offsets(&def), vec![("a", 0), ("b", 32)]);
    assert_eq!(def.alignment(), 32);
    assert_eq!(def.size(), 64);
}

#[test]
fn test_nested_struct_and_alias() {
    let source = "
struct Light { color: vec4<f32>, intensity: f32 }
alias Lights = array<Light, 2>;
struct S { count: u32, lights: Lights }
@group(0) @binding(0) var<uniform> u: S;
";
    let def = layout_of(source, MemoryLayout::Std140).unwrap();
    let lights = &def.member("lights").unwrap().ty;
    assert_eq!(lights.name(), "array<Light, 2>");
    assert_eq!(lights.stride(), Some(32));
    assert_eq!(offsets(&def), vec![("count", 0), ("lights", 16)]);
    assert_eq!(def.size(), 80);
}

#[test]
fn test_unknown_type() {
    let source = "@group(0) @binding(0) var<uniform> u: Missing;";
    assert_eq!(
        layout_of(source, MemoryLayout::Std140),
        Err(LayoutError::UnknownType("Missing".to_owned()))
    );
}

#[test]
fn test_malformed_array_count() {
    let source = "@group(0) @binding(0) var<uniform> u: array<f32, n>;";
    assert!(matches!(
        layout_of(source, MemoryLayout::Std140),
        Err(LayoutError::MalformedArray(_))
    ));
}

#[test]
fn test_oversized_arrays_are_rejected() {
    // stride * count overflows usize
    let overflow = "
struct U { x: array<f32, 1152921504606846976> }
@group(0) @binding(0) var<uniform> u: U;
";
    // fits in usize but would stage a node per element
    let huge = "@group(0) @binding(0) var<uniform> u: array<vec4<f32>, 100000000>;";
    for source in [overflow, huge] {
        for layout in [MemoryLayout::Std140, MemoryLayout::Std430Msl, MemoryLayout::Wgsl] {
            assert!(matches!(
                layout_of(source, layout),
                Err(LayoutError::MalformedArray(_))
            ));
        }
    }

    let limit = format!(
        "@group(0) @binding(0) var<uniform> u: array<vec4<f32>, {}>;",
        MAX_BUFFER_SIZE / 16
    );
    assert_eq!(layout_of(&limit, MemoryLayout::Std140).unwrap().size(), MAX_BUFFER_SIZE);
}

#[test]
fn test_oversized_struct_is_rejected() {
    let count = MAX_BUFFER_SIZE / 16;
    let source = format!(
        "
struct U {{ a: array<vec4<f32>, {count}>, b: array<vec4<f32>, {count}>, c: f32 }}
@group(0) @binding(0) var<uniform> u: U;
"
    );
    assert_eq!(
        layout_of(&source, MemoryLayout::Std140),
        Err(LayoutError::TooLarge("U".to_owned()))
    );
}

#[test]
fn test_recursive_alias_is_rejected() {
    let source = "
alias A = B;
alias B = A;
@group(0) @binding(0) var<uniform> u: A;
";
    assert!(matches!(
        layout_of(source, MemoryLayout::Std140),
        Err(LayoutError::RecursiveType(_))
    ));
}

#[test]
fn test_set_data_and_write_to_buffer() {
    let mut def = layout_of(MIXED, MemoryLayout::Std140).unwrap();

    assert!(def.member_mut("a").unwrap().ty.set_data(&1.5f32.to_le_bytes()));
    assert!(!def.member_mut("a").unwrap().ty.set_data(&[0; 8]));

    let c = &mut def.member_mut("c").unwrap().ty;
    assert!(c.element_at_mut(3).unwrap().set_data(&7u32.to_le_bytes()));
    assert!(c.element_at_mut(4).is_none());

    let mut buffer = vec![0u8; 96];
    assert!(def.write_to_buffer(&mut buffer, 0));
    assert_eq!(&buffer[0..4], &1.5f32.to_le_bytes());
    assert_eq!(&buffer[80..84], &7u32.to_le_bytes());

    let mut short = vec![0u8; 95];
    assert!(!def.write_to_buffer(&mut short, 0));
}

#[test]
fn test_struct_set_data_splits_by_offset() {
    let mut def = layout_of(MIXED, MemoryLayout::Std140).unwrap();
    let mut bytes = vec![0u8; 96];
    bytes[16..20].copy_from_slice(&2.0f32.to_le_bytes());
    bytes[48..52].copy_from_slice(&3.0f32.to_le_bytes());
    assert!(def.set_data(&bytes));
    assert_eq!(&def.member("b").unwrap().ty.data().unwrap()[0..4], &2.0f32.to_le_bytes());
    assert_eq!(
        def.member("c").unwrap().ty.element_at(1).unwrap().data().unwrap(),
        &3.0f32.to_le_bytes()
    );
    assert!(!def.set_data(&bytes[..64]));
}

#[test]
fn test_msl_vec3_accepts_packed_data() {
    let mut def = layout_of(MIXED, MemoryLayout::Std430Msl).unwrap();
    let b = &mut def.member_mut("b").unwrap().ty;
    assert!(b.set_data(&[1; 12]));
    assert!(b.set_data(&[1; 16]));
    assert!(!b.set_data(&[1; 8]));
}

mod proptest_layout {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn round_up_is_smallest_multiple(k in 1usize..64, n in 0usize..4096) {
            let r = round_up(k, n);
            prop_assert!(r >= n);
            prop_assert_eq!(r % k, 0);
            prop_assert!(r - n < k);
        }

        #[test]
        fn std140_f32_array_stride_is_16(count in 1usize..32) {
            let source = format!("@group(0) @binding(0) var<uniform> u: array<f32, {count}>;");
            let def = layout_of(&source, MemoryLayout::Std140).unwrap();
            prop_assert_eq!(def.stride(), Some(16));
            prop_assert_eq!(def.size(), 16 * count);
        }

        #[test]
        fn struct_members_are_aligned(picks in proptest::collection::vec(0usize..5, 1..8)) {
            const TYPES: [&str; 5] = ["f32", "vec2<f32>", "vec3<f32>", "vec4<f32>", "mat4x4<f32>"];
            let members: Vec<String> = picks
                .iter()
                .enumerate()
                .map(|(i, &t)| format!("m{i}: {}", TYPES[t]))
                .collect();
            let source = format!(
                "struct S {{ {} }}\n@group(0) @binding(0) var<uniform> u: S;",
                members.join(", ")
            );
            for layout in [MemoryLayout::Std140, MemoryLayout::Std430Msl] {
                let def = layout_of(&source, layout).unwrap();
                let TypeKind::Struct { members } = def.kind() else {
                    panic!("not a struct");
                };
                let mut end = 0;
                for member in members {
                    prop_assert_eq!(member.offset % member.ty.alignment(), 0);
                    prop_assert!(member.offset >= end);
                    end = member.offset + member.ty.size();
                }
                prop_assert!(def.size() >= end);
                prop_assert_eq!(def.size() % def.alignment(), 0);
            }
        }
    }
}
