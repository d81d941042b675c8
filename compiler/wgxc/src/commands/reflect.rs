//! `reflect` command: WGSL-numbered bind groups of one or more entry points.

use std::fmt::Write;

use wgx_sema::{BindGroup, BindingType, TypeDefinition, TypeKind};

use crate::merge_bind_groups;

use super::{fail, load_program, CliOptions};

/// Print the merged bind groups of `entries` in `path`.
pub fn reflect_file(path: &str, entries: &[String], options: &CliOptions) {
    let program = load_program(path, options.color);
    let mut groups = Vec::new();
    for entry in entries {
        let stage_groups = program.wgsl_bind_groups(entry).unwrap_or_else(|error| fail(error));
        if let Err(error) = merge_bind_groups(&mut groups, &stage_groups) {
            fail(error);
        }
    }
    print!("{}", format_bind_groups(&groups));
}

/// One block per group, one line per binding, uniform buffers followed by
/// their member offsets.
pub fn format_bind_groups(groups: &[BindGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "group {}", group.group);
        for entry in &group.entries {
            let kind = match entry.ty {
                BindingType::UniformBuffer => "uniform",
                BindingType::Texture => "texture",
                BindingType::Sampler => "sampler",
                BindingType::Undefined => "undefined",
            };
            let stages: Vec<_> = entry
                .stage
                .iter_names()
                .map(|(name, _)| name.to_ascii_lowercase())
                .collect();
            let _ = write!(
                out,
                "  binding {} {kind} {} [{}]",
                entry.binding,
                entry.name,
                stages.join("|")
            );
            if let Some(def) = &entry.type_definition {
                let _ = write!(out, " size {} align {}", def.size(), def.alignment());
                out.push('\n');
                write_members(&mut out, def, 2);
            } else {
                out.push('\n');
            }
        }
    }
    out
}

fn write_members(out: &mut String, def: &TypeDefinition, depth: usize) {
    let TypeKind::Struct { members } = def.kind() else {
        return;
    };
    for member in members {
        let _ = writeln!(
            out,
            "{:indent$}{} {}: offset {} size {}",
            "",
            member.ty.name(),
            member.name,
            member.offset,
            member.ty.size(),
            indent = depth * 2
        );
        write_members(out, &member.ty, depth + 1);
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::Program;

    #[test]
    fn test_format_nested_uniform() {
        let program = Program::parse(
            "
struct Light { color: vec3<f32>, power: f32 }
struct Scene { light: Light, count: u32 }
@group(1) @binding(0) var<uniform> scene: Scene;
@group(1) @binding(1) var samp: sampler;
@fragment fn fs() -> @location(0) vec4<f32> {
    let s: sampler = samp;
    return vec4<f32>(scene.light.color, scene.light.power);
}
",
        );
        let groups = program.wgsl_bind_groups("fs").unwrap();
        assert_eq!(
            format_bind_groups(&groups),
            "group 1
  binding 1 sampler samp [fragment]
  binding 0 uniform scene [fragment] size 32 align 16
    Light light: offset 0 size 16
      vec3<f32> color: offset 0 size 12
      f32 power: offset 12 size 4
    u32 count: offset 16 size 4
"
        );
    }
}
