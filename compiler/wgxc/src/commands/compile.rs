//! `glsl` and `msl` commands: compile one entry point to stdout.

use wgx_codegen::{CompileOutput, CompilerContext, GlslOptions, MslOptions};

use super::{fail, load_program, CliOptions};

/// Compile `entry` of `path` to GLSL and print the source.
pub fn compile_glsl(path: &str, entry: &str, options: &CliOptions) {
    let program = load_program(path, options.color);
    match program.write_to_glsl(entry, &glsl_options(options), options.context) {
        Ok(output) => print_output(&output),
        Err(error) => fail(error),
    }
}

/// Compile `entry` of `path` to MSL and print the source.
pub fn compile_msl(path: &str, entry: &str, options: &CliOptions) {
    let program = load_program(path, options.color);
    match program.write_to_msl(entry, &msl_options(options), options.context) {
        Ok(output) => print_output(&output),
        Err(error) => fail(error),
    }
}

/// `--es` alone selects GLSL ES 3.0; `--version` overrides either default.
fn glsl_options(options: &CliOptions) -> GlslOptions {
    let mut glsl = if options.es {
        GlslOptions::es(3, 0)
    } else {
        GlslOptions::default()
    };
    if let Some((major, minor)) = options.version {
        glsl.major_version = major;
        glsl.minor_version = minor;
    }
    glsl
}

fn msl_options(options: &CliOptions) -> MslOptions {
    let mut msl = MslOptions::default();
    if let Some((major, minor)) = options.msl_version {
        msl.msl_version_major = major;
        msl.msl_version_minor = minor;
    }
    msl
}

/// Source on stdout; the next free slots on stderr, ready for `--context`.
fn print_output(output: &CompileOutput) {
    print!("{}", output.content);
    let CompilerContext {
        last_ubo_binding,
        last_texture_binding,
        last_sampler_binding,
    } = output.context;
    eprintln!("context: {last_ubo_binding},{last_texture_binding},{last_sampler_binding}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgx_codegen::GlslStandard;

    #[test]
    fn test_glsl_defaults() {
        let options = CliOptions {
            es: true,
            ..CliOptions::default()
        };
        let glsl = glsl_options(&options);
        assert_eq!(glsl.standard, GlslStandard::Es);
        assert_eq!((glsl.major_version, glsl.minor_version), (3, 0));

        let options = CliOptions {
            version: Some((4, 5)),
            ..CliOptions::default()
        };
        let glsl = glsl_options(&options);
        assert_eq!(glsl.standard, GlslStandard::Desktop);
        assert_eq!((glsl.major_version, glsl.minor_version), (4, 5));
    }

    #[test]
    fn test_msl_version_keeps_base_indices() {
        let options = CliOptions {
            msl_version: Some((2, 1)),
            ..CliOptions::default()
        };
        let msl = msl_options(&options);
        assert_eq!((msl.msl_version_major, msl.msl_version_minor), (2, 1));
        assert_eq!(msl.buffer_base_index, MslOptions::default().buffer_base_index);
    }
}
