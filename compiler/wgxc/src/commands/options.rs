//! Command-line option parsing shared by the compile commands.

use wgx_codegen::CompilerContext;
use wgx_diagnostic::emitter::ColorMode;

/// Positional arguments plus every recognized flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub positional: Vec<String>,
    /// `--es`: target GLSL ES instead of desktop GLSL.
    pub es: bool,
    /// `--version M.m`: GLSL version.
    pub version: Option<(u32, u32)>,
    /// `--msl-version M.m`.
    pub msl_version: Option<(u32, u32)>,
    /// `--context u,t,s`: first free ubo/buffer, texture and sampler slots.
    pub context: Option<CompilerContext>,
    pub color: ColorMode,
}

/// Split `args` (everything after the command name) into flags and
/// positional arguments.
///
/// Flags taking a value accept both `--flag value` and `--flag=value`.
pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if !arg.starts_with("--") {
            options.positional.push(arg.clone());
            continue;
        }

        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) => (flag, Some(value.to_owned())),
            None => (arg.as_str(), None),
        };
        if flag == "--es" {
            options.es = true;
            continue;
        }

        let Some(value) = inline.or_else(|| iter.next().cloned()) else {
            return Err(format!("missing value for '{flag}'"));
        };
        match flag {
            "--version" => {
                options.version =
                    Some(parse_version(&value).ok_or_else(|| format!("invalid version '{value}'"))?);
            }
            "--msl-version" => {
                options.msl_version =
                    Some(parse_version(&value).ok_or_else(|| format!("invalid MSL version '{value}'"))?);
            }
            "--context" => {
                options.context =
                    Some(parse_context(&value).ok_or_else(|| format!("invalid context '{value}'"))?);
            }
            "--color" => {
                options.color =
                    ColorMode::parse(&value).ok_or_else(|| format!("invalid color mode '{value}'"))?;
            }
            _ => return Err(format!("unknown option '{flag}'")),
        }
    }

    Ok(options)
}

/// `"4.2"` to `(4, 2)`.
pub fn parse_version(text: &str) -> Option<(u32, u32)> {
    let (major, minor) = text.split_once('.')?;
    Some((major.parse().ok()?, minor.parse().ok()?))
}

/// `"2,1,0"` to a context with those ubo, texture and sampler slots.
fn parse_context(text: &str) -> Option<CompilerContext> {
    let mut parts = text.split(',').map(|part| part.trim().parse::<u32>());
    let context = CompilerContext {
        last_ubo_binding: parts.next()?.ok()?,
        last_texture_binding: parts.next()?.ok()?,
        last_sampler_binding: parts.next()?.ok()?,
    };
    parts.next().is_none().then_some(context)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn test_positional_and_flags() {
        let options = parse_options(&args(&[
            "shader.wgsl",
            "--es",
            "vs_main",
            "--version",
            "3.1",
            "--context=2,1,0",
            "--color=never",
        ]))
        .unwrap();

        assert_eq!(options.positional, vec!["shader.wgsl", "vs_main"]);
        assert!(options.es);
        assert_eq!(options.version, Some((3, 1)));
        assert_eq!(
            options.context,
            Some(CompilerContext {
                last_ubo_binding: 2,
                last_texture_binding: 1,
                last_sampler_binding: 0,
            })
        );
        assert_eq!(options.color, ColorMode::Never);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_options(&args(&["--version"])),
            Err("missing value for '--version'".to_owned())
        );
        assert_eq!(
            parse_options(&args(&["--msl-version", "two"])),
            Err("invalid MSL version 'two'".to_owned())
        );
        assert_eq!(
            parse_options(&args(&["--context", "1,2"])),
            Err("invalid context '1,2'".to_owned())
        );
        assert_eq!(
            parse_options(&args(&["--fast", "yes"])),
            Err("unknown option '--fast'".to_owned())
        );
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("4.20"), Some((4, 20)));
        assert_eq!(parse_version("4"), None);
        assert_eq!(parse_version("a.b"), None);
    }

    #[test]
    fn test_parse_context_rejects_extra_parts() {
        assert_eq!(parse_context("1,2,3,4"), None);
        assert_eq!(parse_context(" 1, 2 ,3").map(|c| c.last_sampler_binding), Some(3));
    }
}
