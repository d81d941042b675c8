//! Command handlers for the `wgxc` CLI.
//!
//! Each submodule implements one command. Shared utilities (`read_file`,
//! option parsing, parse-error reporting) live here in the module root.
//! Handlers print to stdout and exit the process with status 1 on failure.

mod compile;
mod debug;
mod options;
mod reflect;

use std::io::IsTerminal;

use wgx_diagnostic::emitter::{ColorMode, TerminalEmitter};

use crate::Program;

pub use compile::{compile_glsl, compile_msl};
pub use debug::{format_tokens, parse_file, tokens_file};
pub use options::{parse_options, parse_version, CliOptions};
pub use reflect::{format_bind_groups, reflect_file};

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Read and parse `path`, rendering the parse error and exiting if it fails.
pub(crate) fn load_program(path: &str, color: ColorMode) -> Program {
    let source = read_file(path);
    let program = Program::parse(&source);
    if let Some(diagnosis) = program.diagnosis() {
        let mut emitter = TerminalEmitter::<std::io::Stderr>::stderr(color, std::io::stderr().is_terminal());
        emitter.emit(diagnosis, path, &source);
        std::process::exit(1);
    }
    program
}

/// Print a compile failure and exit.
pub(crate) fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}
