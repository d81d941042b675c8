//! wgx shader compiler CLI.

use wgxc::commands::{
    compile_glsl, compile_msl, parse_file, parse_options, reflect_file, tokens_file, CliOptions,
};

fn main() {
    wgxc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = args[1].as_str();
    let options = match parse_options(&args[2..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    };

    match command {
        "glsl" => {
            let (path, entry) = file_and_entry(&options, "glsl");
            compile_glsl(path, entry, &options);
        }
        "msl" => {
            let (path, entry) = file_and_entry(&options, "msl");
            compile_msl(path, entry, &options);
        }
        "reflect" => {
            if options.positional.len() < 2 {
                eprintln!("Usage: wgxc reflect <file.wgsl> <entry> [<entry>...]");
                std::process::exit(1);
            }
            reflect_file(&options.positional[0], &options.positional[1..], &options);
        }
        "tokens" => {
            let Some(path) = options.positional.first() else {
                eprintln!("Usage: wgxc tokens <file.wgsl>");
                std::process::exit(1);
            };
            tokens_file(path);
        }
        "parse" => {
            let Some(path) = options.positional.first() else {
                eprintln!("Usage: wgxc parse <file.wgsl>");
                std::process::exit(1);
            };
            parse_file(path, &options);
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("wgxc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn file_and_entry<'a>(options: &'a CliOptions, command: &str) -> (&'a str, &'a str) {
    match options.positional.as_slice() {
        [path, entry] => (path.as_str(), entry.as_str()),
        _ => {
            eprintln!("Usage: wgxc {command} <file.wgsl> <entry> [options]");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("wgx shader compiler");
    println!();
    println!("Usage: wgxc <command> [options]");
    println!();
    println!("Commands:");
    println!("  glsl <file> <entry>          Compile an entry point to GLSL");
    println!("  msl <file> <entry>           Compile an entry point to MSL");
    println!("  reflect <file> <entry>...    Show bind groups, merged across entries");
    println!("  tokens <file>                Scan and display tokens");
    println!("  parse <file>                 Parse and display declarations");
    println!("  help                         Show this help message");
    println!("  version                      Show version information");
    println!();
    println!("Options:");
    println!("  --es                 Target GLSL ES (default version 3.0)");
    println!("  --version <M.m>      GLSL version (default 3.3)");
    println!("  --msl-version <M.m>  MSL version (default 2.3)");
    println!("  --context <u,t,s>    First free ubo/buffer, texture and sampler slots");
    println!("  --color <mode>       Diagnostic color: auto, always, never");
    println!();
    println!("Environment:");
    println!("  RUST_LOG             Enable compiler tracing, e.g. RUST_LOG=wgx_codegen=debug");
    println!();
    println!("Examples:");
    println!("  wgxc glsl shader.wgsl vs_main --version 4.2");
    println!("  wgxc glsl shader.wgsl fs_main --version 4.2 --context 1,0,0");
    println!("  wgxc msl shader.wgsl vs_main --msl-version 2.1");
    println!("  wgxc reflect shader.wgsl vs_main fs_main");
}
