//! Debug commands: `tokens` and `parse` for inspecting compiler internals.

use std::fmt::Write;

use wgx_ir::{StringInterner, TokenKind, TokenList, TypeDeclKind, VarKind};

use super::{load_program, read_file, CliOptions};

/// Scan a file and display the token stream.
pub fn tokens_file(path: &str) {
    let source = read_file(path);
    let mut interner = StringInterner::new();
    let tokens = wgx_lexer::lex(&source, &mut interner);
    println!("Tokens for '{path}' ({} tokens):", tokens.len());
    print!("{}", format_tokens(&tokens, &source));
}

/// One line per token: location, kind, and source text for tokens that
/// carry any.
pub fn format_tokens(tokens: &TokenList, source: &str) -> String {
    let mut out = String::new();
    for token in tokens {
        let _ = write!(out, "  {}:{} {}", token.line, token.column, token.kind);
        let text = token.text(source);
        if !text.is_empty() && !matches!(token.kind, TokenKind::Int(..) | TokenKind::Float(..)) {
            let _ = write!(out, " `{text}`");
        }
        out.push('\n');
    }
    out
}

/// Parse a file and display its declarations and entry points.
pub fn parse_file(path: &str, options: &CliOptions) {
    let program = load_program(path, options.color);
    let Some(module) = program.module() else {
        return;
    };
    let arena = module.arena();

    println!("Parse result for '{path}':");
    println!("  Types: {}", module.type_decls().len());
    println!("  Globals: {}", module.globals().len());
    println!("  Functions: {}", module.functions().len());

    if !module.type_decls().is_empty() {
        println!();
        println!("Types:");
        for &id in module.type_decls() {
            let decl = module.type_decl(id);
            let name = module.name(decl.name);
            match decl.kind {
                TypeDeclKind::Struct(members) => {
                    println!("  struct {name} ({} members)", arena.members(members).len());
                }
                TypeDeclKind::Alias(target) => {
                    println!("  alias {name} = {}", module.name(target.name));
                }
            }
        }
    }

    if !module.globals().is_empty() {
        println!();
        println!("Globals:");
        for &id in module.globals() {
            let var = module.var(id);
            let keyword = match var.kind {
                VarKind::Var { .. } => "var",
                VarKind::Const => "const",
                VarKind::Let | VarKind::Param => "let",
            };
            println!("  {keyword} {}: {}", module.name(var.name), module.name(var.ty.name));
        }
    }

    if !module.functions().is_empty() {
        println!();
        println!("Functions:");
        for &id in module.functions() {
            let func = module.function(id);
            let params: Vec<_> = arena
                .var_list(func.params)
                .iter()
                .map(|&param| module.name(module.var(param).name))
                .collect();
            let stage = module
                .stage(id)
                .map(|stage| format!(" [{stage:?}]"))
                .unwrap_or_default();
            println!("  fn {}({}){stage}", module.name(func.name), params.join(", "));
        }
    }
}
