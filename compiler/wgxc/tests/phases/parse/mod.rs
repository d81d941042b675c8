//! Scanner and parser, driven through `Program::parse`.

use pretty_assertions::assert_eq;
use wgx_ir::{BinaryOp, ExprKind, Module, StmtKind, StringInterner};

use crate::common::{parse_err, parse_ok, PIPELINE};

/// Statement kinds of the body of function `name`.
fn body(module: &Module, name: &str) -> Vec<StmtKind> {
    let func = module.function(module.get_function(name).unwrap());
    let StmtKind::Block(range) = module.arena().stmt(func.body).kind else {
        panic!("body of `{name}` is not a block");
    };
    module
        .arena()
        .stmt_list(range)
        .iter()
        .map(|&id| module.arena().stmt(id).kind)
        .collect()
}

/// Operator of the initializer of local declaration `stmt`.
fn init_op(module: &Module, stmt: StmtKind) -> BinaryOp {
    let StmtKind::VarDecl(var) = stmt else {
        panic!("not a declaration: {stmt:?}");
    };
    let init = module.var(var).init.unwrap();
    match module.arena().expr(init).kind {
        ExprKind::Binary { op, .. } => op,
        other => panic!("initializer is not binary: {other:?}"),
    }
}

#[test]
fn test_parse_is_deterministic() {
    let first = parse_ok(PIPELINE);
    let second = parse_ok(PIPELINE);
    assert_eq!(
        format!("{:?}", first.module().unwrap().arena()),
        format!("{:?}", second.module().unwrap().arena())
    );

    let mut a = StringInterner::new();
    let mut b = StringInterner::new();
    assert_eq!(wgx_lexer::lex(PIPELINE, &mut a), wgx_lexer::lex(PIPELINE, &mut b));
}

#[test]
fn test_generic_call_statement() {
    let program = parse_ok("fn f() { a<b, c>(d); }");
    let module = program.module().unwrap();
    let stmts = body(module, "f");
    assert_eq!(stmts.len(), 1);

    let StmtKind::Call { callee, args } = stmts[0] else {
        panic!("expected a call statement, got {:?}", stmts[0]);
    };
    assert_eq!(module.name(callee.name), "a");
    let template: Vec<_> = module
        .arena()
        .expr_list(callee.args)
        .iter()
        .map(|&id| match module.arena().expr(id).kind {
            ExprKind::Ident(ident) => module.name(ident.name),
            other => panic!("template argument is not an identifier: {other:?}"),
        })
        .collect();
    assert_eq!(template, vec!["b", "c"]);
    assert_eq!(module.arena().expr_list(args).len(), 1);
}

#[test]
fn test_comparisons_are_not_template_lists() {
    let program = parse_ok("fn f() { let p: bool = x < y; let q: bool = z > w; }");
    let module = program.module().unwrap();
    let stmts = body(module, "f");
    assert_eq!(stmts.len(), 2);
    assert_eq!(init_op(module, stmts[0]), BinaryOp::LessThan);
    assert_eq!(init_op(module, stmts[1]), BinaryOp::GreaterThan);
}

#[test]
fn test_nested_template_closers_split() {
    let program = parse_ok("fn f() { let a: array<vec2<f32>> = g(); let s: i32 = x >> 1; }");
    let module = program.module().unwrap();
    let stmts = body(module, "f");
    assert_eq!(init_op(module, stmts[1]), BinaryOp::ShiftRight);
}

#[test]
fn test_first_error_is_reported() {
    let diagnosis = parse_err("struct S { a: f32 }\nfn f() {\n    let x: f32 = 1.0\n}\nfn g( {}");
    assert_eq!(diagnosis.message, "Expected ';' after statement");
    assert_eq!((diagnosis.line, diagnosis.column), (4, 1));
}

#[test]
fn test_scan_error_becomes_diagnosis() {
    let diagnosis = parse_err("fn f() {}\n/* never closed");
    assert_eq!(diagnosis.message, "unterminated block comment");
    assert_eq!(diagnosis.line, 2);
}

#[test]
fn test_mixed_bitwise_needs_parentheses() {
    parse_ok("fn f() { let a: u32 = x & y & z; let b: u32 = (x & y) | z; }");
    parse_err("fn f() { let a: u32 = x & y | z; }");
}
