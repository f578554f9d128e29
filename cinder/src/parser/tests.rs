//! Parser tests for the Cinder grammar

use crate::ast::{BinOp, Expr, Program, Spanned, Stmt};
use crate::lexer::tokenize;
use crate::parser::{parse, parse_json};

fn parse_program(source: &str) -> crate::Result<Program> {
    let tokens = tokenize(source)?;
    parse("test.cn", source, tokens)
}

fn parse_ok(source: &str) -> Program {
    parse_program(source).expect("Parse should succeed")
}

fn parse_fails(source: &str) -> bool {
    parse_program(source).is_err()
}

/// Parse `x = <expr>;` and return the expression
fn parse_expr(expr: &str) -> Spanned<Expr> {
    let mut prog = parse_ok(&format!("x = {expr};"));
    match std::mem::take(&mut prog.stmts).into_iter().next().map(|s| s.node) {
        Some(Stmt::Assign { value, .. }) => value,
        other => panic!("expected assignment, got {other:?}"),
    }
}

// ============================================
// Statements
// ============================================

#[test]
fn test_parse_empty_program() {
    assert!(parse_ok("").is_empty());
}

#[test]
fn test_parse_assignment() {
    let prog = parse_ok("count = 42;");
    assert_eq!(prog.stmts.len(), 1);
    match &prog.stmts[0].node {
        Stmt::Assign { name, value } => {
            assert_eq!(name, "count");
            assert_eq!(value.node, Expr::Number(42));
        }
        other => panic!("expected Assign, got {other:?}"),
    }
}

#[test]
fn test_parse_index_assignment() {
    let prog = parse_ok("xs[1] = \"b\";");
    match &prog.stmts[0].node {
        Stmt::IndexAssign { target, value } => {
            assert_eq!(target.name, "xs");
            assert_eq!(target.index.node, Expr::Number(1));
            assert_eq!(value.node, Expr::Str("\"b\"".to_string()));
        }
        other => panic!("expected IndexAssign, got {other:?}"),
    }
}

#[test]
fn test_parse_print_and_println() {
    let prog = parse_ok("print 1; println x;");
    assert!(matches!(&prog.stmts[0].node, Stmt::Print(e) if e.node == Expr::Number(1)));
    assert!(matches!(&prog.stmts[1].node, Stmt::PrintLine(e) if e.node == Expr::Ident("x".to_string())));
}

#[test]
fn test_parse_for_loop() {
    let prog = parse_ok("for i in 1..5 { println i; }");
    match &prog.stmts[0].node {
        Stmt::For { var, range, body } => {
            assert_eq!(var, "i");
            assert_eq!(range.node.lo.node, Expr::Number(1));
            assert_eq!(range.node.hi.node, Expr::Number(5));
            assert_eq!(body.len(), 1);
        }
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn test_parse_for_loop_with_expression_bounds() {
    let prog = parse_ok("for i in a + 1..b max 3 { }");
    match &prog.stmts[0].node {
        Stmt::For { range, body, .. } => {
            assert!(matches!(range.node.lo.node, Expr::AddSub { op: BinOp::Add, .. }));
            assert!(matches!(range.node.hi.node, Expr::MinMax { op: BinOp::Max, .. }));
            assert!(body.is_empty());
        }
        other => panic!("expected For, got {other:?}"),
    }
}

#[test]
fn test_parse_if_without_else() {
    let prog = parse_ok("if x > 1 { println x; }");
    match &prog.stmts[0].node {
        Stmt::If { cond, then_body, else_body } => {
            assert!(matches!(cond.node, Expr::Compare { op: BinOp::Gt, .. }));
            assert_eq!(then_body.len(), 1);
            assert!(else_body.is_none());
        }
        other => panic!("expected If, got {other:?}"),
    }
}

#[test]
fn test_parse_if_else() {
    let prog = parse_ok("if x == 1 { a = 1; } else { a = 2; b = 3; }");
    match &prog.stmts[0].node {
        Stmt::If { else_body: Some(else_body), .. } => assert_eq!(else_body.len(), 2),
        other => panic!("expected If with else, got {other:?}"),
    }
}

#[test]
fn test_parse_nested_blocks() {
    let prog = parse_ok("for i in 1..3 { if i != 2 { for j in 3..1 { print j; } } }");
    let Stmt::For { body, .. } = &prog.stmts[0].node else {
        panic!("expected For");
    };
    let Stmt::If { then_body, .. } = &body[0].node else {
        panic!("expected If");
    };
    assert!(matches!(then_body[0].node, Stmt::For { .. }));
}

// ============================================
// Expressions
// ============================================

#[test]
fn test_parse_string_literal_keeps_delimiters() {
    assert_eq!(parse_expr("\"hi\"").node, Expr::Str("\"hi\"".to_string()));
}

#[test]
fn test_parse_list_literal() {
    let expr = parse_expr("[1, \"two\", x]");
    match expr.node {
        Expr::List(items) => {
            assert_eq!(items.len(), 3);
            assert_eq!(items[2].node, Expr::Ident("x".to_string()));
        }
        other => panic!("expected List, got {other:?}"),
    }
}

#[test]
fn test_parse_empty_list_and_trailing_comma() {
    assert_eq!(parse_expr("[]").node, Expr::List(vec![]));
    assert!(matches!(parse_expr("[1, 2,]").node, Expr::List(items) if items.len() == 2));
}

#[test]
fn test_parse_index_read() {
    match parse_expr("xs[i + 1]").node {
        Expr::Index(index) => {
            assert_eq!(index.name, "xs");
            assert!(matches!(index.index.node, Expr::AddSub { op: BinOp::Add, .. }));
        }
        other => panic!("expected Index, got {other:?}"),
    }
}

#[test]
fn test_parse_add_sub_left_associative() {
    // (1 - 2) + 3
    match parse_expr("1 - 2 + 3").node {
        Expr::AddSub { op: BinOp::Add, lhs, rhs } => {
            assert!(matches!(lhs.node, Expr::AddSub { op: BinOp::Sub, .. }));
            assert_eq!(rhs.node, Expr::Number(3));
        }
        other => panic!("expected AddSub, got {other:?}"),
    }
}

#[test]
fn test_parse_max_binds_tighter_than_add() {
    // 1 + (2 max 3)
    match parse_expr("1 + 2 max 3").node {
        Expr::AddSub { op: BinOp::Add, rhs, .. } => {
            assert!(matches!(rhs.node, Expr::MinMax { op: BinOp::Max, .. }));
        }
        other => panic!("expected AddSub, got {other:?}"),
    }
}

#[test]
fn test_parse_comparison_of_sums() {
    match parse_expr("a + 1 < b - 1").node {
        Expr::Compare { op: BinOp::Lt, lhs, rhs } => {
            assert!(matches!(lhs.node, Expr::AddSub { op: BinOp::Add, .. }));
            assert!(matches!(rhs.node, Expr::AddSub { op: BinOp::Sub, .. }));
        }
        other => panic!("expected Compare, got {other:?}"),
    }
}

#[test]
fn test_parse_parentheses_override_precedence() {
    match parse_expr("(1 + 2) max 3").node {
        Expr::MinMax { op: BinOp::Max, lhs, .. } => {
            assert!(matches!(lhs.node, Expr::AddSub { .. }));
        }
        other => panic!("expected MinMax, got {other:?}"),
    }
}

#[test]
fn test_parse_all_comparison_operators() {
    for (src, op) in [("<", BinOp::Lt), (">", BinOp::Gt), ("==", BinOp::Eq), ("!=", BinOp::Ne)] {
        let expr = parse_expr(&format!("1 {src} 2"));
        assert!(matches!(expr.node, Expr::Compare { op: found, .. } if found == op));
    }
}

// ============================================
// Spans and lines
// ============================================

#[test]
fn test_parse_statement_lines() {
    let prog = parse_ok("a = 1;\n\nb = 2;\nprintln a\n  + b;");
    let lines: Vec<usize> = prog.stmts.iter().map(|s| s.line()).collect();
    assert_eq!(lines, vec![1, 3, 4]);
}

#[test]
fn test_parse_expression_line_is_start_line() {
    let prog = parse_ok("x =\n  y\n  + 1;");
    let Stmt::Assign { value, .. } = &prog.stmts[0].node else {
        panic!("expected Assign");
    };
    assert_eq!(value.line(), 2);
}

// ============================================
// Errors
// ============================================

#[test]
fn test_parse_missing_semicolon_fails() {
    assert!(parse_fails("x = 1"));
}

#[test]
fn test_parse_chained_comparison_fails() {
    assert!(parse_fails("x = 1 < 2 < 3;"));
}

#[test]
fn test_parse_expression_statement_fails() {
    assert!(parse_fails("1 + 2;"));
}

#[test]
fn test_parse_boolean_literals_are_identifiers() {
    // There are no boolean literals; `true` is an ordinary name
    assert_eq!(parse_expr("true").node, Expr::Ident("true".to_string()));
}

#[test]
fn test_parse_error_reports_line() {
    let err = parse_program("a = 1;\nb = ;").unwrap_err();
    assert_eq!(err.span().map(|s| s.line), Some(2));
}

#[test]
fn test_parse_unclosed_block_fails() {
    assert!(parse_fails("for i in 1..2 { println i;"));
}

// ============================================
// Serialized syntax trees
// ============================================

#[test]
fn test_parse_json_round_trip() {
    let prog = parse_ok("xs = [1, 2]; for i in 0..1 { println xs[i] max 0; }");
    let json = serde_json::to_string(&prog).unwrap();
    assert_eq!(parse_json(&json).unwrap(), prog);
}

#[test]
fn test_parse_json_rejects_garbage() {
    assert!(parse_json("{\"stmts\": 3}").is_err());
}
