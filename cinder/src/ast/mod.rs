//! Abstract Syntax Tree definitions
//!
//! The tree is the contract between the parser and the interpreter. It is
//! serde-serialisable so a tree produced elsewhere can be evaluated directly.

mod expr;
mod span;

pub use expr::*;
pub use span::*;

use serde::{Deserialize, Serialize};

/// A program is a sequence of statements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub stmts: Statements,
}

impl Program {
    pub fn new(stmts: Statements) -> Self {
        Program { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

/// Deeply nested blocks and expressions are torn down from heap work lists
/// instead of one native stack frame per level.
impl Drop for Program {
    fn drop(&mut self) {
        let mut stmts = std::mem::take(&mut self.stmts);
        let mut exprs: Vec<Spanned<Expr>> = Vec::new();
        loop {
            if let Some(stmt) = stmts.pop() {
                match stmt.node {
                    Stmt::Assign { value, .. } | Stmt::Print(value) | Stmt::PrintLine(value) => {
                        exprs.push(value)
                    }
                    Stmt::IndexAssign { target, value } => {
                        exprs.push(*target.index);
                        exprs.push(value);
                    }
                    Stmt::For { range, body, .. } => {
                        exprs.push(range.node.lo);
                        exprs.push(range.node.hi);
                        stmts.extend(body);
                    }
                    Stmt::If {
                        cond,
                        then_body,
                        else_body,
                    } => {
                        exprs.push(cond);
                        stmts.extend(then_body);
                        stmts.extend(else_body.into_iter().flatten());
                    }
                }
            } else if let Some(expr) = exprs.pop() {
                match expr.node {
                    Expr::List(items) => exprs.extend(items),
                    Expr::Index(index) => exprs.push(*index.index),
                    Expr::MinMax { lhs, rhs, .. }
                    | Expr::AddSub { lhs, rhs, .. }
                    | Expr::Compare { lhs, rhs, .. } => {
                        exprs.push(*lhs);
                        exprs.push(*rhs);
                    }
                    Expr::Number(_) | Expr::Str(_) | Expr::Ident(_) => {}
                }
            } else {
                break;
            }
        }
    }
}
