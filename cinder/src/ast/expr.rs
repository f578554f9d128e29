//! Expression and statement AST nodes

use super::Spanned;
use serde::{Deserialize, Serialize};

/// A statement list: a program body, a loop body or an if branch
pub type Statements = Vec<Spanned<Stmt>>;

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `name = value;`
    Assign { name: String, value: Spanned<Expr> },

    /// `name[index] = value;`
    IndexAssign { target: Index, value: Spanned<Expr> },

    /// `print expr;` (no trailing newline)
    Print(Spanned<Expr>),

    /// `println expr;`
    PrintLine(Spanned<Expr>),

    /// `for var in lo..hi { body }`
    For {
        var: String,
        range: Spanned<Range>,
        body: Statements,
    },

    /// `if cond { then_body } else { else_body }`
    If {
        cond: Spanned<Expr>,
        then_body: Statements,
        else_body: Option<Statements>,
    },
}

/// Loop bounds, both inclusive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub lo: Spanned<Expr>,
    pub hi: Spanned<Expr>,
}

/// `name[index]`, used both as an expression and as an assignment target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub index: Box<Spanned<Expr>>,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Integer literal
    Number(i64),
    /// String literal, delimiters included as written in the source
    Str(String),
    /// Variable reference
    Ident(String),
    /// `[a, b, c]`
    List(Vec<Spanned<Expr>>),
    /// `name[index]`
    Index(Index),

    /// `lhs max rhs` / `lhs min rhs`
    MinMax {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },

    /// `lhs + rhs` / `lhs - rhs`
    AddSub {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },

    /// `lhs > rhs`, `lhs < rhs`, `lhs == rhs`, `lhs != rhs`
    Compare {
        op: BinOp,
        lhs: Box<Spanned<Expr>>,
        rhs: Box<Spanned<Expr>>,
    },
}

/// Binary operator token carried by the binary expression nodes.
///
/// Each node kind accepts only its own operators; anything else found on a
/// node (e.g. from a hand-written syntax tree) is an unknown operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Max,
    Min,
    Gt,
    Lt,
    Eq,
    Ne,
}

impl std::fmt::Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Max => write!(f, "max"),
            BinOp::Min => write!(f, "min"),
            BinOp::Gt => write!(f, ">"),
            BinOp::Lt => write!(f, "<"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
        }
    }
}

impl Expr {
    /// Node kind name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number literal",
            Expr::Str(_) => "string literal",
            Expr::Ident(_) => "identifier",
            Expr::List(_) => "list",
            Expr::Index(_) => "index",
            Expr::MinMax { .. } => "min/max expression",
            Expr::AddSub { .. } => "arithmetic expression",
            Expr::Compare { .. } => "comparison",
        }
    }
}
