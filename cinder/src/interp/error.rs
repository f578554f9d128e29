//! Runtime errors for the interpreter

use super::Value;
use crate::ast::Span;
use std::fmt;

/// Runtime error during interpretation
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    /// Source location of the failing node, when one is known
    pub span: Option<Span>,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Identifier read before any assignment
    UndeclaredVariable,
    /// Operator that does not belong to the expression node carrying it
    UnknownOperator,
    /// Operator applied to an illegal pair of operand kinds
    UnsupportedOperation,
    /// List index outside `0..len`
    IndexOutOfBounds,
    /// Operand of the wrong kind (non-boolean condition, non-list index target, ...)
    TypeMismatch,
    /// Checked integer arithmetic overflowed
    IntegerOverflow,
    /// Writing to the output sink failed
    IoError,
}

impl RuntimeError {
    fn new(kind: ErrorKind, message: String) -> Self {
        RuntimeError {
            kind,
            message,
            span: None,
        }
    }

    pub fn undeclared_variable(name: &str, suggestion: Option<&str>) -> Self {
        Self::new(
            ErrorKind::UndeclaredVariable,
            format!(
                "undeclared variable: {name}{}",
                crate::util::format_suggestion_hint(suggestion)
            ),
        )
    }

    pub fn unknown_operator(op: impl fmt::Display, node: &str) -> Self {
        Self::new(
            ErrorKind::UnknownOperator,
            format!("unknown operator `{op}` in {node}"),
        )
    }

    pub fn unsupported_operation(op: &str, lhs: &Value, rhs: &Value) -> Self {
        Self::new(
            ErrorKind::UnsupportedOperation,
            format!(
                "unsupported operation: {op} between {} and {}",
                lhs.describe(),
                rhs.describe()
            ),
        )
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfBounds,
            format!("index {index} out of bounds for length {len}"),
        )
    }

    pub fn type_mismatch(expected: &str, got: &Value) -> Self {
        Self::new(
            ErrorKind::TypeMismatch,
            format!("type mismatch: expected {expected}, got {}", got.describe()),
        )
    }

    pub fn integer_overflow(op: &str, lhs: i64, rhs: i64) -> Self {
        Self::new(
            ErrorKind::IntegerOverflow,
            format!("integer overflow: {lhs} {op} {rhs}"),
        )
    }

    pub fn io_error(msg: &str) -> Self {
        Self::new(ErrorKind::IoError, format!("IO error: {msg}"))
    }

    /// Attach a source span unless a more precise one is already present
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    /// 1-based source line of the failure
    pub fn line(&self) -> Option<usize> {
        self.span.map(|s| s.line)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line() {
            Some(line) => write!(f, "Runtime error at line {line}: {}", self.message),
            None => write!(f, "Runtime error: {}", self.message),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::io_error(&err.to_string())
    }
}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
