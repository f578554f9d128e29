//! Tree-walking evaluator

use super::env::Environment;
use super::error::{InterpResult, RuntimeError};
use super::operation::{self, Operation};
use super::value::{List, Value};
use crate::ast::{BinOp, Expr, Index, Program, Range, Span, Spanned, Statements, Stmt};
use std::io::{self, Write};
use tracing::{debug, trace};

/// Stack growth parameters for deeply nested code and values
pub(super) const STACK_RED_ZONE: usize = 64 * 1024; // 64KB remaining triggers growth
pub(super) const STACK_GROW_SIZE: usize = 1024 * 1024; // Grow by 1MB each time

/// The interpreter.
///
/// Holds only the output sink; bindings live in an [`Environment`] passed to
/// every call so that separate runs never share state unless the caller
/// hands them the same environment.
pub struct Interpreter<W: Write = io::Stdout> {
    out: W,
}

impl Interpreter {
    /// Create an interpreter printing to stdout
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Create an interpreter printing to `out`
    pub fn with_output(out: W) -> Self {
        Interpreter { out }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run a program, returning the result of its last statement.
    ///
    /// The first runtime error aborts the run. Bindings written before the
    /// fault stay in `env`.
    #[tracing::instrument(level = "debug", skip_all, fields(statements = program.stmts.len()))]
    pub fn run(&mut self, program: &Program, env: &mut Environment) -> InterpResult<Option<Value>> {
        debug!("run start");
        let result = self.exec_all(&program.stmts, env);
        let flushed = self.out.flush();
        let value = result?;
        flushed?;
        Ok(value)
    }

    fn exec_all(&mut self, stmts: &Statements, env: &mut Environment) -> InterpResult<Option<Value>> {
        let mut last = None;
        for stmt in stmts {
            last = self.exec(stmt, env)?;
        }
        Ok(last)
    }

    /// Execute one statement; nested bodies recurse through here
    fn exec(&mut self, stmt: &Spanned<Stmt>, env: &mut Environment) -> InterpResult<Option<Value>> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.exec_inner(stmt, env))
    }

    fn exec_inner(&mut self, stmt: &Spanned<Stmt>, env: &mut Environment) -> InterpResult<Option<Value>> {
        match &stmt.node {
            Stmt::Assign { name, value } => {
                let value = self.eval(value, env)?;
                debug!(name = name.as_str(), value = %value, line = stmt.line(), "assign");
                env.write(name.as_str(), value.clone());
                Ok(Some(value))
            }

            Stmt::IndexAssign { target, value } => {
                let position = self.eval_index_position(target, env)?;
                let list = lookup_list(&target.name, stmt.span, env)?;
                let value = self.eval(value, env)?;
                list.set(position, value)
                    .map(Some)
                    .map_err(|e| e.at(stmt.span))
            }

            Stmt::Print(expr) => self.print(expr, false, env).map(Some),
            Stmt::PrintLine(expr) => self.print(expr, true, env).map(Some),

            Stmt::For { var, range, body } => self.exec_for(var, range, body, env),

            Stmt::If {
                cond,
                then_body,
                else_body,
            } => {
                let value = self.eval(cond, env)?;
                let taken = value
                    .as_bool()
                    .ok_or_else(|| RuntimeError::type_mismatch("bool", &value).at(cond.span))?;
                if taken {
                    self.exec_all(then_body, env)
                } else if let Some(else_body) = else_body {
                    self.exec_all(else_body, env)
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn print(&mut self, expr: &Spanned<Expr>, newline: bool, env: &mut Environment) -> InterpResult<Value> {
        let value = self.eval(expr, env)?;
        let written = if newline {
            writeln!(self.out, "{value}")
        } else {
            write!(self.out, "{value}")
        };
        written.map_err(|e| RuntimeError::from(e).at(expr.span))?;
        Ok(value)
    }

    /// Counting loop over an inclusive range, ascending or descending.
    ///
    /// The counter is rebound to a fresh integer before every iteration, so
    /// assignments to it inside the body do not change the iteration
    /// sequence, and a binding copied from it keeps the value it had when
    /// copied. The binding is removed on exit and its final value returned.
    fn exec_for(
        &mut self,
        var: &str,
        range: &Spanned<Range>,
        body: &Statements,
        env: &mut Environment,
    ) -> InterpResult<Option<Value>> {
        let (lo, hi) = self.eval_range(range, env)?;
        debug!(var, lo, hi, line = range.line(), "loop enter");

        let ascending = lo <= hi;
        let mut counters = if ascending { lo..=hi } else { hi..=lo };
        env.write(var, Value::Int(lo));

        loop {
            let next = if ascending {
                counters.next()
            } else {
                counters.next_back()
            };
            let Some(i) = next else { break };
            trace!(var, i, "iteration");
            env.write(var, Value::Int(i));
            self.exec_all(body, env)?;
        }

        let last = env.remove(var);
        debug!(var, "loop exit");
        Ok(last)
    }

    /// Evaluate both range bounds, left to right
    fn eval_range(&mut self, range: &Spanned<Range>, env: &mut Environment) -> InterpResult<(i64, i64)> {
        let lo = self.eval_int(&range.node.lo, env)?;
        let hi = self.eval_int(&range.node.hi, env)?;
        Ok((lo, hi))
    }

    fn eval_int(&mut self, expr: &Spanned<Expr>, env: &mut Environment) -> InterpResult<i64> {
        let value = self.eval(expr, env)?;
        value
            .as_int()
            .ok_or_else(|| RuntimeError::type_mismatch("int", &value).at(expr.span))
    }

    fn eval_index_position(&mut self, index: &Index, env: &mut Environment) -> InterpResult<i64> {
        self.eval_int(&index.index, env)
    }

    /// Evaluate an expression, growing the stack when nesting gets deep
    fn eval(&mut self, expr: &Spanned<Expr>, env: &mut Environment) -> InterpResult<Value> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || self.eval_inner(expr, env))
    }

    fn eval_inner(&mut self, expr: &Spanned<Expr>, env: &mut Environment) -> InterpResult<Value> {
        match &expr.node {
            Expr::Number(n) => Ok(Value::Int(*n)),

            Expr::Str(raw) => Ok(Value::from(strip_delimiters(raw))),

            Expr::Ident(name) => env.read(name).map_err(|e| e.at(expr.span)),

            Expr::List(items) => {
                let values = items
                    .iter()
                    .map(|item| self.eval(item, env))
                    .collect::<InterpResult<Vec<_>>>()?;
                Ok(Value::from(values))
            }

            Expr::Index(index) => {
                let list = lookup_list(&index.name, expr.span, env)?;
                let position = self.eval_index_position(index, env)?;
                list.get(position).map_err(|e| e.at(expr.span))
            }

            Expr::MinMax { op, lhs, rhs } => {
                let pick_rhs = match op {
                    BinOp::Max => std::cmp::Ordering::Less,
                    BinOp::Min => std::cmp::Ordering::Greater,
                    _ => return Err(RuntimeError::unknown_operator(op, expr.node.kind_name()).at(expr.span)),
                };
                let l = self.eval(lhs, env)?;
                let r = self.eval(rhs, env)?;
                match l.compare(&r) {
                    // ties keep the left operand
                    Some(ord) if ord == pick_rhs => Ok(r),
                    Some(_) => Ok(l),
                    None => Err(RuntimeError::unsupported_operation(&op.to_string(), &l, &r).at(expr.span)),
                }
            }

            Expr::AddSub { op, lhs, rhs } => {
                if !matches!(op, BinOp::Add | BinOp::Sub) {
                    return Err(RuntimeError::unknown_operator(op, expr.node.kind_name()).at(expr.span));
                }
                let l = self.eval(lhs, env)?;
                let r = self.eval(rhs, env)?;
                let result = if *op == BinOp::Add {
                    l.add(&r)
                } else {
                    l.subtract(&r)
                };
                result.map_err(|e| e.at(expr.span))
            }

            Expr::Compare { op, lhs, rhs } => {
                let operation = match op {
                    BinOp::Gt => Operation::Greater,
                    BinOp::Lt => Operation::Less,
                    BinOp::Eq | BinOp::Ne => Operation::Equal,
                    _ => return Err(RuntimeError::unknown_operator(op, expr.node.kind_name()).at(expr.span)),
                };
                let l = self.eval(lhs, env)?;
                let r = self.eval(rhs, env)?;
                let result = operation::evaluate(&l, &r, operation)
                    .map_err(|e| e.at(expr.span))?
                    .ok_or_else(|| RuntimeError::unsupported_operation(&op.to_string(), &l, &r).at(expr.span))?;
                match (op, result) {
                    (BinOp::Ne, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (_, value) => Ok(value),
                }
            }
        }
    }
}

/// Resolve `name` to a list binding
fn lookup_list(name: &str, span: Span, env: &Environment) -> InterpResult<List> {
    let value = env.read(name).map_err(|e| e.at(span))?;
    value
        .as_list()
        .cloned()
        .ok_or_else(|| RuntimeError::type_mismatch("list", &value).at(span))
}

/// String literals keep their quotes in the syntax tree
fn strip_delimiters(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}
