//! Cinder: a small scripting language with a tree-walking interpreter.
//!
//! Source text goes through [`lexer::tokenize`] and [`parser::parse`] into an
//! [`ast::Program`], which [`interp::Interpreter`] runs against an
//! [`interp::Environment`].

pub mod ast;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod util;

pub use ast::Span;
pub use error::{CompileError, Result, RunError};

use std::io::Write;

/// Lex and parse a source file
pub fn compile(filename: &str, source: &str) -> Result<ast::Program> {
    let tokens = lexer::tokenize(source)?;
    parser::parse(filename, source, tokens)
}

/// Compile and run `source` against `env`, printing to `out`
pub fn run_source<W: Write>(
    filename: &str,
    source: &str,
    env: &mut interp::Environment,
    out: W,
) -> std::result::Result<Option<interp::Value>, RunError> {
    let program = compile(filename, source)?;
    let mut interpreter = interp::Interpreter::with_output(out);
    Ok(interpreter.run(&program, env)?)
}
