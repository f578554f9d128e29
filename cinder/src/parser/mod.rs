//! Parser implementation using lalrpop

use crate::ast::{LineIndex, Program, Span};
use crate::error::{CompileError, Result};
use crate::lexer::Token;

#[cfg(test)]
mod tests;

lalrpop_util::lalrpop_mod!(
    #[allow(clippy::all)]
    grammar
);

/// Parse tokens into AST
pub fn parse(_filename: &str, source: &str, tokens: Vec<(Token, Span)>) -> Result<Program> {
    let lines = LineIndex::new(source);
    let token_iter = tokens
        .into_iter()
        .map(|(tok, span)| (span.start, tok, span.end));

    grammar::ProgramParser::new()
        .parse(&lines, token_iter)
        .map_err(|e| {
            let (start, end) = match &e {
                lalrpop_util::ParseError::InvalidToken { location } => (*location, *location + 1),
                lalrpop_util::ParseError::UnrecognizedEof { location, .. } => {
                    (*location, *location + 1)
                }
                lalrpop_util::ParseError::UnrecognizedToken { token, .. } => (token.0, token.2),
                lalrpop_util::ParseError::ExtraToken { token } => (token.0, token.2),
                lalrpop_util::ParseError::User { .. } => (0, 1),
            };
            CompileError::parser(format!("{e}"), lines.span(start, end))
        })
}

/// Parse a syntax tree serialized as JSON (the output of `cinder parse`)
pub fn parse_json(json: &str) -> Result<Program> {
    Ok(serde_json::from_str(json)?)
}
