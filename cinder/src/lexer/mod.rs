//! Lexer implementation using logos

mod token;

pub use token::Token;

use crate::ast::{LineIndex, Span};
use crate::error::{CompileError, Result};
use logos::Logos;

/// Tokenize source code
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let span = lines.span(range.start, range.end);
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => {
                let slice = lexer.slice();
                let message = if slice.bytes().all(|b| b.is_ascii_digit()) {
                    format!("integer literal out of range: {slice}")
                } else {
                    format!("unexpected character: {slice:?}")
                };
                return Err(CompileError::lexer(message, span));
            }
        }
    }

    Ok(tokens)
}
