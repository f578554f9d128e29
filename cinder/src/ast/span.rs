//! Source location tracking

use serde::{Deserialize, Serialize};

/// A span in the source code: byte offsets plus the 1-based line of `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{} (line {})", self.start, self.end, self.line)
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A value with source location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Line the node starts on
    pub fn line(&self) -> usize {
        self.span.line
    }
}

/// Byte offset → line lookup for one source text
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Offset of the first byte of every line; always starts with 0
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        LineIndex { line_starts }
    }

    /// 1-based line containing `offset`
    pub fn line_of(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact + 1,
            Err(insert_at) => insert_at,
        }
    }

    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(start, end, self.line_of(start))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
