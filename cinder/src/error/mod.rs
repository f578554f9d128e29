//! Error types and reporting

use crate::ast::Span;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CompileError>;

/// Front-end error: anything that stops a program before it runs
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Lexer error at line {}: {message}", span.line)]
    Lexer { message: String, span: Span },

    #[error("Parser error at line {}: {message}", span.line)]
    Parser { message: String, span: Span },

    #[error("IO error: {message}")]
    Io { message: String },

    /// Malformed serialized syntax tree
    #[error("Syntax tree error: {message}")]
    Parse { message: String },
}

impl CompileError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer { span, .. } | Self::Parser { span, .. } => Some(*span),
            Self::Io { .. } | Self::Parse { .. } => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Lexer { message, .. }
            | Self::Parser { message, .. }
            | Self::Io { message }
            | Self::Parse { message } => message,
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            Self::Lexer { .. } => "Lexer",
            Self::Parser { .. } => "Parser",
            Self::Io { .. } => "IO",
            Self::Parse { .. } => "Syntax tree",
        }
    }
}

impl From<std::io::Error> for CompileError {
    fn from(err: std::io::Error) -> Self {
        CompileError::io_error(err.to_string())
    }
}

impl From<serde_json::Error> for CompileError {
    fn from(err: serde_json::Error) -> Self {
        CompileError::parse_error(err.to_string())
    }
}

/// Any failure from source text to finished run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl RunError {
    /// Render with ariadne against `source`
    pub fn report(&self, filename: &str, source: &str) {
        match self {
            RunError::Compile(err) => report_error(filename, source, err),
            RunError::Runtime(err) => report_runtime_error(filename, source, err),
        }
    }
}

/// Report a front-end error with ariadne
pub fn report_error(filename: &str, source: &str, error: &CompileError) {
    print_report(
        filename,
        source,
        &format!("{} error", error.kind_label()),
        error.message(),
        error.span(),
    );
}

/// Report a runtime error with ariadne.
///
/// `source` may be empty (e.g. a program loaded from a serialized tree); the
/// report then falls back to the message and line number alone.
pub fn report_runtime_error(filename: &str, source: &str, error: &RuntimeError) {
    let span = error.span.filter(|s| s.end <= source.len());
    if span.is_none() {
        eprintln!("{error}");
        return;
    }
    print_report(filename, source, "Runtime error", &error.message, span);
}

fn print_report(filename: &str, source: &str, title: &str, message: &str, span: Option<Span>) {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let range: std::ops::Range<usize> = span.map(Into::into).unwrap_or(0..0);
    let mut report = Report::build(ReportKind::Error, (filename, range.clone()));
    report = match span {
        Some(_) => report.with_message(title).with_label(
            Label::new((filename, range))
                .with_message(message)
                .with_color(Color::Red),
        ),
        None => report.with_message(format!("{title}: {message}")),
    };

    if report
        .finish()
        .eprint((filename, Source::from(source)))
        .is_err()
    {
        eprintln!("{title}: {message}");
    }
}
