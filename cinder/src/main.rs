//! Cinder CLI

use cinder::error::RunError;
use cinder::interp::{Environment, Interpreter};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "cinder", version, about = "Cinder - a small scripting language")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a Cinder program
    Run {
        /// Source file to run
        file: PathBuf,
        /// Treat the file as a JSON syntax tree (as printed by `parse`)
        #[arg(long)]
        ast: bool,
    },
    /// Parse and dump the syntax tree as JSON
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Start the interactive shell
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Run { file, ast } => run_file(&file, ast),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Repl => run_repl(),
    };

    if let Err(e) = result {
        // diagnostics were already rendered against their source
        if !e.is::<RunError>() {
            eprintln!("Error: {e}");
        }
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Logs go to stderr so program output stays clean
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .init();
}

fn read_source(path: &Path) -> Result<String, Box<dyn Error>> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()).into())
}

/// Render a compile or runtime error with source context and hand it back
fn reported(error: impl Into<RunError>, filename: &str, source: &str) -> Box<dyn Error> {
    let error = error.into();
    error.report(filename, source);
    Box::new(error)
}

fn run_file(path: &Path, from_ast: bool) -> Result<(), Box<dyn Error>> {
    let source = read_source(path)?;
    let filename = path.display().to_string();

    let program = if from_ast {
        cinder::parser::parse_json(&source)
    } else {
        cinder::compile(&filename, &source)
    };
    let program = program.map_err(|e| reported(e, &filename, &source))?;
    if program.is_empty() {
        tracing::warn!(file = %filename, "program has no statements");
    }

    tracing::info!(file = %filename, statements = program.stmts.len(), "running");
    let mut env = Environment::new();
    // a serialized tree has no source text to point into
    let shown_source = if from_ast { "" } else { source.as_str() };
    Interpreter::new()
        .run(&program, &mut env)
        .map_err(|e| reported(e, &filename, shown_source))?;
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), Box<dyn Error>> {
    let source = read_source(path)?;
    let filename = path.display().to_string();

    let ast = cinder::compile(&filename, &source).map_err(|e| reported(e, &filename, &source))?;
    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn Error>> {
    let source = read_source(path)?;
    let filename = path.display().to_string();

    let tokens = cinder::lexer::tokenize(&source).map_err(|e| reported(e, &filename, &source))?;
    for (tok, span) in &tokens {
        println!("{tok:?} @ {}..{} (line {})", span.start, span.end, span.line);
    }

    Ok(())
}

fn run_repl() -> Result<(), Box<dyn Error>> {
    let mut repl = cinder::repl::Repl::new()?;
    repl.run()?;
    Ok(())
}
