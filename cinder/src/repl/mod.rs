//! REPL (Read-Eval-Print Loop) for Cinder

use crate::error::RunError;
use crate::interp::{Environment, Value};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::io::{self, Write};
use std::path::PathBuf;

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".cinder_history";
const REPL_FILENAME: &str = "<repl>";

/// Bindings shared by every input of one REPL session
#[derive(Debug, Default)]
pub struct Session {
    env: Environment,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Source to run for `input`.
    ///
    /// A line that is not a program but is a valid expression is printed,
    /// so `x max 3` works without writing `println`.
    pub fn source_for(input: &str) -> String {
        if crate::compile(REPL_FILENAME, input).is_ok() {
            return input.to_string();
        }
        let wrapped = format!("println {input};");
        if crate::compile(REPL_FILENAME, &wrapped).is_ok() {
            wrapped
        } else {
            input.to_string()
        }
    }

    /// Run `source` against the session bindings. Bindings written before a
    /// runtime error are kept.
    pub fn run<W: Write>(&mut self, source: &str, out: W) -> Result<Option<Value>, RunError> {
        crate::run_source(REPL_FILENAME, source, &mut self.env, out)
    }

    /// `name = value` lines in name order
    pub fn bindings(&self) -> Vec<String> {
        self.env
            .names()
            .into_iter()
            .filter_map(|name| self.env.get(name).map(|v| format!("{name} = {}", v.describe())))
            .collect()
    }

    pub fn reset(&mut self) {
        self.env.clear();
    }
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Cinder REPL v{}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let _ = self.editor.add_history_entry(line);

                    if line.starts_with(':') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.eval_input(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Handle REPL commands (starting with :). Returns true to exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => {
                println!("Goodbye!");
                true
            }
            ":help" | ":h" | ":?" => {
                print_help();
                false
            }
            ":clear" => {
                print!("\x1B[2J\x1B[1;1H");
                let _ = io::stdout().flush();
                false
            }
            ":env" => {
                let bindings = self.session.bindings();
                if bindings.is_empty() {
                    println!("(no bindings)");
                }
                for line in bindings {
                    println!("{line}");
                }
                false
            }
            ":reset" => {
                self.session.reset();
                println!("Bindings cleared.");
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn eval_input(&mut self, input: &str) {
        let source = Session::source_for(input);
        if let Err(err) = self.session.run(&source, io::stdout()) {
            err.report(REPL_FILENAME, &source);
        }
    }
}

fn print_help() {
    println!("Cinder REPL Commands:");
    println!("  :help, :h, :?   Show this help");
    println!("  :quit, :q       Exit the REPL");
    println!("  :clear          Clear the screen");
    println!("  :env            List current bindings");
    println!("  :reset          Remove all bindings");
    println!();
    println!("You can enter:");
    println!("  - Statements: x = [1, 2]; for i in 0..1 {{ println x[i]; }}");
    println!("  - Expressions: x max 3, \"n=\" + n");
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
