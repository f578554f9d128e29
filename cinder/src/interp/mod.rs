//! Tree-walking interpreter for Cinder programs

mod env;
mod error;
mod eval;
mod operation;
mod value;

pub use env::Environment;
pub use error::{ErrorKind, InterpResult, RuntimeError};
pub use eval::Interpreter;
pub use operation::{evaluate, Operation};
pub use value::{Kind, List, Value};
