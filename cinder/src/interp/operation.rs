//! Binary operation dispatch over concrete operand kinds

use super::error::{InterpResult, RuntimeError};
use super::value::Value;
use std::fmt;

/// Binary operation understood by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mult,
    Div,
    Equal,
    Greater,
    Less,
}

impl Operation {
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Sub => "-",
            Operation::Mult => "*",
            Operation::Div => "/",
            Operation::Equal => "==",
            Operation::Greater => ">",
            Operation::Less => "<",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Apply `op` to `(lhs, rhs)`.
///
/// `Ok(None)` means the pairing has no implementation; the caller decides
/// whether that is an error. Equality and less-than between an integer and a
/// string are rejected outright. Less-than over two strings answers whether
/// `lhs` sorts after `rhs`.
pub fn evaluate(lhs: &Value, rhs: &Value, op: Operation) -> InterpResult<Option<Value>> {
    use Operation::*;
    use Value::{Int, Str};

    let result = match (op, lhs, rhs) {
        (Add, Int(_) | Str(_), Int(_) | Str(_)) => Some(lhs.add(rhs)?),

        (Equal, Int(a), Int(b)) => Some(Value::from(a == b)),
        (Equal, Str(a), Str(b)) => Some(Value::from(a == b)),
        (Equal | Less, Int(_), Str(_)) | (Equal | Less, Str(_), Int(_)) => {
            return Err(RuntimeError::unsupported_operation(op.symbol(), lhs, rhs));
        }

        (Greater, Int(a), Int(b)) => Some(Value::from(a > b)),
        (Less, Int(a), Int(b)) => Some(Value::from(a < b)),
        (Less, Str(a), Str(b)) => Some(Value::from(a > b)),

        _ => None,
    };
    Ok(result)
}
