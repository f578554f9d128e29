//! Runtime values for the interpreter

use super::error::{InterpResult, RuntimeError};
use super::eval::{STACK_GROW_SIZE, STACK_RED_ZONE};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

type ListAddr = *const RefCell<Vec<Value>>;

/// Value kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Int,
    Str,
    Bool,
    List,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Str => "string",
            Kind::Bool => "bool",
            Kind::List => "list",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),
    /// Immutable text; arithmetic on strings always builds a new one
    Str(Rc<str>),
    /// Boolean, produced only by comparisons
    Bool(bool),
    /// Shared mutable list
    List(List),
}

/// Heterogeneous list with reference semantics.
///
/// Cloning a `List` clones the handle: every binding of the same list sees
/// index writes made through any other binding.
#[derive(Debug, Clone, Default)]
pub struct List(Rc<RefCell<Vec<Value>>>);

impl List {
    pub fn new(items: Vec<Value>) -> Self {
        List(Rc::new(RefCell::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn checked_index(&self, index: i64) -> InterpResult<usize> {
        let len = self.len();
        usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or_else(|| RuntimeError::index_out_of_bounds(index, len))
    }

    /// Element at `index`; negative or past-the-end indices are errors
    pub fn get(&self, index: i64) -> InterpResult<Value> {
        let i = self.checked_index(index)?;
        Ok(self.0.borrow()[i].clone())
    }

    /// Replace the element at `index`, returning the stored element
    pub fn set(&self, index: i64, value: Value) -> InterpResult<Value> {
        let i = self.checked_index(index)?;
        self.0.borrow_mut()[i] = value.clone();
        Ok(value)
    }

    /// Whether both handles refer to the same list
    pub fn ptr_eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> ListAddr {
        Rc::as_ptr(&self.0)
    }
}

/// Nested lists owned by nothing else are unwound on the heap, so dropping a
/// deeply nested list does not recurse once per level.
impl Drop for List {
    fn drop(&mut self) {
        let Some(cell) = Rc::get_mut(&mut self.0) else {
            return;
        };
        let mut pending = std::mem::take(cell.get_mut());
        while let Some(value) = pending.pop() {
            if let Value::List(mut inner) = value {
                if let Some(cell) = Rc::get_mut(&mut inner.0) {
                    pending.append(cell.get_mut());
                }
            }
        }
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Int(_) => Kind::Int,
            Value::Str(_) => Kind::Str,
            Value::Bool(_) => Kind::Bool,
            Value::List(_) => Kind::List,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Try to convert to i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to convert to bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// Same-kind ordering. Cross-kind pairs and lists have no ordering.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Integer sum or string concatenation; integers are rendered in decimal
    /// when concatenated with a string
    pub fn add(&self, other: &Value) -> InterpResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(*b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::integer_overflow("+", *a, *b)),
            (Value::Int(a), Value::Str(b)) => Ok(Value::from(format!("{a}{b}"))),
            (Value::Str(a), Value::Int(b)) => Ok(Value::from(format!("{a}{b}"))),
            (Value::Str(a), Value::Str(b)) => Ok(Value::from(format!("{a}{b}"))),
            _ => Err(RuntimeError::unsupported_operation("+", self, other)),
        }
    }

    pub fn subtract(&self, other: &Value) -> InterpResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_sub(*b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::integer_overflow("-", *a, *b)),
            _ => Err(RuntimeError::unsupported_operation("-", self, other)),
        }
    }

    pub fn multiply(&self, other: &Value) -> InterpResult<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_mul(*b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::integer_overflow("*", *a, *b)),
            _ => Err(RuntimeError::unsupported_operation("*", self, other)),
        }
    }

    /// Kind and value for diagnostics, e.g. `int 3` or `string "a"`
    pub fn describe(&self) -> String {
        match self {
            Value::Str(s) => format!("string {s:?}"),
            other => format!("{} {other}", other.type_name()),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Int(0)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(List::new(items))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, &mut HashSet::new())
    }
}

/// A list that (indirectly) contains itself is printed as `[...]`
fn write_value(
    f: &mut fmt::Formatter<'_>,
    value: &Value,
    seen: &mut HashSet<ListAddr>,
) -> fmt::Result {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match value {
        Value::Int(n) => write!(f, "{n}"),
        Value::Str(s) => f.write_str(s),
        Value::Bool(b) => write!(f, "{b}"),
        Value::List(list) if list.is_empty() => f.write_str("[]"),
        Value::List(list) => {
            if !seen.insert(list.addr()) {
                return f.write_str("[...]");
            }
            f.write_str("[")?;
            for (i, item) in list.0.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, seen)?;
            }
            seen.remove(&list.addr());
            f.write_str("]")
        }
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other, &mut HashSet::new())
    }
}

/// Structural equality. Lists compare element by element; a pair of lists
/// already under comparison further up counts as equal, so cyclic lists
/// terminate.
fn values_equal(
    lhs: &Value,
    rhs: &Value,
    comparing: &mut HashSet<(ListAddr, ListAddr)>,
) -> bool {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, || match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            if a.ptr_eq(b) {
                return true;
            }
            let pair = (a.addr(), b.addr());
            if !comparing.insert(pair) {
                return true;
            }
            let (xs, ys) = (a.0.borrow(), b.0.borrow());
            let equal = xs.len() == ys.len()
                && xs.iter().zip(ys.iter()).all(|(x, y)| values_equal(x, y, comparing));
            comparing.remove(&pair);
            equal
        }
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::ErrorKind;

    fn list(items: Vec<Value>) -> Value {
        Value::from(items)
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(
            list(vec![Value::Int(1), Value::from("a"), list(vec![])]).to_string(),
            "[1, a, []]"
        );
    }

    #[test]
    fn test_value_default_is_zero() {
        assert_eq!(Value::default(), Value::Int(0));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::from("s").type_name(), "string");
        assert_eq!(Value::Bool(false).type_name(), "bool");
        assert_eq!(list(vec![]).type_name(), "list");
    }

    #[test]
    fn test_int_add_is_commutative() {
        for (a, b) in [(1, 2), (-7, 3), (0, 0), (i64::MIN, i64::MAX)] {
            let ab = Value::Int(a).add(&Value::Int(b)).unwrap();
            let ba = Value::Int(b).add(&Value::Int(a)).unwrap();
            assert_eq!(ab, ba);
            assert_eq!(ab, Value::Int(a + b));
        }
    }

    #[test]
    fn test_add_string_and_int_concatenates_decimal() {
        let s = Value::from("n=");
        assert_eq!(s.add(&Value::Int(-12)).unwrap(), Value::from("n=-12"));
        assert_eq!(Value::Int(12).add(&s).unwrap(), Value::from("12n="));
        assert_eq!(s.add(&Value::from("x")).unwrap(), Value::from("n=x"));
    }

    #[test]
    fn test_add_allocates_fresh_value() {
        let a = Value::from("a");
        let b = a.clone();
        let sum = a.add(&Value::from("x")).unwrap();
        assert_eq!(b, Value::from("a"));
        assert_eq!(sum, Value::from("ax"));
    }

    #[test]
    fn test_add_rejects_bool_and_list() {
        let err = Value::Bool(true).add(&Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
        let err = list(vec![]).add(&Value::from("x")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_subtract_ints_only() {
        assert_eq!(Value::Int(5).subtract(&Value::Int(8)).unwrap(), Value::Int(-3));
        let err = Value::from("a").subtract(&Value::Int(1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_multiply_ints_only() {
        assert_eq!(Value::Int(6).multiply(&Value::Int(-7)).unwrap(), Value::Int(-42));
        let err = Value::Int(2).multiply(&Value::from("ab")).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let max = Value::Int(i64::MAX);
        assert_eq!(max.add(&Value::Int(1)).unwrap_err().kind, ErrorKind::IntegerOverflow);
        let min = Value::Int(i64::MIN);
        assert_eq!(min.subtract(&Value::Int(1)).unwrap_err().kind, ErrorKind::IntegerOverflow);
        assert_eq!(max.multiply(&Value::Int(2)).unwrap_err().kind, ErrorKind::IntegerOverflow);
    }

    #[test]
    fn test_compare_same_kind() {
        assert_eq!(Value::Int(1).compare(&Value::Int(2)), Some(Ordering::Less));
        assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::from("abc").compare(&Value::from("abd")), Some(Ordering::Less));
        assert_eq!(Value::Bool(false).compare(&Value::Bool(true)), Some(Ordering::Less));
    }

    #[test]
    fn test_compare_cross_kind_is_none() {
        assert_eq!(Value::Int(1).compare(&Value::from("1")), None);
        assert_eq!(list(vec![]).compare(&list(vec![])), None);
        assert_eq!(Value::Bool(true).compare(&Value::Int(1)), None);
    }

    #[test]
    fn test_list_get_and_set_bounds() {
        let l = List::new(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(l.set(2, Value::from("z")).unwrap(), Value::from("z"));
        assert_eq!(l.get(2).unwrap(), Value::from("z"));
        assert_eq!(l.set(3, Value::Int(0)).unwrap_err().kind, ErrorKind::IndexOutOfBounds);
        assert_eq!(l.get(-1).unwrap_err().kind, ErrorKind::IndexOutOfBounds);
        assert_eq!(l.len(), 3);
    }

    #[test]
    fn test_list_reference_semantics() {
        let a = list(vec![Value::Int(1)]);
        let b = a.clone();
        b.as_list().unwrap().set(0, Value::Int(9)).unwrap();
        assert_eq!(a.to_string(), "[9]");
        assert!(a.as_list().unwrap().ptr_eq(b.as_list().unwrap()));
    }

    #[test]
    fn test_self_containing_list_display_terminates() {
        let l = List::new(vec![Value::Int(0)]);
        l.set(0, Value::List(l.clone())).unwrap();
        assert_eq!(Value::List(l.clone()).to_string(), "[[...]]");
        // break the cycle so the test does not leak
        l.set(0, Value::Int(0)).unwrap();
    }

    #[test]
    fn test_self_containing_lists_compare_by_contents() {
        let cyclic = |head: i64| {
            let l = List::new(vec![Value::Int(head), Value::Int(0)]);
            l.set(1, Value::List(l.clone())).unwrap();
            l
        };
        let (a, b, c) = (cyclic(1), cyclic(1), cyclic(2));
        assert!(Value::List(a.clone()) == Value::List(b.clone()));
        assert!(Value::List(a.clone()) != Value::List(c.clone()));
        assert!(list(vec![Value::Int(1), Value::List(a.clone())]) == Value::List(b.clone()));
        for l in [a, b, c] {
            l.set(1, Value::Int(0)).unwrap();
        }
    }

    #[test]
    fn test_list_equality_by_contents() {
        let a = list(vec![Value::Int(1), list(vec![Value::from("x")])]);
        let b = list(vec![Value::Int(1), list(vec![Value::from("x")])]);
        assert_eq!(a, b);
        assert_ne!(a, list(vec![Value::Int(1)]));
        assert_ne!(list(vec![]), Value::Int(0));
    }

    #[test]
    fn test_deeply_nested_list_display_and_drop() {
        let depth = 20_000;
        let nested = |innermost: i64| {
            let mut value = Value::Int(innermost);
            for _ in 0..depth {
                value = list(vec![value]);
            }
            value
        };
        let value = nested(7);
        let shown = value.to_string();
        assert_eq!(shown.len(), 2 * depth + 1);
        assert!(shown.starts_with("[[[") && shown.contains("[7]"));
        assert!(value == nested(7));
        assert!(value != nested(8));
        drop(value);
    }

    #[test]
    fn test_drop_keeps_shared_inner_lists() {
        let inner = List::new(vec![Value::Int(1), Value::Int(2)]);
        let outer = list(vec![Value::List(inner.clone())]);
        drop(outer);
        assert_eq!(inner.len(), 2);
        assert_eq!(inner.get(1).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_describe() {
        assert_eq!(Value::Int(3).describe(), "int 3");
        assert_eq!(Value::from("a b").describe(), "string \"a b\"");
        assert_eq!(list(vec![Value::Int(1)]).describe(), "list [1]");
    }

    #[test]
    fn test_kind_never_changes_on_arithmetic() {
        let v = Value::Int(1);
        let sum = v.add(&Value::from("x")).unwrap();
        assert_eq!(v.kind(), Kind::Int);
        assert_eq!(sum.kind(), Kind::Str);
    }
}
