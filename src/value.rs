use std::cmp::Ordering;
use std::fmt;

/// A runtime value. `Undefined` is never observable through normal reads; it
/// marks a declared variable slot that has not been assigned yet.
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    Nil,
    Undefined,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Nil => "nil",
            Value::Undefined => "",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Nil => write!(f, ""),
            Value::Undefined => unreachable!("Undefined must never reach output"),
        }
    }
}

/// `Nil` compares equal to `Nil` and to nothing else; every other pair of
/// same-tagged values compares by content. Cross-tag comparisons (other than
/// involving `Nil`) are not equal, but callers that need an operand-type
/// error instead of a silent `false` should check `same_tag` first.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

/// Ordering is defined only between two same-tagged, non-`Nil` values. Any
/// other pairing has no ordering relation, which callers must reject as an
/// operand-type error rather than treat as "unordered but fine".
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}
