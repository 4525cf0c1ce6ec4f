use std::fmt;
use std::fmt::{Display, Formatter};

/// A literal operand value stored in a leaf of the expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(value) => write!(f, "{}", value),
            Value::Text(text) => write!(f, "'{}'", text),
        }
    }
}
