use crate::calculator::error::EvaluationError;
use crate::calculator::value::Value;
use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The computation an operator performs on its evaluated operands.
///
/// A plain function pointer keeps [`Operator`] cheap to clone and
/// comparable by its descriptive fields.
pub type ApplyFn = fn(&[Value]) -> Result<Value, EvaluationError>;

/// How many operands an operator takes, and how it is written in infix form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Category {
    Unary,
    Binary,
    Function,
}

/// For equal-precedence operators, whether grouping proceeds
/// left-to-right or right-to-left.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
    None,
}

/// An immutable descriptor of a mathematical operator.
#[derive(Debug, Clone)]
pub struct Operator {
    symbol: String,
    apply: ApplyFn,
    category: Category,
    associativity: Associativity,
    precedence: u8,
}

impl Operator {
    pub fn new(
        symbol: impl Into<String>,
        apply: ApplyFn,
        category: Category,
        associativity: Associativity,
        precedence: u8,
    ) -> Operator {
        Operator {
            symbol: symbol.into(),
            apply,
            category,
            associativity,
            precedence,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn associativity(&self) -> Associativity {
        self.associativity
    }

    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    pub(crate) fn precedence_gt(&self, other: &Self) -> bool {
        self.precedence.gt(&other.precedence)
    }

    pub(crate) fn precedence_eq(&self, other: &Self) -> bool {
        self.precedence.eq(&other.precedence)
    }

    /// Applies the operator's computation to the given evaluated operands.
    ///
    /// The caller supplies exactly the children present in the tree; arity is
    /// established at construction time, not re-checked here. Domain failures
    /// of the underlying computation propagate unchanged.
    pub fn apply(&self, operands: &[Value]) -> Result<Value, EvaluationError> {
        (self.apply)(operands)
    }
}

impl PartialEq for Operator {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.category == other.category
            && self.associativity == other.associativity
            && self.precedence == other.precedence
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// The set of operators known to a builder, keyed by symbol.
///
/// Each builder owns its table, so builders with different tables (even ones
/// redefining the same symbol) can coexist. Tables are never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    operators: HashMap<String, Operator>,
}

impl OperatorTable {
    pub fn new(operators: impl IntoIterator<Item = Operator>) -> OperatorTable {
        OperatorTable {
            operators: operators
                .into_iter()
                .map(|operator| (operator.symbol().to_string(), operator))
                .collect(),
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&Operator> {
        self.operators.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.operators.contains_key(symbol)
    }

    /// All symbols, longest first, so the tokenizer can match greedily.
    pub fn symbols_by_length(&self) -> Vec<&str> {
        self.operators
            .keys()
            .map(String::as_str)
            .sorted_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)))
            .collect()
    }
}

impl Default for OperatorTable {
    fn default() -> OperatorTable {
        OperatorTable::new([
            Operator::new("^", exponentiate, Category::Binary, Associativity::Right, 4),
            Operator::new("*", multiply, Category::Binary, Associativity::Left, 3),
            Operator::new("/", divide, Category::Binary, Associativity::Left, 3),
            Operator::new("+", add, Category::Binary, Associativity::Left, 2),
            Operator::new("-", subtract, Category::Binary, Associativity::Left, 2),
        ])
    }
}

fn type_mismatch(symbol: &str, operands: &[Value]) -> EvaluationError {
    EvaluationError::TypeMismatch {
        operator: symbol.to_string(),
        operands: operands.iter().map(Value::to_string).join(", "),
    }
}

fn add(operands: &[Value]) -> Result<Value, EvaluationError> {
    match operands {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a + b)),
        [Value::Text(a), Value::Text(b)] => Ok(Value::Text(format!("{}{}", a, b))),
        _ => Err(type_mismatch("+", operands)),
    }
}

fn subtract(operands: &[Value]) -> Result<Value, EvaluationError> {
    match operands {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a - b)),
        _ => Err(type_mismatch("-", operands)),
    }
}

fn multiply(operands: &[Value]) -> Result<Value, EvaluationError> {
    match operands {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a * b)),
        _ => Err(type_mismatch("*", operands)),
    }
}

fn divide(operands: &[Value]) -> Result<Value, EvaluationError> {
    match operands {
        [Value::Number(_), Value::Number(b)] if *b == 0.0 => Err(EvaluationError::DivisionByZero),
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a / b)),
        _ => Err(type_mismatch("/", operands)),
    }
}

fn exponentiate(operands: &[Value]) -> Result<Value, EvaluationError> {
    match operands {
        [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a.powf(*b))),
        _ => Err(type_mismatch("^", operands)),
    }
}
