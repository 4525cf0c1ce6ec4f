use crate::calculator::error::EvaluationError;
use crate::calculator::operator::{Category, Operator};
use crate::calculator::value::Value;
use itertools::Itertools;
use std::fmt;
use std::fmt::{Display, Formatter};
use string_builder::Builder;

/// A node of an expression tree.
///
/// A node is either a leaf holding a literal value, or an operation holding
/// an [`Operator`] and an ordered, non-empty list of children. The pairing is
/// enforced by construction: leaves cannot receive children and operations
/// are only ever built with theirs. Every node exclusively owns its subtree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Value),
    Operation {
        operator: Operator,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn new_leaf(value: Value) -> Node {
        Node::Leaf(value)
    }

    pub fn new_number(value: f64) -> Node {
        Node::Leaf(Value::Number(value))
    }

    pub fn new_text(text: impl Into<String>) -> Node {
        Node::Leaf(Value::Text(text.into()))
    }

    pub fn new_operation(operator: Operator, children: Vec<Node>) -> Node {
        Node::Operation { operator, children }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Evaluates the tree bottom-up.
    ///
    /// Children are evaluated left to right, then the node's operator is
    /// applied to the results in that same order. Failures inside an
    /// operator's computation propagate unchanged; no recovery is attempted.
    pub fn evaluate(&self) -> Result<Value, EvaluationError> {
        match self {
            Node::Leaf(value) => Ok(value.clone()),
            Node::Operation { operator, children } => {
                let operands: Vec<Value> = children
                    .iter()
                    .map(Node::evaluate)
                    .collect::<Result<_, _>>()?;
                operator.apply(&operands)
            }
        }
    }

    /// Renders the tree as an indented multi-line diagnostic string.
    ///
    /// A leaf renders as its literal; an operation renders as its symbol
    /// followed by one `└── `-prefixed line per child, indented four spaces
    /// per level. Not meant to be parsed back.
    pub fn render_tree(&self) -> String {
        self.render_tree_at(0)
    }

    fn render_tree_at(&self, depth: usize) -> String {
        match self {
            Node::Leaf(value) => value.to_string(),
            Node::Operation { operator, children } => {
                let mut builder = Builder::default();
                builder.append(operator.symbol());
                let indentation = "    ".repeat(depth);
                for child in children {
                    builder.append(format!(
                        "\n{}└── {}",
                        indentation,
                        child.render_tree_at(depth + 1)
                    ));
                }
                builder.string().unwrap_or_else(|_| "Error".to_string())
            }
        }
    }

    /// Renders the tree as a fully parenthesized infix expression, the
    /// structural inverse of parsing.
    pub fn render_infix(&self) -> String {
        match self {
            Node::Leaf(value) => value.to_string(),
            Node::Operation { operator, children } => {
                match (operator.category(), children.as_slice()) {
                    (Category::Unary, [operand]) => {
                        format!("{}{}", operator, operand.render_infix())
                    }
                    (Category::Binary, [left, right]) => {
                        format!(
                            "({} {} {})",
                            left.render_infix(),
                            operator,
                            right.render_infix()
                        )
                    }
                    // Function operators, and any category whose arity does
                    // not match its infix shape, render as a call.
                    _ => {
                        let interior = children.iter().map(Node::render_infix).join(", ");
                        format!("{}({})", operator, interior)
                    }
                }
            }
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_tree())
    }
}
