pub mod builder;
pub mod error;
pub mod expression_tree;
pub mod lexer;
pub mod operator;
pub mod token;
pub mod value;

use crate::calculator::builder::ExpressionTreeBuilder;
use crate::calculator::expression_tree::Node;
use crate::calculator::value::Value;
use anyhow::{Context, Result};

/// Parses the given infix expression into an expression tree over the
/// standard arithmetic operators.
///
/// # Arguments
///
/// * `expression`: The text-representation of the infix expression.
///
/// returns: The root of the equivalent expression tree.
///
/// # Examples
///
/// ```
/// use infix_calculator::calculator;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tree = calculator::parse("2*(3-4)")?;
/// assert_eq!(tree.render_infix(), "(2 * (3 - 4))");
/// # Ok(()) }
/// ```
pub fn parse(expression: &str) -> Result<Node> {
    ExpressionTreeBuilder::with_default_operators(expression)
        .build()
        .with_context(|| format!("failed to parse expression '{}'", expression))
}

/// Parses and evaluates the given infix expression over the standard
/// arithmetic operators.
///
/// # Arguments
///
/// * `expression`: The text-representation of the infix expression.
///
/// returns: The value the expression evaluates to.
///
/// # Examples
///
/// ```
/// use infix_calculator::calculator;
/// use infix_calculator::Value;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let value = calculator::evaluate("1+2^(10-2*3)")?;
/// assert_eq!(value, Value::Number(17.0));
/// # Ok(()) }
/// ```
pub fn evaluate(expression: &str) -> Result<Value> {
    ExpressionTreeBuilder::with_default_operators(expression)
        .evaluate()
        .with_context(|| format!("failed to evaluate expression '{}'", expression))
}
