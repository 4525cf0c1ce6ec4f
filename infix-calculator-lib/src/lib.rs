pub mod calculator;

pub use calculator::builder::ExpressionTreeBuilder;
pub use calculator::error::{Error, EvaluationError, ParseError};
pub use calculator::expression_tree::Node;
pub use calculator::operator::{Associativity, Category, Operator, OperatorTable};
pub use calculator::value::Value;
