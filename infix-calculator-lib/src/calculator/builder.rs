use crate::calculator::error::{Error, ParseError};
use crate::calculator::expression_tree::Node;
use crate::calculator::lexer;
use crate::calculator::operator::{Associativity, Category, Operator, OperatorTable};
use crate::calculator::token::Token;
use crate::calculator::value::Value;
use std::collections::VecDeque;

/// Upper bound on accepted input, which also bounds the size (and so the
/// recursion depth) of the resulting tree.
const MAX_TOKENS: usize = 10_000;

/// Builds an expression tree from an infix expression, using a modified
/// shunting-yard algorithm.
///
/// Unlike the classic algorithm, an operator claims its first operand from
/// the front of the output queue the moment it is pushed onto the operator
/// stack, and its second when it is later popped off. This fixes every
/// operator at exactly two operands: the builder handles binary operators
/// only, even though the trees themselves can hold unary and function nodes.
///
/// A builder parses exactly one expression; [`build`](Self::build) consumes
/// it, so a tree can never be built twice from stale state.
pub struct ExpressionTreeBuilder {
    expression: String,
    table: OperatorTable,
}

/// An entry of the operator stack: either an open-parenthesis marker or an
/// operation that has claimed its first operand and awaits its second.
enum StackEntry {
    Parenthesis,
    Pending(PendingOperation),
}

struct PendingOperation {
    operator: Operator,
    first_operand: Node,
}

impl ExpressionTreeBuilder {
    pub fn new(expression: impl Into<String>, table: OperatorTable) -> ExpressionTreeBuilder {
        ExpressionTreeBuilder {
            expression: expression.into(),
            table,
        }
    }

    /// Creates a builder over the standard arithmetic operators
    /// (`^ * / + -`).
    pub fn with_default_operators(expression: impl Into<String>) -> ExpressionTreeBuilder {
        ExpressionTreeBuilder::new(expression, OperatorTable::default())
    }

    /// Tokenizes the expression and runs the construction state machine,
    /// returning the root of the expression tree.
    ///
    /// Any parse error aborts construction immediately; no partial tree is
    /// ever returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use infix_calculator::ExpressionTreeBuilder;
    /// # use anyhow::Result;
    ///
    /// # fn main() -> Result<()> {
    /// let tree = ExpressionTreeBuilder::with_default_operators("1+2").build()?;
    /// assert_eq!(tree.render_infix(), "(1 + 2)");
    /// # Ok(()) }
    /// ```
    pub fn build(self) -> Result<Node, ParseError> {
        let tokens = lexer::tokenize(&self.expression, &self.table)?;
        if tokens.len() > MAX_TOKENS {
            return Err(ParseError::ExpressionTooLarge { limit: MAX_TOKENS });
        }

        let mut output: VecDeque<Node> = VecDeque::new();
        let mut operators: Vec<StackEntry> = Vec::new();

        for token in tokens {
            match token {
                Token::Number(value) => output.push_back(Node::new_leaf(Value::Number(value))),
                Token::Text(text) => output.push_back(Node::new_leaf(Value::Text(text))),
                Token::OpenParenthesis => operators.push(StackEntry::Parenthesis),
                Token::CloseParenthesis => loop {
                    match operators.pop() {
                        None => return Err(ParseError::UnbalancedParenthesis),
                        Some(StackEntry::Parenthesis) => break,
                        Some(StackEntry::Pending(pending)) => {
                            complete_operation(pending, &mut output)?
                        }
                    }
                },
                Token::Comma => {
                    // Argument separator: completes the operations opened
                    // since the nearest parenthesis, which stays on the stack.
                    while matches!(operators.last(), Some(StackEntry::Pending(_))) {
                        if let Some(StackEntry::Pending(pending)) = operators.pop() {
                            complete_operation(pending, &mut output)?;
                        }
                    }
                }
                Token::Symbol(symbol) => {
                    let operator = self
                        .table
                        .get(&symbol)
                        .ok_or(ParseError::UnknownOperator { symbol })?
                        .clone();

                    while let Some(StackEntry::Pending(top)) = operators.last() {
                        let top_binds_first = top.operator.category() == Category::Function
                            || top.operator.precedence_gt(&operator)
                            || (top.operator.precedence_eq(&operator)
                                && top.operator.associativity() == Associativity::Left);
                        if !top_binds_first {
                            break;
                        }
                        if let Some(StackEntry::Pending(pending)) = operators.pop() {
                            complete_operation(pending, &mut output)?;
                        }
                    }

                    let first_operand = output
                        .pop_front()
                        .ok_or(ParseError::MalformedExpression)?;
                    operators.push(StackEntry::Pending(PendingOperation {
                        operator,
                        first_operand,
                    }));
                }
            }
        }

        while let Some(entry) = operators.pop() {
            match entry {
                StackEntry::Parenthesis => return Err(ParseError::UnbalancedParenthesis),
                StackEntry::Pending(pending) => complete_operation(pending, &mut output)?,
            }
        }

        let root = output.pop_front().ok_or(ParseError::MalformedExpression)?;
        if !output.is_empty() {
            return Err(ParseError::MalformedExpression);
        }
        Ok(root)
    }

    /// Builds the tree and evaluates it.
    pub fn evaluate(self) -> Result<Value, Error> {
        let tree = self.build()?;
        Ok(tree.evaluate()?)
    }
}

/// Completes a pending operation popped off the operator stack: the front
/// of the output queue becomes its second operand and the finished node is
/// enqueued at the back.
fn complete_operation(
    pending: PendingOperation,
    output: &mut VecDeque<Node>,
) -> Result<(), ParseError> {
    let second_operand = output.pop_front().ok_or(ParseError::MalformedExpression)?;
    output.push_back(Node::new_operation(
        pending.operator,
        vec![pending.first_operand, second_operand],
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::error::EvaluationError;
    use parameterized_macro::parameterized;

    fn build(expression: &str) -> Result<Node, ParseError> {
        ExpressionTreeBuilder::with_default_operators(expression).build()
    }

    fn evaluate_number(expression: &str) -> f64 {
        match ExpressionTreeBuilder::with_default_operators(expression)
            .evaluate()
            .unwrap()
        {
            Value::Number(value) => value,
            Value::Text(text) => panic!("expected a number, got '{}'", text),
        }
    }

    #[test]
    fn simple_expression_returns_correct_tree() {
        let tree = build("1+2").unwrap();

        let expected = "+\n\
                        └── 1\n\
                        └── 2";
        assert_eq!(tree.render_tree(), expected);
    }

    #[test]
    fn equal_precedence_operators_group_left_to_right() {
        let tree = build("1-2*5+4/2").unwrap();

        let expected = "+\n\
                        └── -\n    \
                        └── 1\n    \
                        └── *\n        \
                        └── 2\n        \
                        └── 5\n\
                        └── /\n    \
                        └── 4\n    \
                        └── 2";
        assert_eq!(tree.render_tree(), expected);
        assert_eq!(tree.evaluate().unwrap(), Value::Number(-2.0));
    }

    #[test]
    fn right_associative_exponent_binds_parenthesized_operand() {
        let tree = build("1+2^(10-2*3)").unwrap();

        let expected = "+\n\
                        └── 1\n\
                        └── ^\n    \
                        └── 2\n    \
                        └── -\n        \
                        └── 10\n        \
                        └── *\n            \
                        └── 2\n            \
                        └── 3";
        assert_eq!(tree.render_tree(), expected);
        assert_eq!(tree.evaluate().unwrap(), Value::Number(17.0));
    }

    #[test]
    fn exponentiation_chains_right_to_left() {
        // 2^3^2 = 2^(3^2) = 512, not (2^3)^2 = 64.
        assert_eq!(evaluate_number("2^3^2"), 512.0);
    }

    #[parameterized(
        expression = {
            "1+2", "1-2", "1+2-5", "1-2+5", "1-2-5",
            "2*3", "3/4", "2*3/3", "2/3*3", "2-3*5",
            "2*3-5", "2+3-5*2", "2",
        },
        expected = {
            3.0, -1.0, -2.0, 4.0, -6.0,
            6.0, 0.75, 2.0, 2.0, -13.0,
            1.0, -5.0, 2.0,
        }
    )]
    fn unparenthesized_expressions_evaluate_conventionally(expression: &str, expected: f64) {
        assert_eq!(evaluate_number(expression), expected);
    }

    #[parameterized(
        expression = {
            "(2)", "((2))", "(2+3)", "(2+3)-4", "(2-3)+4",
            "2-(3-4)", "2*(3-4)", "(2*(3-4))/2+8", "(2*(3-4))/(2+8)",
        },
        expected = {
            2.0, 2.0, 5.0, 1.0, 3.0,
            3.0, -2.0, 7.0, -0.2,
        }
    )]
    fn parenthesized_expressions_evaluate_conventionally(expression: &str, expected: f64) {
        assert_eq!(evaluate_number(expression), expected);
    }

    #[test]
    fn whitespace_does_not_change_the_tree() {
        assert_eq!(build("1 + 2 * 3").unwrap(), build("1+2*3").unwrap());
    }

    #[parameterized(expression = { "(2+3", "2+3)", "(", ")" })]
    fn unbalanced_parenthesis_is_rejected(expression: &str) {
        let error = build(expression).unwrap_err();

        assert_eq!(error, ParseError::UnbalancedParenthesis);
    }

    #[parameterized(expression = { "1++2", "+2", "", "1 2", "1+", "()" })]
    fn malformed_expression_is_rejected(expression: &str) {
        let error = build(expression).unwrap_err();

        assert_eq!(error, ParseError::MalformedExpression);
    }

    #[parameterized(expression = { "1,2", "(1,2)+3", "(1+2,3)" })]
    fn comma_separated_operands_cannot_form_a_tree(expression: &str) {
        // A comma completes the operations opened since the nearest
        // parenthesis, so without function operators it always leaves
        // more than one subtree in the output queue.
        let error = build(expression).unwrap_err();

        assert_eq!(error, ParseError::MalformedExpression);
    }

    #[test]
    fn division_by_zero_surfaces_at_evaluation() {
        let error = ExpressionTreeBuilder::with_default_operators("1/(2-2)")
            .evaluate()
            .unwrap_err();

        assert_eq!(
            error,
            Error::Evaluation(EvaluationError::DivisionByZero)
        );
    }

    #[test]
    fn rendered_infix_parses_back_to_an_equal_tree() {
        let tree = build("1-2*5+4/2").unwrap();

        let reparsed = build(&tree.render_infix()).unwrap();

        assert_eq!(reparsed, tree);
        assert_eq!(reparsed.render_infix(), tree.render_infix());
    }

    #[test]
    fn negative_literals_parse_in_operand_position() {
        assert_eq!(evaluate_number("-2*3"), -6.0);
        assert_eq!(evaluate_number("1 - -2"), 3.0);
    }

    #[test]
    fn table_redefining_associativity_changes_grouping() {
        let mut operators = Vec::new();
        for symbol in ["+", "-", "/"] {
            operators.push(OperatorTable::default().get(symbol).unwrap().clone());
        }
        // A right-associative '*' groups 2*3*4 as 2*(3*4).
        operators.push(Operator::new(
            "*",
            standard_multiply,
            Category::Binary,
            Associativity::Right,
            3,
        ));
        let table = OperatorTable::new(operators);

        let tree = ExpressionTreeBuilder::new("2*3*4", table).build().unwrap();

        let expected = "*\n\
                        └── 2\n\
                        └── *\n    \
                        └── 3\n    \
                        └── 4";
        assert_eq!(tree.render_tree(), expected);
    }

    fn standard_multiply(operands: &[Value]) -> Result<Value, EvaluationError> {
        match operands {
            [Value::Number(a), Value::Number(b)] => Ok(Value::Number(a * b)),
            _ => Err(EvaluationError::TypeMismatch {
                operator: "*".to_string(),
                operands: String::new(),
            }),
        }
    }

    #[test]
    fn oversized_input_is_rejected_before_building() {
        let expression = "1+".repeat(MAX_TOKENS) + "1";

        let error = build(&expression).unwrap_err();

        assert_eq!(error, ParseError::ExpressionTooLarge { limit: MAX_TOKENS });
    }
}
