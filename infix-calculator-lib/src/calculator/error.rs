use thiserror::Error;

/// An error detected while tokenizing or while running the construction
/// state machine. Construction aborts on the first of these; no partial
/// tree is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unrecognized character '{character}' at position {position}")]
    UnrecognizedCharacter { character: char, position: usize },

    #[error("unterminated text literal starting at position {position}")]
    UnterminatedText { position: usize },

    #[error("unknown operator '{symbol}'")]
    UnknownOperator { symbol: String },

    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,

    #[error("malformed expression")]
    MalformedExpression,

    #[error("expression exceeds the maximum of {limit} tokens")]
    ExpressionTooLarge { limit: usize },
}

/// A domain failure inside an operator's computation, surfaced only when
/// evaluation reaches the failing node.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("operator '{operator}' cannot be applied to [{operands}]")]
    TypeMismatch { operator: String, operands: String },
}

/// Umbrella error for operations that both parse and evaluate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}
