use std::fmt;
use std::fmt::Formatter;

/// A discrete part of an expression.
#[derive(Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Text(String),
    Symbol(String),
    OpenParenthesis,
    CloseParenthesis,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Text(text) => write!(f, "'{}'", text),
            Token::Symbol(symbol) => write!(f, "{}", symbol),
            Token::OpenParenthesis => write!(f, "("),
            Token::CloseParenthesis => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
