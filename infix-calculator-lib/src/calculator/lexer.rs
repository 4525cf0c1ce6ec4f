use crate::calculator::error::ParseError;
use crate::calculator::operator::OperatorTable;
use crate::calculator::token::Token;

/// Splits the given expression into tokens against the symbols of the
/// active operator table.
///
/// The token grammar is `NUMBER | TEXT | OPERATOR-SYMBOL | '(' | ')' | ','`.
/// Whitespace separates tokens and is otherwise discarded. Punctuation
/// operator symbols are matched longest-first; alphabetic symbols (such as
/// `max`) are matched as whole words and must exist in the table. Literals
/// are parsed strictly: anything that is not a number, a quoted text or a
/// known symbol is an error carrying its character position.
///
/// # Arguments
///
/// * `expression`: The text-representation of the infix expression.
/// * `table`: The operators whose symbols are reserved in the expression.
///
/// returns: The tokens of the expression, in source order.
pub fn tokenize(expression: &str, table: &OperatorTable) -> Result<Vec<Token>, ParseError> {
    let characters: Vec<char> = expression.chars().collect();
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < characters.len() {
        let character = characters[position];

        if character.is_whitespace() {
            position += 1;
            continue;
        }

        match character {
            '(' => {
                tokens.push(Token::OpenParenthesis);
                position += 1;
            }
            ')' => {
                tokens.push(Token::CloseParenthesis);
                position += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                position += 1;
            }
            '\'' => {
                let (text, next) = read_text(&characters, position)?;
                tokens.push(Token::Text(text));
                position = next;
            }
            _ => {
                // A '-' directly before a digit is a numeric sign only in
                // operand position; everywhere else it is an operator.
                if character == '-'
                    && expects_operand(tokens.last())
                    && next_is_digit(&characters, position + 1)
                {
                    let (literal, next) = read_number(&characters, position + 1);
                    let value = parse_number(&literal, position)?;
                    tokens.push(Token::Number(-value));
                    position = next;
                } else if let Some(symbol) = match_symbol(&characters, position, table) {
                    position += symbol.chars().count();
                    tokens.push(Token::Symbol(symbol));
                } else if character.is_ascii_digit() {
                    let (literal, next) = read_number(&characters, position);
                    tokens.push(Token::Number(parse_number(&literal, position)?));
                    position = next;
                } else if character.is_alphabetic() {
                    let (word, next) = read_word(&characters, position);
                    if table.contains(&word) {
                        tokens.push(Token::Symbol(word));
                        position = next;
                    } else {
                        return Err(ParseError::UnknownOperator { symbol: word });
                    }
                } else {
                    return Err(ParseError::UnrecognizedCharacter {
                        character,
                        position,
                    });
                }
            }
        }
    }

    Ok(tokens)
}

/// True when the next token can only be an operand.
fn expects_operand(last: Option<&Token>) -> bool {
    matches!(
        last,
        None | Some(Token::Symbol(_)) | Some(Token::OpenParenthesis) | Some(Token::Comma)
    )
}

fn next_is_digit(characters: &[char], position: usize) -> bool {
    characters
        .get(position)
        .map_or(false, |character| character.is_ascii_digit())
}

/// Greedily matches one of the table's punctuation symbols at the given
/// position. Word-like symbols are left to the identifier path so that
/// e.g. `maxi` is never split into `max` + `i`.
fn match_symbol(characters: &[char], position: usize, table: &OperatorTable) -> Option<String> {
    for symbol in table.symbols_by_length() {
        if symbol.starts_with(|c: char| c.is_alphabetic()) {
            continue;
        }
        if matches_at(characters, position, symbol) {
            return Some(symbol.to_string());
        }
    }
    None
}

fn matches_at(characters: &[char], position: usize, symbol: &str) -> bool {
    let mut index = position;
    for expected in symbol.chars() {
        if characters.get(index) != Some(&expected) {
            return false;
        }
        index += 1;
    }
    true
}

/// Reads digits with an optional fractional part, returning the literal
/// text and the position directly after it.
fn read_number(characters: &[char], start: usize) -> (String, usize) {
    let mut literal = String::new();
    let mut position = start;

    while next_is_digit(characters, position) {
        literal.push(characters[position]);
        position += 1;
    }
    if characters.get(position) == Some(&'.') && next_is_digit(characters, position + 1) {
        literal.push('.');
        position += 1;
        while next_is_digit(characters, position) {
            literal.push(characters[position]);
            position += 1;
        }
    }

    (literal, position)
}

fn parse_number(literal: &str, position: usize) -> Result<f64, ParseError> {
    literal
        .parse::<f64>()
        .map_err(|_| ParseError::UnrecognizedCharacter {
            character: literal.chars().next().unwrap_or(' '),
            position,
        })
}

fn read_word(characters: &[char], start: usize) -> (String, usize) {
    let mut word = String::new();
    let mut position = start;

    while let Some(character) = characters.get(position) {
        if !character.is_alphanumeric() && *character != '_' {
            break;
        }
        word.push(*character);
        position += 1;
    }

    (word, position)
}

/// Reads a single-quoted text literal, returning its contents and the
/// position directly after the closing quote.
fn read_text(characters: &[char], start: usize) -> Result<(String, usize), ParseError> {
    let mut text = String::new();
    let mut position = start + 1;

    while let Some(character) = characters.get(position) {
        if *character == '\'' {
            return Ok((text, position + 1));
        }
        text.push(*character);
        position += 1;
    }

    Err(ParseError::UnterminatedText { position: start })
}
