//! Hand-written scanner for the condition grammar.
//!
//! The token alphabet is tiny: `=`, `,`, and maximal runs of ASCII
//! alphanumerics. Whitespace separates tokens and is otherwise ignored.
//! Keywords (`IN`, `AND`, `OR`) are *not* recognized here; the grammar
//! treats them positionally, so `AND` is a perfectly good field name or
//! value when it appears in operand position.

use crate::error::ParseError;

/// A single lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A maximal run of ASCII alphanumerics.
    Word(String),
    /// The literal `=`.
    Equals,
    /// The literal `,` separating membership list values.
    Comma,
}

impl Token {
    /// Text of the token as it appeared in the input, for error messages.
    pub(crate) fn text(&self) -> &str {
        match self {
            Token::Word(w) => w,
            Token::Equals => "=",
            Token::Comma => ",",
        }
    }
}

/// Splits the input into tokens.
///
/// Fails on the first character outside the token alphabet; trailing
/// garbage can therefore never survive into the parser.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '=' {
            chars.next();
            tokens.push(Token::Equals);
        } else if ch == ',' {
            chars.next();
            tokens.push(Token::Comma);
        } else if ch.is_ascii_alphanumeric() {
            let mut word = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if !c.is_ascii_alphanumeric() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else {
            return Err(ParseError::UnexpectedChar { ch, offset });
        }
    }

    Ok(tokens)
}
