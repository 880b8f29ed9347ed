//! Parse error type for condition expressions.
//!
//! Every way an input can fail to match the grammar is a [`ParseError`].
//! Length-bound violations (field names or values longer than 16
//! characters) surface as the malformed-field/value variants rather than a
//! distinct code.

use thiserror::Error;

/// Error returned when a condition expression does not match the grammar.
///
/// The compiler never produces a partial result: on any of these the whole
/// condition is rejected and the caller chooses how to degrade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contains no tokens at all.
    #[error("condition is empty")]
    Empty,

    /// A character outside the token alphabet (letters, digits, `=`, `,`,
    /// whitespace) was found.
    #[error("unexpected character {ch:?} at byte {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset of the character in the input.
        offset: usize,
    },

    /// A word in field position does not match the identifier pattern
    /// (one letter followed by up to 15 alphanumerics).
    #[error("{0:?} is not a valid field name")]
    InvalidField(String),

    /// A word in value position exceeds the 16-character bound.
    #[error("{0:?} is not a valid value")]
    InvalidValue(String),

    /// A field name was not followed by `=` or `IN`.
    #[error("expected '=' or IN after field {0:?}")]
    ExpectedOperator(String),

    /// A comparison was followed by something other than `AND` or `OR`.
    #[error("expected AND or OR after a comparison, found {0:?}")]
    ExpectedConnective(String),

    /// The input ended in the middle of a comparison (after an operator,
    /// a comma, or a connective).
    #[error("condition ended unexpectedly")]
    UnexpectedEnd,
}
