//! # condlang - Condition Expression Compiler
//!
//! A small compiler for the boolean mini-language used in GUI visibility
//! conditions of embedded device configuration schemas.
//!
//! A condition is a single line such as
//!
//! ```text
//! a1=x AND b2 IN y,z OR c3=w
//! ```
//!
//! i.e. a flat sequence of comparisons (equality `field=value` or membership
//! `field IN v1,v2,...`) joined left-to-right by `AND`/`OR`. There are no
//! parentheses and no precedence beyond the flattening rule: consecutive
//! `AND`-joined comparisons form one conjunction, `OR` separates
//! conjunctions. The normalized result is a disjunction of AND-groups,
//! serialized as a JSON array of objects:
//!
//! ```text
//! [{"a1":"x","b2":["y","z"]},{"c3":"w"}]
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use condlang::Condition;
//!
//! let cond = Condition::parse("page1type=Fluid").unwrap();
//! assert_eq!(cond.to_json(), r#"[{"page1type":"Fluid"}]"#);
//! ```
//!
//! ## Modules
//!
//! - [`condition`] - Normalized form and JSON serialization
//! - [`error`] - Parse error type
//!
//! Parsing is a pure function of the input string; there is no shared
//! grammar state between invocations.

/// Normalized condition form and JSON serialization.
pub mod condition;

/// Parse error type for condition expressions.
pub mod error;

mod parse;
mod token;

pub use condition::{AndGroup, CondValue, Condition};
pub use error::ParseError;

/// Current version of the condlang implementation.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum length of a field name or value, in characters.
pub const MAX_WORD_LEN: usize = 16;

/// Compiles a condition expression into its JSON-fragment text.
///
/// This is the one-shot convenience wrapper around [`Condition::parse`] and
/// [`Condition::to_json`].
///
/// # Errors
///
/// Returns a [`ParseError`] if the input does not match the grammar. The
/// caller decides how to degrade; a typical schema generator omits the
/// condition entirely and keeps processing other fields.
pub fn compile(condition: &str) -> Result<String, ParseError> {
    Ok(Condition::parse(condition)?.to_json())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_example() {
        let json = compile("a1=x AND b2 IN y,z OR c3=w").expect("condition should parse");
        assert_eq!(json, r#"[{"a1":"x","b2":["y","z"]},{"c3":"w"}]"#);
    }

    #[test]
    fn test_compile_failure_is_an_error_not_a_fragment() {
        assert!(compile("field AND = value").is_err());
    }
}
