//! Grammar walk over the token stream.
//!
//! The grammar is a flat alternation with no nesting:
//!
//! ```text
//! expr       := comparison ((AND | OR) comparison)*
//! comparison := field '=' value
//!             | field 'IN' value (',' value)*
//! field      := letter alnum{0,15}
//! value      := alnum{1,16}
//! ```
//!
//! The parser consumes the entire token stream; leftover tokens are a
//! failure, never a partial match. Its output is the tagged sequence of
//! comparisons and connectives that the flattening walk in
//! [`crate::condition`] folds into AND-groups.

use crate::error::ParseError;
use crate::token::{tokenize, Token};
use crate::MAX_WORD_LEN;

/// Binary connective between two comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connective {
    And,
    Or,
}

/// The test a comparison applies to its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Test {
    /// `field = value`
    Equals(String),
    /// `field IN v1,v2,...` (at least one value)
    OneOf(Vec<String>),
}

/// One atomic test against a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Comparison {
    pub field: String,
    pub test: Test,
}

/// An element of the parsed expression sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ExprItem {
    Comparison(Comparison),
    Connective(Connective),
}

/// Parses an input line into the alternating comparison/connective
/// sequence, starting and ending on a comparison.
pub(crate) fn parse_sequence(input: &str) -> Result<Vec<ExprItem>, ParseError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut cursor = Cursor { tokens, pos: 0 };
    let mut items = Vec::new();

    loop {
        items.push(ExprItem::Comparison(cursor.comparison()?));
        match cursor.next() {
            None => break,
            Some(Token::Word(w)) if w == "AND" => {
                items.push(ExprItem::Connective(Connective::And));
            }
            Some(Token::Word(w)) if w == "OR" => {
                items.push(ExprItem::Connective(Connective::Or));
            }
            Some(other) => {
                return Err(ParseError::ExpectedConnective(other.text().to_string()));
            }
        }
    }

    Ok(items)
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    /// `field '=' value | field 'IN' value (',' value)*`
    fn comparison(&mut self) -> Result<Comparison, ParseError> {
        let field = self.field()?;

        let test = match self.next() {
            Some(Token::Equals) => Test::Equals(self.value()?),
            Some(Token::Word(w)) if w == "IN" => {
                let mut values = vec![self.value()?];
                while self.peek() == Some(&Token::Comma) {
                    self.next();
                    values.push(self.value()?);
                }
                Test::OneOf(values)
            }
            Some(_) => return Err(ParseError::ExpectedOperator(field)),
            None => return Err(ParseError::UnexpectedEnd),
        };

        Ok(Comparison { field, test })
    }

    /// One letter followed by up to 15 alphanumerics.
    fn field(&mut self) -> Result<String, ParseError> {
        match self.next() {
            Some(Token::Word(w)) => {
                let starts_with_letter = w.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
                if !starts_with_letter || w.chars().count() > MAX_WORD_LEN {
                    return Err(ParseError::InvalidField(w));
                }
                Ok(w)
            }
            Some(other) => Err(ParseError::InvalidField(other.text().to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    /// 1 to 16 alphanumerics. The scanner already guarantees the character
    /// class, so only the length bound is checked here.
    fn value(&mut self) -> Result<String, ParseError> {
        match self.next() {
            Some(Token::Word(w)) => {
                if w.chars().count() > MAX_WORD_LEN {
                    return Err(ParseError::InvalidValue(w));
                }
                Ok(w)
            }
            Some(other) => Err(ParseError::InvalidValue(other.text().to_string())),
            None => Err(ParseError::UnexpectedEnd),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<ExprItem> {
        parse_sequence(input).expect("input should parse")
    }

    #[test]
    fn test_single_equality() {
        assert_eq!(
            parse("a1=x"),
            vec![ExprItem::Comparison(Comparison {
                field: "a1".into(),
                test: Test::Equals("x".into()),
            })]
        );
    }

    #[test]
    fn test_membership_list() {
        assert_eq!(
            parse("b2 IN y,z"),
            vec![ExprItem::Comparison(Comparison {
                field: "b2".into(),
                test: Test::OneOf(vec!["y".into(), "z".into()]),
            })]
        );
    }

    #[test]
    fn test_alternating_sequence() {
        let items = parse("a1=x AND b2=y OR c3=z");
        assert_eq!(items.len(), 5);
        assert_eq!(items[1], ExprItem::Connective(Connective::And));
        assert_eq!(items[3], ExprItem::Connective(Connective::Or));
    }

    #[test]
    fn test_keywords_are_positional() {
        // "AND" is a valid field name and a valid value outside connective
        // position.
        assert_eq!(
            parse("AND=OR"),
            vec![ExprItem::Comparison(Comparison {
                field: "AND".into(),
                test: Test::Equals("OR".into()),
            })]
        );
    }

    #[test]
    fn test_connectives_are_case_sensitive() {
        assert_eq!(
            parse_sequence("a1=x and b2=y"),
            Err(ParseError::ExpectedConnective("and".into()))
        );
    }

    #[test]
    fn test_missing_operator() {
        assert_eq!(
            parse_sequence("a1 x"),
            Err(ParseError::ExpectedOperator("a1".into()))
        );
    }

    #[test]
    fn test_operator_in_field_position() {
        assert_eq!(
            parse_sequence("field AND = value"),
            Err(ParseError::ExpectedOperator("field".into()))
        );
    }

    #[test]
    fn test_unterminated_membership() {
        assert_eq!(parse_sequence("a1 IN x,"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse_sequence("a1 IN"), Err(ParseError::UnexpectedEnd));
    }

    #[test]
    fn test_trailing_connective() {
        assert_eq!(parse_sequence("a1=x AND"), Err(ParseError::UnexpectedEnd));
    }

    #[test]
    fn test_field_must_start_with_letter() {
        assert_eq!(
            parse_sequence("1a=x"),
            Err(ParseError::InvalidField("1a".into()))
        );
    }

    #[test]
    fn test_length_bounds() {
        // 16 characters is fine on both sides, 17 is not.
        let max = "a123456789012345";
        assert!(parse_sequence(&format!("{max}={max}")).is_ok());
        assert_eq!(
            parse_sequence("a1234567890123456=x"),
            Err(ParseError::InvalidField("a1234567890123456".into()))
        );
        assert_eq!(
            parse_sequence("a1=v1234567890123456x"),
            Err(ParseError::InvalidValue("v1234567890123456x".into()))
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_sequence(""), Err(ParseError::Empty));
        assert_eq!(parse_sequence("  "), Err(ParseError::Empty));
    }
}
