//! Normalized condition form and JSON serialization.
//!
//! A parsed condition is an ordered disjunction of [`AndGroup`]s. Each
//! group maps field names to constraints and must hold entirely for the
//! group to apply; the overall condition holds if any one group does.
//!
//! Serialization follows the shape expected by the configuration GUI: a
//! JSON array of objects whose values are strings, or arrays of strings
//! for membership tests with more than one value.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::ParseError;
use crate::parse::{parse_sequence, Connective, ExprItem, Test};

/// The constraint attached to one field inside an AND-group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CondValue {
    /// The field must equal this value. Membership tests with exactly one
    /// value normalize to this form; consumers never see one-element lists.
    Single(String),
    /// The field must equal one of these values (two or more, input order).
    OneOf(Vec<String>),
}

impl CondValue {
    /// Normalizes a non-empty value list: one value becomes [`Single`],
    /// two or more stay a list.
    ///
    /// [`Single`]: CondValue::Single
    pub fn from_values(mut values: Vec<String>) -> CondValue {
        if values.len() == 1 {
            CondValue::Single(values.remove(0))
        } else {
            CondValue::OneOf(values)
        }
    }
}

/// A conjunction of field constraints.
///
/// Entries keep their left-to-right input order and are *not* deduplicated:
/// a malformed input constraining the same field twice is preserved as-is,
/// and interpreting the conflict is the consumer's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndGroup {
    entries: Vec<(String, CondValue)>,
}

impl AndGroup {
    /// Appends a field constraint, keeping insertion order.
    pub fn push(&mut self, field: impl Into<String>, value: CondValue) {
        self.entries.push((field.into(), value));
    }

    /// True if the group holds no constraints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of constraints in the group.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Constraints in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CondValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// Hand-rolled so that duplicate field names survive serialization; a
// derived map type would collapse them.
impl Serialize for AndGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// A condition in normalized form: an ordered disjunction of AND-groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Condition {
    groups: Vec<AndGroup>,
}

impl Condition {
    /// Parses a condition expression into its normalized form.
    ///
    /// The parsed comparison/connective sequence is walked left to right:
    /// comparisons accumulate into the current AND-group, `AND` keeps
    /// accumulating, `OR` closes the group and opens a new one, and the
    /// final non-empty accumulator is emitted.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the input does not match the grammar.
    /// There is no partial success; the caller chooses how to degrade.
    pub fn parse(input: &str) -> Result<Condition, ParseError> {
        let items = parse_sequence(input)?;

        let mut groups = Vec::new();
        let mut current = AndGroup::default();
        for item in items {
            match item {
                ExprItem::Comparison(cmp) => {
                    let value = match cmp.test {
                        Test::Equals(v) => CondValue::Single(v),
                        Test::OneOf(vs) => CondValue::from_values(vs),
                    };
                    current.push(cmp.field, value);
                }
                ExprItem::Connective(Connective::And) => {}
                ExprItem::Connective(Connective::Or) => {
                    groups.push(std::mem::take(&mut current));
                }
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }

        Ok(Condition { groups })
    }

    /// Builds a condition directly from AND-groups, for callers that
    /// construct conditions programmatically rather than from text.
    pub fn from_groups(groups: Vec<AndGroup>) -> Condition {
        Condition { groups }
    }

    /// The AND-groups in disjunction order.
    pub fn groups(&self) -> &[AndGroup] {
        &self.groups
    }

    /// Serializes the condition to its JSON-fragment text.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("a condition serializes infallibly")
    }
}

impl FromIterator<AndGroup> for Condition {
    fn from_iter<I: IntoIterator<Item = AndGroup>>(iter: I) -> Condition {
        Condition {
            groups: iter.into_iter().collect(),
        }
    }
}
