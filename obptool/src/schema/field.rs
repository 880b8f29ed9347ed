//! GUI field model.
//!
//! One [`Field`] per entry of the configuration schema array. The same
//! model serves the INI converter and the page scaffold generator, so the
//! two tools cannot drift apart in the JSON they emit. Keys that are not
//! set stay out of the output entirely; in particular a field without a
//! `condition` is unconditionally visible.

use condlang::Condition;
use indexmap::IndexMap;
use serde::Serialize;

/// A single field of the GUI configuration schema.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Field {
    /// Unique field name, the INI section name or a generated page key.
    pub name: String,
    /// Display label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Editor type (`list`, `boatData`, `number`, ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Default value, stored as its textual form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Help text shown in the GUI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Lower bound for numeric editors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<serde_json::Number>,
    /// Upper bound for numeric editors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<serde_json::Number>,
    /// Choices for list editors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListSpec>,
    /// Visual grouping; a group is shown if any of its fields is visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Name of a firmware-side validation hook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    /// Device capabilities gating the field, in description order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<IndexMap<String, String>>,
    /// Compiled visibility condition; absent means always visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Field {
    /// Creates a field with only its name set.
    pub fn new(name: impl Into<String>) -> Field {
        Field {
            name: name.into(),
            ..Field::default()
        }
    }
}

/// Choices of a list editor: plain strings, or value/label pairs when the
/// stored value and the displayed text differ.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ListSpec {
    /// Stored value and display text are the same string.
    Plain(Vec<String>),
    /// Stored value `v` with display label `l`.
    Labeled(Vec<ListEntry>),
}

/// One labeled choice of a list editor.
#[derive(Debug, Clone, Serialize)]
pub struct ListEntry {
    /// Display label.
    pub l: String,
    /// Stored value.
    pub v: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_keys_stay_out_of_the_json() {
        let json = serde_json::to_string(&Field::new("bare")).expect("field serializes");
        assert_eq!(json, r#"{"name":"bare"}"#);
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let mut field = Field::new("f");
        field.kind = Some("list".into());
        let json = serde_json::to_string(&field).expect("field serializes");
        assert_eq!(json, r#"{"name":"f","type":"list"}"#);
    }

    #[test]
    fn test_list_spec_shapes() {
        let plain = ListSpec::Plain(vec!["a".into(), "b".into()]);
        assert_eq!(
            serde_json::to_string(&plain).expect("serializes"),
            r#"["a","b"]"#
        );

        let labeled = ListSpec::Labeled(vec![ListEntry {
            l: "Fuel (0)".into(),
            v: "0".into(),
        }]);
        assert_eq!(
            serde_json::to_string(&labeled).expect("serializes"),
            r#"[{"l":"Fuel (0)","v":"0"}]"#
        );
    }
}
