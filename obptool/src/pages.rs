//! Page and field schema scaffolding from firmware sources.
//!
//! The firmware registers each display page with an `extern
//! PageDescription registerPage...;` declaration in the task source, and
//! the page's own translation unit carries the registration with the GUI
//! label and the number of configurable value fields. This module scans
//! both to build the repetitive per-page part of the configuration
//! schema: a page type selector, the value fields, and the fluid type
//! selector, for every page slot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use condlang::{AndGroup, CondValue, Condition};
use indexmap::IndexMap;
use regex::Regex;

use crate::schema::field::{Field, ListEntry, ListSpec};

/// Arguments for the `pages` subcommand.
#[derive(Debug, clap::Args)]
pub struct PagesArgs {
    /// Device name, e.g. "obp60"
    #[arg(short, long, default_value = "obp60")]
    pub device: String,

    /// Number of page slots to create
    #[arg(short, long, default_value_t = 10)]
    pub pages: usize,

    /// Task source file to scan for page registrations
    #[arg(short, long, default_value = "obp60task.cpp")]
    pub source: PathBuf,

    /// Emit the array without its opening bracket, for appending to a
    /// hand-maintained config.json
    #[arg(long)]
    pub fragment: bool,
}

/// Page type preselected for each page slot; slots beyond the table fall
/// back to `OneValue`.
const DEFAULT_PAGES: [&str; 10] = [
    "Voltage",
    "WindRose",
    "OneValue",
    "TwoValues",
    "ThreeValues",
    "FourValues",
    "FourValues2",
    "Clock",
    "RollPitch",
    "Battery2",
];

/// NMEA2000 fluid types, value-compatible with PGN 127505.
const FLUID_TYPES: [(&str, &str); 7] = [
    ("Fuel (0)", "0"),
    ("Water (1)", "1"),
    ("Gray Water (2)", "2"),
    ("Live Well (3)", "3"),
    ("Oil (4)", "4"),
    ("Black Water (5)", "5"),
    ("Fuel Gasoline (6)", "6"),
];

/// Handles the `pages` subcommand.
///
/// # Errors
///
/// Returns an error if the task source or a page source cannot be read,
/// or if no pages are registered at all.
pub fn run(args: &PagesArgs) -> Result<()> {
    let pagedata = detect_pages(&args.source)?;
    info!(
        "detected {} pages in '{}'",
        pagedata.len(),
        args.source.display()
    );

    let fields = scaffold(&args.device, args.pages, &pagedata)?;
    let json = serde_json::to_string_pretty(&fields)?;
    if args.fragment {
        println!("{}", json.strip_prefix('[').unwrap_or(&json));
    } else {
        println!("{json}");
    }
    Ok(())
}

/// Scans the task source for registered pages and returns each page's GUI
/// label with its value field count, in registration order.
///
/// `PageSystem` is skipped: it is always present and not selectable. A
/// page source that registers nothing recognizable is skipped as well.
pub fn detect_pages(source: &Path) -> Result<Vec<(String, usize)>> {
    let text = fs::read_to_string(source)
        .with_context(|| format!("cannot read task source '{}'", source.display()))?;
    let dir = source.parent().unwrap_or(Path::new("."));

    let declaration =
        Regex::new(r"extern\s+PageDescription\s+register(Page\w*)").expect("pattern is static");

    let mut pages = Vec::new();
    for capture in declaration.captures_iter(&text) {
        let page = &capture[1];
        if page == "PageSystem" {
            continue;
        }

        let page_path = dir.join(format!("{page}.cpp"));
        let content = fs::read_to_string(&page_path)
            .with_context(|| format!("cannot read page source '{}'", page_path.display()))?;

        let registration = Regex::new(&format!(
            r#"(?s)PageDescription\s+register{}\s*\(\s*"([^"]+)".*?\n\s*(\d+)"#,
            regex::escape(page)
        ))
        .expect("pattern is static");

        if let Some(m) = registration.captures(&content) {
            let label = m[1].to_string();
            let count: usize = m[2]
                .parse()
                .with_context(|| format!("field count of page '{label}' is out of range"))?;
            pages.push((label, count));
        } else {
            warn!("'{}' has no readable page registration", page_path.display());
        }
    }

    Ok(pages)
}

/// Builds the schema fields for `no_of_pages` page slots from the
/// detected page data.
pub fn scaffold(
    device: &str,
    no_of_pages: usize,
    pagedata: &[(String, usize)],
) -> Result<Vec<Field>> {
    ensure!(!pagedata.is_empty(), "no display pages detected");

    // The GUI presents page types alphabetically regardless of
    // registration order.
    let mut pages: Vec<(&str, usize)> = pagedata
        .iter()
        .map(|(name, count)| (name.as_str(), *count))
        .collect();
    pages.sort_unstable_by_key(|&(name, _)| name);

    let max_fields = pages.iter().map(|&(_, count)| count).max().unwrap_or(0);
    let capabilities: IndexMap<String, String> =
        IndexMap::from([(device.to_lowercase(), "true".to_string())]);

    let mut fields = Vec::new();
    for page_no in 1..=no_of_pages {
        let category = format!("{} Page {}", device.to_uppercase(), page_no);
        let type_field = format!("page{page_no}type");

        fields.push(Field {
            label: Some("Type".into()),
            kind: Some("list".into()),
            default: Some(default_page(page_no).into()),
            description: Some(format!("Type of page for page {page_no}")),
            list: Some(ListSpec::Plain(
                pages.iter().map(|&(name, _)| name.to_string()).collect(),
            )),
            category: Some(category.clone()),
            capabilities: Some(capabilities.clone()),
            // Page slots hide when fewer pages are configured.
            condition: Some(
                (page_no..=no_of_pages)
                    .map(|visible| {
                        let mut group = AndGroup::default();
                        group.push("visiblePages", CondValue::Single(visible.to_string()));
                        group
                    })
                    .collect::<Condition>(),
            ),
            ..Field::new(type_field.clone())
        });

        for field_no in 1..=max_fields {
            fields.push(Field {
                label: Some(format!("Field {field_no}")),
                kind: Some("boatData".into()),
                default: Some(String::new()),
                description: Some(format!(
                    "The display for field {}",
                    number_words(field_no)?
                )),
                category: Some(category.clone()),
                capabilities: Some(capabilities.clone()),
                // Visible only for page types that have this many fields.
                condition: Some(
                    pages
                        .iter()
                        .filter(|&&(_, count)| count >= field_no)
                        .map(|&(name, _)| {
                            let mut group = AndGroup::default();
                            group.push(type_field.clone(), CondValue::Single(name.to_string()));
                            group
                        })
                        .collect::<Condition>(),
                ),
                ..Field::new(format!("page{page_no}value{field_no}"))
            });
        }

        let mut fluid_group = AndGroup::default();
        fluid_group.push(type_field.clone(), CondValue::Single("Fluid".into()));
        fields.push(Field {
            label: Some("Fluid type".into()),
            kind: Some("list".into()),
            default: Some("0".into()),
            description: Some("Fluid type in tank".into()),
            list: Some(ListSpec::Labeled(
                FLUID_TYPES
                    .iter()
                    .map(|&(l, v)| ListEntry {
                        l: l.to_string(),
                        v: v.to_string(),
                    })
                    .collect(),
            )),
            category: Some(category.clone()),
            capabilities: Some(capabilities.clone()),
            condition: Some(std::iter::once(fluid_group).collect()),
            ..Field::new(format!("page{page_no}fluid"))
        });
    }

    Ok(fields)
}

fn default_page(page_no: usize) -> &'static str {
    page_no
        .checked_sub(1)
        .and_then(|index| DEFAULT_PAGES.get(index))
        .copied()
        .unwrap_or("OneValue")
}

/// Spells a number from 0 to 99 in English words, e.g. 42 -> "fortytwo".
fn number_words(number: usize) -> Result<String> {
    const ONES: [&str; 20] = [
        "zero",
        "one",
        "two",
        "three",
        "four",
        "five",
        "six",
        "seven",
        "eight",
        "nine",
        "ten",
        "eleven",
        "twelve",
        "thirteen",
        "fourteen",
        "fifteen",
        "sixteen",
        "seventeen",
        "eighteen",
        "nineteen",
    ];
    const TENS: [&str; 10] = [
        "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
    ];

    ensure!(number <= 99, "only numbers from 0 to 99 can be spelled out");

    if number < 20 {
        Ok(ONES[number].to_string())
    } else if number % 10 == 0 {
        Ok(TENS[number / 10].to_string())
    } else {
        Ok(format!("{}{}", TENS[number / 10], ONES[number % 10]))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_number_words() {
        assert_eq!(number_words(0).expect("in range"), "zero");
        assert_eq!(number_words(6).expect("in range"), "six");
        assert_eq!(number_words(15).expect("in range"), "fifteen");
        assert_eq!(number_words(20).expect("in range"), "twenty");
        assert_eq!(number_words(42).expect("in range"), "fortytwo");
        assert_eq!(number_words(99).expect("in range"), "ninetynine");
        assert!(number_words(100).is_err());
    }

    #[test]
    fn test_default_page_table_and_fallback() {
        assert_eq!(default_page(1), "Voltage");
        assert_eq!(default_page(10), "Battery2");
        assert_eq!(default_page(11), "OneValue");
    }

    #[test]
    fn test_scaffold_layout() {
        let pagedata = vec![("WindRose".to_string(), 2), ("Fluid".to_string(), 1)];
        let fields = scaffold("obp60", 2, &pagedata).expect("scaffold succeeds");

        // Per page: one type field, max_fields value fields, one fluid
        // field.
        assert_eq!(fields.len(), 2 * (1 + 2 + 1));

        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "page1type",
                "page1value1",
                "page1value2",
                "page1fluid",
                "page2type",
                "page2value1",
                "page2value2",
                "page2fluid",
            ]
        );
    }

    #[test]
    fn test_scaffold_type_field() {
        let pagedata = vec![("WindRose".to_string(), 2), ("Fluid".to_string(), 1)];
        let fields = scaffold("obp60", 2, &pagedata).expect("scaffold succeeds");
        let json = serde_json::to_value(&fields).expect("fields serialize");

        assert_eq!(
            json[0],
            serde_json::json!({
                "name": "page1type",
                "label": "Type",
                "type": "list",
                "default": "Voltage",
                "description": "Type of page for page 1",
                "list": ["Fluid", "WindRose"],
                "category": "OBP60 Page 1",
                "capabilities": {"obp60": "true"},
                "condition": [{"visiblePages": "1"}, {"visiblePages": "2"}],
            })
        );

        // The last page slot is only visible when all slots are in use.
        assert_eq!(
            json[4]["condition"],
            serde_json::json!([{"visiblePages": "2"}])
        );
    }

    #[test]
    fn test_scaffold_value_fields_follow_field_counts() {
        let pagedata = vec![("WindRose".to_string(), 2), ("Fluid".to_string(), 1)];
        let fields = scaffold("obp60", 1, &pagedata).expect("scaffold succeeds");
        let json = serde_json::to_value(&fields).expect("fields serialize");

        // Field 1 exists on both page types, field 2 only on WindRose.
        assert_eq!(
            json[1]["condition"],
            serde_json::json!([{"page1type": "Fluid"}, {"page1type": "WindRose"}])
        );
        assert_eq!(
            json[2]["condition"],
            serde_json::json!([{"page1type": "WindRose"}])
        );
        assert_eq!(json[2]["description"], "The display for field two");
    }

    #[test]
    fn test_scaffold_fluid_field() {
        let pagedata = vec![("Fluid".to_string(), 1)];
        let fields = scaffold("obp40", 1, &pagedata).expect("scaffold succeeds");
        let fluid = &fields[2];
        assert_eq!(fluid.name, "page1fluid");
        let json = serde_json::to_value(fluid).expect("field serializes");
        assert_eq!(json["capabilities"], serde_json::json!({"obp40": "true"}));
        assert_eq!(json["condition"], serde_json::json!([{"page1type": "Fluid"}]));
        assert_eq!(json["list"][0], serde_json::json!({"l": "Fuel (0)", "v": "0"}));
    }

    #[test]
    fn test_scaffold_without_pages_is_an_error() {
        assert!(scaffold("obp60", 1, &[]).is_err());
    }

    #[test]
    fn test_detect_pages() {
        let dir = tempfile::tempdir().expect("tempdir");

        let task = dir.path().join("obp60task.cpp");
        let mut fh = fs::File::create(&task).expect("create task source");
        writeln!(fh, "extern PageDescription registerPageWindRose;").expect("write");
        writeln!(fh, "extern PageDescription registerPageSystem;").expect("write");
        writeln!(fh, "extern PageDescription registerPageFluid;").expect("write");
        drop(fh);

        fs::write(
            dir.path().join("PageWindRose.cpp"),
            "PageDescription registerPageWindRose(\n    \"WindRose\",\n    2,\n    true\n);\n",
        )
        .expect("write page source");
        fs::write(
            dir.path().join("PageFluid.cpp"),
            "PageDescription registerPageFluid(\n    \"Fluid\",\n    1,\n    true\n);\n",
        )
        .expect("write page source");

        let pagedata = detect_pages(&task).expect("detection succeeds");
        assert_eq!(
            pagedata,
            vec![("WindRose".to_string(), 2), ("Fluid".to_string(), 1)]
        );
    }

    #[test]
    fn test_detect_pages_missing_page_source_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let task = dir.path().join("obp60task.cpp");
        fs::write(&task, "extern PageDescription registerPageGhost;\n").expect("write");
        assert!(detect_pages(&task).is_err());
    }
}
