//! INI field description to JSON configuration schema conversion.
//!
//! The firmware's web GUI is driven by a JSON array of field objects with
//! no hierarchy; fields are grouped visually by their `category` and a
//! group is shown if at least one of its fields is visible. This module
//! converts the hand-maintained INI description of those fields into that
//! array.
//!
//! Per-field visibility conditions are compiled with [`condlang`]. A
//! condition that fails to parse is logged and dropped — the field is then
//! unconditionally visible — so one malformed condition never aborts the
//! conversion of the remaining fields.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use condlang::Condition;
use indexmap::IndexMap;

use crate::schema::field::{Field, ListEntry, ListSpec};
use crate::schema::ini::{IniFile, Section};

/// GUI field model shared with the page scaffold generator.
pub mod field;

/// Order-preserving INI description file reader.
pub mod ini;

/// Arguments for the `schema` subcommand.
#[derive(Debug, clap::Args)]
pub struct SchemaArgs {
    /// Field description file to read
    #[arg(short, long)]
    pub config: PathBuf,

    /// JSON file to generate (stdout if omitted)
    #[arg(short, long)]
    pub json: Option<PathBuf>,

    /// Overwrite an existing output file
    #[arg(short, long)]
    pub force: bool,
}

/// Handles the `schema` subcommand.
///
/// # Errors
///
/// Returns an error if the description file cannot be read or parsed, or
/// if the output file exists and `--force` was not given.
pub fn run(args: &SchemaArgs) -> Result<()> {
    let ini = IniFile::load(&args.config)?;
    let fields = generate(&ini);

    let mut out = serde_json::to_string_pretty(&fields)?;
    out.push('\n');

    match &args.json {
        Some(path) => {
            if path.exists() && !args.force {
                bail!(
                    "json file '{}' already exists, use --force to overwrite",
                    path.display()
                );
            }
            fs::write(path, out)
                .with_context(|| format!("cannot write json file '{}'", path.display()))?;
            println!(
                "{}",
                format!("Wrote {} fields to {}", fields.len(), path.display())
                    .green()
                    .bold()
            );
        }
        None => print!("{out}"),
    }

    Ok(())
}

/// Converts every section of the description into a GUI field, in file
/// order.
pub fn generate(ini: &IniFile) -> Vec<Field> {
    ini.sections().map(field_from_section).collect()
}

fn field_from_section(section: &Section) -> Field {
    let mut field = Field::new(section.name());

    for (key, value) in section.entries() {
        match key {
            "label" => field.label = Some(value.to_string()),
            "type" => field.kind = Some(value.to_string()),
            "default" => field.default = Some(value.to_string()),
            "description" => field.description = Some(value.to_string()),
            "category" => field.category = Some(value.to_string()),
            "check" => field.check = Some(value.to_string()),
            "capabilities" => field.capabilities = Some(parse_capabilities(section.name(), value)),
            "min" => field.min = parse_number(section.name(), "min", value),
            "max" => field.max = parse_number(section.name(), "max", value),
            "list" => {
                field.list = Some(ListSpec::Plain(
                    value.split(',').map(|v| v.trim().to_string()).collect(),
                ));
            }
            "dict" => field.list = Some(ListSpec::Labeled(parse_dict(section.name(), value))),
            "condition" => match Condition::parse(value) {
                Ok(cond) => field.condition = Some(cond),
                Err(err) => warn!(
                    "field '{}': dropping unparsable condition {:?}: {}",
                    section.name(),
                    value,
                    err
                ),
            },
            // Unknown properties are ignored.
            _ => {}
        }
    }

    field
}

/// `capabilities` is a comma-separated list of `key:value` pairs.
fn parse_capabilities(field: &str, value: &str) -> IndexMap<String, String> {
    let mut capabilities = IndexMap::new();
    for pair in value.split(',') {
        match pair.split_once(':') {
            Some((key, val)) => {
                capabilities.insert(key.trim().to_string(), val.trim().to_string());
            }
            None => warn!("field '{field}': ignoring malformed capability {pair:?}"),
        }
    }
    capabilities
}

/// `dict` holds one `value: label` pair per line; the GUI wants them as
/// `{"l": label, "v": value}` objects in file order.
fn parse_dict(field: &str, value: &str) -> Vec<ListEntry> {
    let mut entries: IndexMap<String, String> = IndexMap::new();
    for line in value.lines() {
        if line.len() < 3 {
            continue;
        }
        match line.split_once(':') {
            Some((key, label)) => {
                entries.insert(key.trim().to_string(), label.trim().to_string());
            }
            None => warn!("field '{field}': ignoring malformed dict line {line:?}"),
        }
    }
    entries
        .into_iter()
        .map(|(v, l)| ListEntry { l, v })
        .collect()
}

fn parse_number(field: &str, key: &str, value: &str) -> Option<serde_json::Number> {
    match value.parse() {
        Ok(number) => Some(number),
        Err(_) => {
            warn!("field '{field}': ignoring non-numeric {key} value {value:?}");
            None
        }
    }
}
