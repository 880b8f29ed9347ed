//! Order-preserving INI description file reader.
//!
//! The description files follow the Python `configparser` dialect:
//! `[section]` headers, `key = value` or `key: value` options with keys
//! lowercased, indented continuation lines extending the previous value,
//! and `#`/`;` full-line comments. Section order and per-section option order are significant —
//! the generated schema must follow the file for reproducible output — so
//! everything is kept in insertion order rather than hashed.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// A parsed description file: sections in file order.
#[derive(Debug, Clone, Default)]
pub struct IniFile {
    sections: Vec<Section>,
}

/// One `[section]` with its options in file order, keys lowercased.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniFile {
    /// Reads and parses a description file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<IniFile> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        IniFile::parse(&text)
            .with_context(|| format!("cannot parse config file '{}'", path.display()))
    }

    /// Parses description text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed section headers, options outside any
    /// section, options without a `=`/`:` delimiter, stray continuation
    /// lines, and duplicate sections or duplicate keys within a section.
    pub fn parse(text: &str) -> Result<IniFile> {
        let mut sections: Vec<Section> = Vec::new();

        for (index, raw) in text.lines().enumerate() {
            let lineno = index + 1;
            let line = raw.trim_end();
            let trimmed = line.trim_start();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Indented lines continue the most recent value.
            if line.starts_with([' ', '\t']) {
                let entry = sections
                    .last_mut()
                    .and_then(|s| s.entries.last_mut())
                    .ok_or_else(|| anyhow!("line {lineno}: continuation without a value"))?;
                if entry.1.is_empty() {
                    entry.1.push_str(trimmed);
                } else {
                    entry.1.push('\n');
                    entry.1.push_str(trimmed);
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix('[') {
                let name = rest
                    .strip_suffix(']')
                    .ok_or_else(|| anyhow!("line {lineno}: unterminated section header"))?
                    .trim();
                if sections.iter().any(|s| s.name == name) {
                    bail!("line {lineno}: duplicate section '{name}'");
                }
                sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            let delim = line
                .find(['=', ':'])
                .ok_or_else(|| anyhow!("line {lineno}: expected 'key = value'"))?;
            let key = line[..delim].trim().to_ascii_lowercase();
            let value = line[delim + 1..].trim().to_string();
            if key.is_empty() {
                bail!("line {lineno}: option without a key");
            }

            let section = sections
                .last_mut()
                .ok_or_else(|| anyhow!("line {lineno}: option outside any section"))?;
            if section.entries.iter().any(|(k, _)| *k == key) {
                bail!(
                    "line {lineno}: duplicate key '{key}' in section '{}'",
                    section.name
                );
            }
            section.entries.push((key, value));
        }

        Ok(IniFile { sections })
    }

    /// Sections in file order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }
}

impl Section {
    /// The section name, exactly as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Options in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Looks up an option by its lowercased key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_and_options_keep_file_order() {
        let ini = IniFile::parse(
            "[second]\n\
             b = 2\n\
             a = 1\n\
             [first]\n\
             x = 0\n",
        )
        .expect("should parse");

        let names: Vec<_> = ini.sections().map(|s| s.name()).collect();
        assert_eq!(names, ["second", "first"]);

        let keys: Vec<_> = ini
            .sections()
            .next()
            .expect("has a section")
            .entries()
            .map(|(k, _)| k.to_string())
            .collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn test_keys_are_lowercased_values_are_not() {
        let ini = IniFile::parse("[s]\nLabel = Display Label\n").expect("should parse");
        let section = ini.sections().next().expect("has a section");
        assert_eq!(section.get("label"), Some("Display Label"));
    }

    #[test]
    fn test_colon_delimiter_and_comments() {
        let ini = IniFile::parse(
            "# leading comment\n\
             [s]\n\
             ; another comment\n\
             key: value\n",
        )
        .expect("should parse");
        let section = ini.sections().next().expect("has a section");
        assert_eq!(section.get("key"), Some("value"));
    }

    #[test]
    fn test_continuation_lines_join_with_newlines() {
        let ini = IniFile::parse(
            "[s]\n\
             dict =\n\
             \t0: Fuel\n\
             \t1: Water\n",
        )
        .expect("should parse");
        let section = ini.sections().next().expect("has a section");
        assert_eq!(section.get("dict"), Some("0: Fuel\n1: Water"));
    }

    #[test]
    fn test_option_outside_section_is_an_error() {
        assert!(IniFile::parse("key = value\n").is_err());
    }

    #[test]
    fn test_duplicate_key_is_an_error() {
        assert!(IniFile::parse("[s]\nk = 1\nk = 2\n").is_err());
    }

    #[test]
    fn test_duplicate_section_is_an_error() {
        assert!(IniFile::parse("[s]\n[s]\n").is_err());
    }

    #[test]
    fn test_unterminated_header_is_an_error() {
        assert!(IniFile::parse("[s\n").is_err());
    }
}
