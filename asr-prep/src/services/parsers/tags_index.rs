//! Reader for Shtooka `index.tags.txt` descriptor files
//!
//! The format is a sectioned key/value file:
//!
//! ```text
//! # comment
//! [GENERAL]
//! SWAC_LANG=fra
//!
//! [fra-bonjour.flac]
//! SWAC_TEXT=bonjour
//! ```
//!
//! - Whole-line comments start with `#`, `;` or `\`
//! - Keys and values are separated by the first `=` or `:`; keys are case-insensitive
//! - Indented lines continue the previous value
//! - A `[DEFAULT]` section supplies fallback values for every other section
//! - Repeated sections are merged into the first occurrence

use std::collections::HashMap;

const COMMENT_PREFIXES: [char; 3] = ['#', ';', '\\'];
const DEFAULT_SECTION: &str = "DEFAULT";

#[derive(Debug, Clone, Default)]
struct Section {
    name: String,
    values: HashMap<String, String>,
}

/// Parsed descriptor file, sections in file order
#[derive(Debug, Clone, Default)]
pub struct TagsIndex {
    sections: Vec<Section>,
    defaults: HashMap<String, String>,
}

impl TagsIndex {
    pub fn parse(content: &str) -> Self {
        let mut index = TagsIndex::default();
        // (section position or None for DEFAULT, key) of the value being continued
        let mut current: Option<Option<usize>> = None;
        let mut last_key: Option<String> = None;

        for (line_no, raw_line) in content.lines().enumerate() {
            let trimmed = raw_line.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with(COMMENT_PREFIXES) {
                continue;
            }

            let indented = raw_line.starts_with(char::is_whitespace);
            if indented {
                if let (Some(section), Some(key)) = (current, last_key.as_ref()) {
                    if let Some(value) = index.values_mut(section).get_mut(key) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                    continue;
                }
            }

            if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                current = Some(index.open_section(name));
                last_key = None;
                continue;
            }

            let Some(section) = current else {
                tracing::warn!(line = line_no + 1, "Entry before any section header ignored");
                continue;
            };

            match trimmed.find(['=', ':']) {
                Some(split) => {
                    let key = trimmed[..split].trim().to_lowercase();
                    let value = trimmed[split + 1..].trim().to_string();
                    index.values_mut(section).insert(key.clone(), value);
                    last_key = Some(key);
                }
                None => {
                    tracing::warn!(line = line_no + 1, "Line without key/value separator ignored");
                    last_key = None;
                }
            }
        }

        index
    }

    /// Section names in file order, excluding `DEFAULT`
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Value of `key` (case-insensitive) in `section`, falling back to `DEFAULT`
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = key.to_lowercase();
        self.sections
            .iter()
            .find(|s| s.name == section)
            .and_then(|s| s.values.get(&key))
            .or_else(|| self.defaults.get(&key))
            .map(String::as_str)
    }

    fn open_section(&mut self, name: &str) -> Option<usize> {
        if name == DEFAULT_SECTION {
            return None;
        }
        if let Some(position) = self.sections.iter().position(|s| s.name == name) {
            tracing::warn!(section = name, "Duplicate section merged into first occurrence");
            return Some(position);
        }
        self.sections.push(Section {
            name: name.to_string(),
            values: HashMap::new(),
        });
        Some(self.sections.len() - 1)
    }

    fn values_mut(&mut self, section: Option<usize>) -> &mut HashMap<String, String> {
        match section {
            Some(position) => &mut self.sections[position].values,
            None => &mut self.defaults,
        }
    }
}
