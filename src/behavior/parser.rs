//! Line-oriented parser for behavior files.
//!
//! Produces ordered sections of ordered properties and knows nothing about
//! what the keys mean. Grammar, per trimmed line:
//! - blank, `#…` or `;…` lines are skipped
//! - `[name]` opens a section
//! - `key = value` (split at the first `=`) appends a property
//! - anything else is dropped

use std::io::{BufRead, Cursor};

use thiserror::Error;

/// Name of the implicit leading section.
pub const DEFAULT_SECTION: &str = "default";

/// A single `key = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub line_index: u64,
}

/// A `[name]` block and its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub properties: Vec<Property>,
    /// 1-based line of the header; 0 for the implicit default section.
    pub line_index: u64,
}

impl Section {
    fn new(name: impl Into<String>, line_index: u64) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            line_index,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty section name")]
    EmptySectionName,

    #[error("empty key in section [{section}]")]
    EmptyKey { section: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Parse behavior text from any buffered reader.
///
/// With `allow_duplicate_sections` off, a repeated header appends into the
/// first section of that name; with it on, every header opens a new section.
pub fn parse<R: BufRead>(reader: R, allow_duplicate_sections: bool) -> Result<Vec<Section>, ParseError> {
    let mut sections = vec![Section::new(DEFAULT_SECTION, 0)];
    let mut current = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_index = index as u64 + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = inner.trim();
            if name.is_empty() {
                return Err(ParseError::EmptySectionName);
            }

            let existing = if allow_duplicate_sections {
                None
            } else {
                sections.iter().position(|s| s.name == name)
            };

            current = match existing {
                Some(position) => position,
                None => {
                    sections.push(Section::new(name, line_index));
                    sections.len() - 1
                }
            };
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                return Err(ParseError::EmptyKey {
                    section: sections[current].name.clone(),
                });
            }
            sections[current].properties.push(Property {
                name: key.to_string(),
                value: value.trim().to_string(),
                line_index,
            });
        }
    }

    Ok(sections)
}

/// Convenience wrapper for in-memory text.
pub fn parse_str(text: &str, allow_duplicate_sections: bool) -> Result<Vec<Section>, ParseError> {
    parse(Cursor::new(text), allow_duplicate_sections)
}
