//! Line-oriented parser for configuration documents
//!
//! Supports:
//! - Section headers: `[section_name]`
//! - Property lines: `name=value`, split on the first `=` only
//!
//! Blank lines and lines of any other shape are skipped. There is no comment
//! syntax, quoting or escaping.
//!
//! A property line that appears before any section header has nowhere to go
//! and rejects the whole document, as does text with no sections at all.
//! Both are reported as [`Error::MalformedDocument`].

use std::path::Path;

use log::{debug, warn};

use crate::document::{Document, Property, Section};
use crate::error::{Error, Result};
use crate::storage::{DiskStore, DocumentStore};

/// Parse `content` into a document called `name`
///
/// # Errors
///
/// Returns [`Error::MalformedDocument`] if a property line precedes the first
/// section header, or if the text contains no section header.
pub fn parse(name: &str, content: &str) -> Result<Document> {
    let mut document = Document::new(name);
    let mut current: Option<Section> = None;

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(section_name) = section_header(trimmed) {
            if let Some(section) = current.take() {
                flush(&mut document, section);
            }
            current = Some(Section::new(section_name));
        } else if let Some((key, value)) = line.split_once('=') {
            let section = current.as_mut().ok_or_else(|| Error::MalformedDocument {
                document: name.to_string(),
                line: Some(line_number),
                message: format!("property '{}' appears before any section header", line),
            })?;
            if section.get(key).is_some() {
                warn!(
                    "Duplicate property '{}' in section [{}] of '{}' (line {}); the first value is used",
                    key,
                    section.name(),
                    name,
                    line_number
                );
            }
            section.push(Property::new(key, value));
        } else {
            debug!("Ignoring line {} of '{}': {}", line_number, name, line);
        }
    }

    if let Some(section) = current.take() {
        flush(&mut document, section);
    }

    if document.is_empty() {
        return Err(Error::MalformedDocument {
            document: name.to_string(),
            line: None,
            message: "document contains no sections".to_string(),
        });
    }

    Ok(document)
}

/// Read and parse the file at `path`, naming the document after its stem
pub fn parse_file(path: &Path) -> Result<Document> {
    let content = DiskStore.read(path)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse(&name, &content)
}

fn section_header(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
}

fn flush(document: &mut Document, section: Section) {
    if document.section(section.name()).is_some() {
        warn!(
            "Duplicate section [{}] in '{}'; lookups will only see the first one",
            section.name(),
            document.name()
        );
    }
    document.push_section(section);
}
