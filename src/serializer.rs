//! Canonical text rendering of a [`Document`]
//!
//! Every section renders as its `[name]` header, one `name=value` line per
//! property and a blank separator line. A section without properties renders
//! as a header-only block.
//!
//! Rendering is the inverse of [`crate::parser::parse`] as long as no name
//! contains `=`, no value contains a line break, and no property line looks
//! like a section header. Delimiters are written as-is, never escaped.
//! Callers storing such data must encode it themselves.

use std::fmt;

use crate::document::Document;

/// Render `document` to its on-disk text
pub fn render(document: &Document) -> String {
    let mut output = String::new();

    for section in document.sections() {
        output.push('[');
        output.push_str(section.name());
        output.push_str("]\n");

        for property in section.properties() {
            output.push_str(&property.name);
            output.push('=');
            output.push_str(&property.value);
            output.push('\n');
        }

        output.push('\n');
    }

    output
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_render_empty_document() {
        assert!(render(&Document::new("Config")).is_empty());
    }

    #[test]
    fn test_render_two_sections() {
        let mut doc = Document::new("Config");
        doc.write_value("SectionName", "propertyA", "valueA");
        doc.write_value("SectionName", "propertyB", "valueB");
        doc.write_value("OtherSection", "propertyC", "valueC");

        insta::assert_snapshot!(render(&doc).trim_end(), @r"
        [SectionName]
        propertyA=valueA
        propertyB=valueB

        [OtherSection]
        propertyC=valueC
        ");
    }

    #[test]
    fn test_render_exact_bytes() {
        let mut doc = Document::new("F");
        doc.write_value("A", "k", "v");
        doc.section_mut_or_insert("Empty");
        assert_eq!(render(&doc), "[A]\nk=v\n\n[Empty]\n\n");
    }

    #[test]
    fn test_display_matches_render() {
        let mut doc = Document::new("F");
        doc.write_value("A", "k", "v");
        assert_eq!(doc.to_string(), render(&doc));
    }

    #[test]
    fn test_render_then_parse_round_trip() {
        let mut doc = Document::new("Config");
        doc.write_value("Camera", "fov", "60");
        doc.write_value("Camera", "offset", "0,1.5,-3");
        doc.section_mut_or_insert("Empty");
        doc.write_value("Shake", "enabled", "True");

        let reparsed = parse("Config", &render(&doc)).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_value_with_delimiter_survives_in_value_position() {
        // Only the first '=' splits, so '=' in values is fine; in names it is not.
        let mut doc = Document::new("F");
        doc.write_value("A", "expr", "x=1");
        let reparsed = parse("F", &render(&doc)).unwrap();
        assert_eq!(reparsed.read_value("A", "expr").unwrap(), "x=1");

        let mut bad = Document::new("F");
        bad.write_value("A", "a=b", "c");
        let reparsed = parse("F", &render(&bad)).unwrap();
        assert_ne!(reparsed, bad);
    }
}
