//! Property-based tests for the text format.
//!
//! These tests use proptest to generate documents through the public write
//! operations and verify that rendering and parsing stay inverse to each
//! other.

#[cfg(test)]
mod proptest_tests {
    use crate::document::{Document, PropertyMap};
    use crate::parser::parse;
    use crate::serializer::render;
    use proptest::prelude::*;

    // Names and values free of delimiters, line breaks and surrounding
    // whitespace: the documented legal alphabet.
    fn name() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.-]{1,12}"
    }

    fn value() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.,:/ -]{0,16}"
    }

    fn merges() -> impl Strategy<Value = Vec<(String, PropertyMap)>> {
        prop::collection::vec(
            (name(), prop::collection::btree_map(name(), value(), 0..6)),
            1..6,
        )
    }

    fn build(merges: &[(String, PropertyMap)]) -> Document {
        let mut doc = Document::new("Generated");
        for (section, properties) in merges {
            doc.write_values(section, properties);
        }
        doc
    }

    proptest! {
        /// Property: parse(render(doc)) == doc for documents built by merges
        #[test]
        fn render_then_parse_is_identity(merges in merges()) {
            let doc = build(&merges);
            let reparsed = parse("Generated", &render(&doc)).unwrap();
            prop_assert_eq!(reparsed, doc);
        }

        /// Property: rendering is deterministic and stable across a round trip
        #[test]
        fn render_is_stable(merges in merges()) {
            let doc = build(&merges);
            let first = render(&doc);
            let second = render(&parse("Generated", &first).unwrap());
            prop_assert_eq!(first, second);
        }

        /// Property: merging the same map twice changes nothing
        #[test]
        fn merging_twice_is_idempotent(merges in merges()) {
            let once = build(&merges);
            let mut twice = once.clone();
            for (section, properties) in &merges {
                twice.write_values(section, properties);
            }
            prop_assert_eq!(once, twice);
        }

        /// Property: no section or property name repeats after merges
        #[test]
        fn merges_never_duplicate_names(merges in merges()) {
            let doc = build(&merges);
            let mut sections: Vec<&str> = doc.sections().iter().map(|s| s.name()).collect();
            let total = sections.len();
            sections.sort_unstable();
            sections.dedup();
            prop_assert_eq!(sections.len(), total);

            for section in doc.sections() {
                let mut names: Vec<&str> =
                    section.properties().iter().map(|p| p.name.as_str()).collect();
                let total = names.len();
                names.sort_unstable();
                names.dedup();
                prop_assert_eq!(names.len(), total);
            }
        }
    }
}
