//! In-memory model of one configuration file
//!
//! A [`Document`] is an ordered list of named [`Section`]s, each an ordered
//! list of string [`Property`] pairs. Order is insertion order; it carries no
//! meaning beyond making rendered output deterministic.
//!
//! Lookups are first-match. Writes go through find-or-create and upsert, so a
//! document built only through these methods never holds two sections or two
//! properties with the same name.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Flat property mapping exchanged with producers.
///
/// Keys are sorted, so upserting a map always happens in the same order and
/// generated files are stable between runs.
pub type PropertyMap = BTreeMap<String, String>;

/// A string name/value pair
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named, ordered group of properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    name: String,
    properties: Vec<Property>,
}

impl Section {
    /// Create an empty section
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Value of the first property called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| property.value.as_str())
    }

    /// Set `name` to `value`, overwriting the existing entry in place or
    /// appending a new one.
    pub fn upsert(&mut self, name: &str, value: &str) {
        match self
            .properties
            .iter_mut()
            .find(|property| property.name == name)
        {
            Some(property) => property.value = value.to_string(),
            None => self.properties.push(Property::new(name, value)),
        }
    }

    /// Append without checking for an existing name.
    ///
    /// Only the parser uses this, to keep whatever a hand-edited file
    /// contains; lookups still see the first occurrence.
    pub(crate) fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Export the properties as a flat map (first occurrence wins)
    pub fn to_map(&self) -> PropertyMap {
        let mut map = PropertyMap::new();
        for property in &self.properties {
            map.entry(property.name.clone())
                .or_insert_with(|| property.value.clone());
        }
        map
    }
}

/// In-memory representation of one configuration file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    name: String,
    sections: Vec<Section>,
}

impl Document {
    /// Create an empty document. `name` is the file's base name without
    /// extension.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// First section called `name`
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Find the section called `name`, appending an empty one if absent
    pub fn section_mut_or_insert(&mut self, name: &str) -> &mut Section {
        let position = match self.sections.iter().position(|section| section.name == name) {
            Some(position) => position,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[position]
    }

    pub(crate) fn push_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Upsert a single property, creating the section if needed
    pub fn write_value(&mut self, section: &str, property: &str, value: &str) {
        self.section_mut_or_insert(section).upsert(property, value);
    }

    /// Upsert every entry of `values` into `section`, creating it if needed
    pub fn write_values(&mut self, section: &str, values: &PropertyMap) {
        let target = self.section_mut_or_insert(section);
        for (name, value) in values {
            target.upsert(name, value);
        }
    }

    /// Export section `name` as a flat map.
    ///
    /// Returns `None` when the section does not exist; this is a normal
    /// outcome, not an error.
    pub fn try_get_section(&self, name: &str) -> Option<PropertyMap> {
        self.section(name).map(Section::to_map)
    }

    /// Read a single value, reporting which part of the lookup failed
    pub fn read_value(&self, section: &str, property: &str) -> Result<&str> {
        let target = self.section(section).ok_or_else(|| Error::SectionNotFound {
            document: self.name.clone(),
            section: section.to_string(),
        })?;
        target.get(property).ok_or_else(|| Error::PropertyNotFound {
            document: self.name.clone(),
            section: section.to_string(),
            property: property.to_string(),
        })
    }
}
