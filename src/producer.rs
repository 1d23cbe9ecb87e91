//! Producer capability
//!
//! A producer is any component that owns a section of configuration: it
//! exports its current values as a flat map during generation and imports
//! them back once at startup. The repository depends only on this trait,
//! never on concrete producer types.

use crate::document::PropertyMap;
use crate::error::Result;

/// A component that contributes one section to one configuration file
pub trait IniProducer {
    /// Name of the section this producer owns. Must be unique within its file.
    fn section_name(&self) -> &str;

    /// Base name (no extension) of the file the section belongs to
    fn file_name(&self) -> String;

    /// Current values, formatted as strings
    fn export_properties(&self) -> PropertyMap;

    /// Replace current values with ones read from storage.
    ///
    /// On error the producer must keep its previous values.
    fn import_properties(&mut self, properties: &PropertyMap) -> Result<()>;
}
