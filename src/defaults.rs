//! Default values for inistore configuration.
//!
//! This module provides centralized default values used by the storage
//! configuration and the repository, so that generation and runtime agree on
//! where documents live.

/// Subdirectory, relative to an asset root, that holds generated documents.
pub const DEFAULT_SUBDIRECTORY: &str = "Config/Settings";

/// File extension of stored documents (without the leading dot).
pub const DEFAULT_EXTENSION: &str = "ini";

/// Returns the default subdirectory as an owned string, for serde defaults.
pub fn default_subdirectory() -> String {
    DEFAULT_SUBDIRECTORY.to_string()
}

/// Returns the default extension as an owned string, for serde defaults.
pub fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}
