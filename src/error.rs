//! # Error Handling
//!
//! This module defines the centralized error type for `inistore`. It uses the
//! `thiserror` library to create a single `Error` enum that covers every
//! failure mode of the persistence engine, with messages that name the
//! document, section, property or path involved.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum representing all errors that can occur while
//!   parsing, looking up, generating or loading configuration documents.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the crate.
//!
//! ## Severity
//!
//! Most variants describe bad or missing *data* and are recovered locally by
//! the repository: it logs a diagnostic and hands the caller a not-found
//! result so producers can fall back to their compiled-in defaults.
//!
//! - `FileNotFound`, `MalformedDocument`, `SectionNotFound`,
//!   `PropertyNotFound` and `ValueParse` are non-fatal.
//! - `WriteFailure` is reported per file by a commit and never aborts the
//!   remaining files.
//! - `PhaseViolation` is a structural misuse of the API (a generation call
//!   after runtime reads began, a read in the middle of generation, or a
//!   runtime write) and should be treated as fatal by the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for inistore operations
#[derive(Error, Debug)]
pub enum Error {
    /// The requested document does not exist in storage.
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The document text is structurally invalid.
    ///
    /// `line` is the 1-based line number of the offending line, or `None`
    /// when the problem concerns the document as a whole (e.g. it contains
    /// no sections at all).
    #[error("Malformed document '{document}'{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    MalformedDocument {
        document: String,
        line: Option<usize>,
        message: String,
    },

    /// No section with the requested name exists in the document.
    #[error("Section [{section}] not found in '{document}'")]
    SectionNotFound { document: String, section: String },

    /// No property with the requested name exists in the section.
    #[error("Property '{property}' not found in section [{section}] of '{document}'")]
    PropertyNotFound {
        document: String,
        section: String,
        property: String,
    },

    /// An API was invoked in the wrong lifecycle phase.
    #[error("Phase violation: {operation} is not allowed while {phase}: {message}")]
    PhaseViolation {
        operation: String,
        phase: String,
        message: String,
    },

    /// Writing one document to storage failed.
    #[error("Failed to write '{}': {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A stored string could not be interpreted as the producer's value type.
    #[error("Cannot parse property '{property}' value '{value}': {message}")]
    ValueParse {
        property: String,
        value: String,
        message: String,
    },

    /// The storage configuration is invalid.
    #[error("Configuration parsing error: {message}")]
    ConfigParse { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A mutex guarding shared state has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

impl Error {
    /// True for errors that mean "no usable data" rather than misuse.
    ///
    /// Callers can use this to decide between falling back to defaults and
    /// aborting.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::FileNotFound { .. }
                | Error::MalformedDocument { .. }
                | Error::SectionNotFound { .. }
                | Error::PropertyNotFound { .. }
        )
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
