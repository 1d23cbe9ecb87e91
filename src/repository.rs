//! # Configuration Repository
//!
//! This module provides [`ConfigRepository`], the single entry point the host
//! application uses to generate configuration files at packaging time and to
//! read them back at startup.
//!
//! ## Design
//!
//! The repository holds two collaborators, both injected at construction:
//!
//! - a **`DocumentStore`** that reads and writes rendered text, so tests can
//!   substitute [`crate::storage::MemoryStore`] for the real disk;
//! - a **`DocumentCache`** that holds parsed documents for the runtime phase,
//!   together with the **`LifecycleGate`** that keeps generation and runtime
//!   access apart. Repositories sharing a cache share its phase.
//!
//! ## Generation
//!
//! Producers contribute `(file, section, properties)` triples through
//! [`ConfigRepository::merge_section`]. Contributions to the same file end up
//! as sibling sections of one document; contributions to the same section
//! are upserted, last writer wins per property. Nothing reaches storage until
//! [`ConfigRepository::commit_generation`] writes every document in one pass.
//!
//! ## Runtime
//!
//! [`ConfigRepository::read_section`] loads a file on first access, parses it
//! and keeps it cached for the life of the process. Missing files, malformed
//! files and missing sections are logged and reported as `Ok(None)` so the
//! caller can fall back to defaults. Only lifecycle violations are errors.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{error, info, log, warn, Level};

use crate::cache::DocumentCache;
use crate::config::StorageConfig;
use crate::document::{Document, PropertyMap};
use crate::error::{Error, Result};
use crate::lifecycle::Phase;
use crate::parser;
use crate::producer::IniProducer;
use crate::serializer::render;
use crate::storage::{DiskStore, DocumentStore};

/// Outcome of [`ConfigRepository::commit_generation`]
#[derive(Debug, Default)]
pub struct CommitReport {
    /// Paths written successfully, in working-set order
    pub written: Vec<PathBuf>,
    /// One [`Error::WriteFailure`] per file that could not be written
    pub failures: Vec<Error>,
}

impl CommitReport {
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the generation working set and a handle to the shared document cache
pub struct ConfigRepository {
    config: StorageConfig,
    runtime_dir: PathBuf,
    store: Box<dyn DocumentStore>,
    cache: DocumentCache,
    working_set: Vec<Document>,
}

impl ConfigRepository {
    /// Creates a repository reading from `config.subdirectory` below
    /// `asset_root` on the host filesystem.
    pub fn new(config: StorageConfig, asset_root: &Path, cache: DocumentCache) -> Self {
        let runtime_dir = config.config_dir(asset_root);
        Self::with_store(config, runtime_dir, Box::new(DiskStore), cache)
    }

    /// Creates a repository with a custom store, reading documents from
    /// `runtime_dir`.
    pub fn with_store(
        config: StorageConfig,
        runtime_dir: PathBuf,
        store: Box<dyn DocumentStore>,
        cache: DocumentCache,
    ) -> Self {
        Self {
            config,
            runtime_dir,
            store,
            cache,
            working_set: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.cache.gate().phase()
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn runtime_dir(&self) -> &Path {
        &self.runtime_dir
    }

    /// Where `file_name` is read from at runtime
    pub fn document_path(&self, file_name: &str) -> PathBuf {
        self.config.document_path(&self.runtime_dir, file_name)
    }

    /// Documents accumulated since generation began
    pub fn working_set(&self) -> &[Document] {
        &self.working_set
    }

    pub fn working_document(&self, file_name: &str) -> Option<&Document> {
        self.working_set.iter().find(|doc| doc.name() == file_name)
    }

    fn detail_level(&self) -> Level {
        if self.config.verbose {
            Level::Info
        } else {
            Level::Debug
        }
    }

    fn working_document_mut(&mut self, file_name: &str) -> &mut Document {
        let position = match self
            .working_set
            .iter()
            .position(|doc| doc.name() == file_name)
        {
            Some(position) => position,
            None => {
                log!(self.detail_level(), "Creating document '{}'", file_name);
                self.working_set.push(Document::new(file_name));
                self.working_set.len() - 1
            }
        };
        &mut self.working_set[position]
    }

    // ---------------------------------------------------------------------
    // Generation phase
    // ---------------------------------------------------------------------

    /// Enter the generation phase.
    ///
    /// Fails with [`Error::PhaseViolation`] once any runtime read happened.
    pub fn begin_generation(&mut self) -> Result<()> {
        self.cache.gate().begin_generation()
    }

    /// Upsert `properties` into section `section_name` of `file_name`
    pub fn merge_section(
        &mut self,
        file_name: &str,
        section_name: &str,
        properties: &PropertyMap,
    ) -> Result<()> {
        self.cache.gate().ensure_merge("merge_section")?;
        log!(
            self.detail_level(),
            "Merging {} properties into [{}] of '{}'",
            properties.len(),
            section_name,
            file_name
        );
        self.working_document_mut(file_name)
            .write_values(section_name, properties);
        Ok(())
    }

    /// Upsert a single property
    pub fn merge_value(
        &mut self,
        file_name: &str,
        section_name: &str,
        property: &str,
        value: &str,
    ) -> Result<()> {
        self.cache.gate().ensure_merge("merge_value")?;
        self.working_document_mut(file_name)
            .write_value(section_name, property, value);
        Ok(())
    }

    /// Merge everything `producer` exports into its file and section
    pub fn merge_producer(&mut self, producer: &dyn IniProducer) -> Result<()> {
        let properties = producer.export_properties();
        self.merge_section(&producer.file_name(), producer.section_name(), &properties)
    }

    /// Write every document in the working set to `target_dir`.
    ///
    /// Each document goes to `target_dir/<name>.<extension>`, replacing any
    /// existing file. A failure on one file is logged and recorded in the
    /// report; the remaining files are still attempted.
    pub fn commit_generation(&mut self, target_dir: &Path) -> Result<CommitReport> {
        self.cache.gate().ensure_commit()?;

        if self.working_set.is_empty() {
            warn!(
                "No configuration documents to write to [{}]",
                target_dir.display()
            );
        }

        let mut report = CommitReport::default();
        for document in &self.working_set {
            let path = self.config.document_path(target_dir, document.name());
            let text = render(document);
            match self.store.write(&path, &text) {
                Ok(()) => {
                    info!("Created configuration file [{}]", path.display());
                    log!(self.detail_level(), "{}\n{}", path.display(), text);
                    report.written.push(path);
                }
                Err(e) => {
                    error!("Could not write configuration file: {}", e);
                    report.failures.push(e);
                }
            }
        }

        info!(
            "Wrote {} of {} configuration files to [{}]",
            report.written_count(),
            self.working_set.len(),
            target_dir.display()
        );
        self.cache.gate().mark_committed()?;
        Ok(report)
    }

    /// Run a complete generation: merge every producer, then commit
    pub fn generate(
        &mut self,
        producers: &[&dyn IniProducer],
        target_dir: &Path,
    ) -> Result<CommitReport> {
        self.begin_generation()?;
        info!("Generating configuration from {} producers", producers.len());
        for producer in producers {
            self.merge_producer(*producer)?;
        }
        self.commit_generation(target_dir)
    }

    // ---------------------------------------------------------------------
    // Runtime phase
    // ---------------------------------------------------------------------

    /// Load `file_name` from storage, or return the cached copy.
    ///
    /// Unlike [`read_section`](Self::read_section) this surfaces why a load
    /// failed ([`Error::FileNotFound`], [`Error::MalformedDocument`]).
    pub fn load_document(&mut self, file_name: &str) -> Result<Arc<Document>> {
        self.cache.gate().enter_runtime("load_document")?;
        let path = self.document_path(file_name);
        let store = &self.store;
        self.cache.get_or_load(file_name, || {
            let text = store.read(&path)?;
            parser::parse(file_name, &text)
        })
    }

    fn load_or_log(&mut self, file_name: &str) -> Result<Option<Arc<Document>>> {
        match self.load_document(file_name) {
            Ok(document) => Ok(Some(document)),
            Err(e @ (Error::PhaseViolation { .. } | Error::LockPoisoned { .. })) => Err(e),
            Err(e) => {
                error!("Could not load configuration '{}': {}", file_name, e);
                Ok(None)
            }
        }
    }

    /// Flat copy of section `section_name` in `file_name`.
    ///
    /// Returns `Ok(None)` when the file is missing or malformed, or has no
    /// such section; each case is logged. The caller should fall back to its
    /// defaults.
    pub fn read_section(
        &mut self,
        file_name: &str,
        section_name: &str,
    ) -> Result<Option<PropertyMap>> {
        let Some(document) = self.load_or_log(file_name)? else {
            return Ok(None);
        };
        match document.try_get_section(section_name) {
            Some(properties) => {
                log!(
                    self.detail_level(),
                    "Read {} properties from [{}] of '{}'",
                    properties.len(),
                    section_name,
                    file_name
                );
                Ok(Some(properties))
            }
            None => {
                error!(
                    "Could not find section [{}] in file '{}'",
                    section_name, file_name
                );
                Ok(None)
            }
        }
    }

    /// Single value lookup; `Ok(None)` on any kind of miss
    pub fn read_value(
        &mut self,
        file_name: &str,
        section_name: &str,
        property: &str,
    ) -> Result<Option<String>> {
        let Some(document) = self.load_or_log(file_name)? else {
            return Ok(None);
        };
        match document.read_value(section_name, property) {
            Ok(value) => {
                log!(
                    self.detail_level(),
                    "Value of [{}] {} in '{}' is '{}'",
                    section_name,
                    property,
                    file_name,
                    value
                );
                Ok(Some(value.to_string()))
            }
            Err(e) => {
                error!("{}", e);
                Ok(None)
            }
        }
    }

    /// Feed `producer` its stored section.
    ///
    /// Returns `Ok(true)` if the producer imported stored values, `Ok(false)`
    /// if it kept its defaults because the data was missing or unusable.
    pub fn load_producer(&mut self, producer: &mut dyn IniProducer) -> Result<bool> {
        let file_name = producer.file_name();
        let Some(properties) = self.read_section(&file_name, producer.section_name())? else {
            error!(
                "Section [{}] missing from '{}'; the deployed file is out of date, using defaults",
                producer.section_name(),
                file_name
            );
            return Ok(false);
        };
        match producer.import_properties(&properties) {
            Ok(()) => Ok(true),
            Err(e) => {
                error!(
                    "Could not import [{}] from '{}', using defaults: {}",
                    producer.section_name(),
                    file_name,
                    e
                );
                Ok(false)
            }
        }
    }

    /// Runtime writes are disabled. Always fails with
    /// [`Error::PhaseViolation`] and leaves storage untouched.
    pub fn update_section(
        &mut self,
        file_name: &str,
        section_name: &str,
        _properties: &PropertyMap,
    ) -> Result<()> {
        Err(self.cache.gate().reject_runtime_write(&format!(
            "update_section('{}', [{}])",
            file_name, section_name
        )))
    }
}
