//! # inistore
//!
//! A small persistence engine for human-editable configuration files in a
//! sectioned `name=value` text format:
//!
//! ```text
//! [Camera]
//! fov=60
//! offset=0,1.5,-3
//!
//! [Shake]
//! threshold=2.5
//! ```
//!
//! Configuration is produced once, at packaging time, by many independent
//! producers that each own one section of one file. At startup the same
//! producers read their sections back. A running application never rewrites
//! its own configuration; it is either regenerated or edited by hand in the
//! deployed file.
//!
//! ## Quick Example
//!
//! ```
//! use inistore::cache::DocumentCache;
//! use inistore::config::StorageConfig;
//! use inistore::document::PropertyMap;
//! use inistore::repository::ConfigRepository;
//! use inistore::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//!
//! // Packaging step: merge and write.
//! let mut generator = ConfigRepository::with_store(
//!     StorageConfig::default(),
//!     "assets".into(),
//!     Box::new(store.clone()),
//!     DocumentCache::new(),
//! );
//! generator.begin_generation().unwrap();
//! let mut camera = PropertyMap::new();
//! camera.insert("fov".to_string(), "60".to_string());
//! generator.merge_section("Config", "Camera", &camera).unwrap();
//! let target = generator.runtime_dir().to_path_buf();
//! let report = generator.commit_generation(&target).unwrap();
//! assert_eq!(report.written_count(), 1);
//!
//! // Startup: read back.
//! let mut runtime = ConfigRepository::with_store(
//!     StorageConfig::default(),
//!     "assets".into(),
//!     Box::new(store),
//!     DocumentCache::new(),
//! );
//! let camera = runtime.read_section("Config", "Camera").unwrap().unwrap();
//! assert_eq!(camera["fov"], "60");
//! ```
//!
//! ## Core Concepts
//!
//! - **Documents (`document`)**: ordered sections of ordered string
//!   properties, with find-or-create and upsert writes.
//! - **Text format (`parser`, `serializer`)**: line-oriented parsing and
//!   canonical rendering, inverse of each other for legal documents.
//! - **Repository (`repository`)**: generation-time merging and committing,
//!   runtime cached reads.
//! - **Lifecycle (`lifecycle`)**: keeps the two phases from interleaving.
//! - **Producers (`producer`, `values`)**: the capability the repository
//!   talks to, plus ready-made typed single-value producers.
//! - **Storage (`config`, `storage`, `cache`)**: where files live, how they
//!   are read and written, and the load-once document cache.

pub mod cache;
pub mod config;
pub mod defaults;
pub mod document;
pub mod error;
pub mod lifecycle;
pub mod parser;
pub mod producer;
pub mod repository;
pub mod serializer;
pub mod storage;
pub mod values;

#[cfg(test)]
mod roundtrip_proptest;
