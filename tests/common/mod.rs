//! Shared test utilities for integration tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! let fixture = TestFixture::new().with_deployed_file("Config.ini", "[A]\nk=v\n");
//! let mut repo = fixture.runtime_repository();
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

use inistore::cache::DocumentCache;
use inistore::config::StorageConfig;
use inistore::document::PropertyMap;
use inistore::repository::ConfigRepository;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use super::{assert_ini_contains, fixtures, parse_ini, props, TestFixture};
}

/// Fixture files shipped with the tests.
#[allow(dead_code)]
pub mod fixtures {
    pub const CONFIG: &str = include_str!("../testdata/deployed/Config.ini");
    pub const STALE: &str = include_str!("../testdata/deployed/Stale.ini");
    pub const BROKEN: &str = include_str!("../testdata/deployed/Broken.ini");
}

/// Build a property map from literal pairs.
#[allow(dead_code)]
pub fn props(entries: &[(&str, &str)]) -> PropertyMap {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A temporary asset root with a build area and a deployed area.
///
/// Generation writes into `build/<subdirectory>`; runtime repositories read
/// from `deployed/<subdirectory>`. [`TestFixture::deploy`] copies the first
/// into the second, standing in for packaging.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
    config: StorageConfig,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new fixture with the default storage configuration.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
            config: StorageConfig::default(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Directory generation writes to.
    pub fn build_dir(&self) -> PathBuf {
        self.config.config_dir(&self.path().join("build"))
    }

    /// Directory runtime repositories read from.
    pub fn deployed_dir(&self) -> PathBuf {
        self.config.config_dir(&self.path().join("deployed"))
    }

    /// Place a file directly in the deployed directory.
    pub fn with_deployed_file(self, name: &str, content: &str) -> Self {
        let relative = self
            .deployed_dir()
            .strip_prefix(self.path())
            .expect("deployed dir is inside the fixture")
            .join(name);
        self.temp_dir
            .child(relative)
            .write_str(content)
            .expect("Failed to write deployed file");
        self
    }

    /// Copy every generated file into the deployed directory.
    pub fn deploy(&self) {
        std::fs::create_dir_all(self.deployed_dir()).expect("Failed to create deployed dir");
        for entry in std::fs::read_dir(self.build_dir()).expect("Failed to list build dir") {
            let entry = entry.expect("Failed to read build dir entry");
            std::fs::copy(entry.path(), self.deployed_dir().join(entry.file_name()))
                .expect("Failed to copy generated file");
        }
    }

    /// A repository for the generation phase, on disk.
    pub fn generation_repository(&self) -> ConfigRepository {
        ConfigRepository::new(
            self.config.clone(),
            &self.path().join("build"),
            DocumentCache::new(),
        )
    }

    /// A repository for the runtime phase, reading the deployed directory.
    pub fn runtime_repository(&self) -> ConfigRepository {
        ConfigRepository::new(
            self.config.clone(),
            &self.path().join("deployed"),
            DocumentCache::new(),
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses an INI file with an independent reader.
#[allow(dead_code)]
pub fn parse_ini(path: &Path) -> ini::Ini {
    ini::Ini::load_from_file(path)
        .unwrap_or_else(|e| panic!("Failed to parse INI from {}: {}", path.display(), e))
}

/// Asserts that an INI file contains a specific key-value pair in a section.
#[allow(dead_code)]
pub fn assert_ini_contains(path: &Path, section: &str, key: &str, expected: &str) {
    let ini = parse_ini(path);
    let section_data = ini
        .section(Some(section))
        .unwrap_or_else(|| panic!("INI section '{}' not found in {}", section, path.display()));

    let actual = section_data.get(key).unwrap_or_else(|| {
        panic!(
            "INI key '{}' not found in section '{}' of {}",
            key,
            section,
            path.display()
        )
    });

    assert_eq!(
        actual,
        expected,
        "INI key '{}' in section '{}' of {} has unexpected value",
        key,
        section,
        path.display()
    );
}
