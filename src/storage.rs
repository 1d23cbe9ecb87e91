//! Storage backends for rendered documents
//!
//! The repository never touches the filesystem directly. It goes through the
//! [`DocumentStore`] trait so the backend can be swapped: [`DiskStore`] is
//! used in the application, [`MemoryStore`] in tests to stage files, count
//! reads and simulate write failures without touching the disk.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Error, Result};

/// Trait for document storage - allows mocking in tests
pub trait DocumentStore: Send + Sync {
    /// Check whether a document exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the full text at `path`.
    ///
    /// Returns [`Error::FileNotFound`] if there is nothing there.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace whatever is at `path` with `contents`, creating parent
    /// directories as needed.
    ///
    /// Failures are reported as [`Error::WriteFailure`].
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
}

/// The default implementation of `DocumentStore`, backed by the host
/// filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl DocumentStore for DiskStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<String> {
        if !self.exists(path) {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_failure(path, e))?;
        }

        if path.exists() {
            clear_read_only(path).map_err(|e| write_failure(path, e))?;
            fs::remove_file(path).map_err(|e| write_failure(path, e))?;
        }

        fs::write(path, contents).map_err(|e| write_failure(path, e))
    }
}

fn write_failure(path: &Path, source: std::io::Error) -> Error {
    Error::WriteFailure {
        path: path.to_path_buf(),
        source,
    }
}

/// Make an existing file writable by its owner.
///
/// Generated files are often shipped read-only; they must still be
/// replaceable by the next generation run.
fn clear_read_only(path: &Path) -> std::io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    if !permissions.readonly() {
        return Ok(());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(not(unix))]
    {
        permissions.set_readonly(false);
    }

    fs::set_permissions(path, permissions)
}

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<PathBuf, String>,
    reads: HashMap<PathBuf, usize>,
    failing: HashSet<PathBuf>,
}

/// In-memory document store.
///
/// Clones share the same contents, so a test can hand one clone to a
/// repository and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| Error::LockPoisoned {
            context: "memory store".to_string(),
        })
    }

    /// Add or replace a file
    pub fn insert<P: AsRef<Path>>(&self, path: P, contents: &str) -> Result<()> {
        self.lock()?
            .files
            .insert(path.as_ref().to_path_buf(), contents.to_string());
        Ok(())
    }

    /// Current contents of a file
    pub fn get<P: AsRef<Path>>(&self, path: P) -> Result<Option<String>> {
        Ok(self.lock()?.files.get(path.as_ref()).cloned())
    }

    /// Number of files
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.files.len())
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.files.is_empty())
    }

    /// How many times `path` has been read, successfully or not
    pub fn read_count<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        Ok(self
            .lock()?
            .reads
            .get(path.as_ref())
            .copied()
            .unwrap_or(0))
    }

    /// Make every later write to `path` fail
    pub fn fail_writes_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.lock()?.failing.insert(path.as_ref().to_path_buf());
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn exists(&self, path: &Path) -> bool {
        self.lock()
            .map(|state| state.files.contains_key(path))
            .unwrap_or(false)
    }

    fn read(&self, path: &Path) -> Result<String> {
        let mut state = self.lock()?;
        *state.reads.entry(path.to_path_buf()).or_insert(0) += 1;
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::FileNotFound {
                path: path.to_path_buf(),
            })
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let mut state = self.lock()?;
        if state.failing.contains(path) {
            return Err(write_failure(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "simulated failure"),
            ));
        }
        state
            .files
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_disk_write_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Config/Settings/Config.ini");

        DiskStore.write(&path, "[A]\nk=v\n\n").unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[A]\nk=v\n\n");
    }

    #[test]
    fn test_disk_write_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Config.ini");
        fs::write(&path, "old content").unwrap();

        DiskStore.write(&path, "new content").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
    }

    #[test]
    fn test_disk_write_replaces_read_only_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Config.ini");
        fs::write(&path, "old content").unwrap();
        let mut permissions = fs::metadata(&path).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&path, permissions).unwrap();

        DiskStore.write(&path, "new content").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
    }

    #[test]
    fn test_disk_write_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should go cannot be replaced by a file.
        let path = temp_dir.path().join("Config.ini");
        fs::create_dir(&path).unwrap();

        let err = DiskStore.write(&path, "content").unwrap_err();
        assert!(matches!(err, Error::WriteFailure { .. }));
    }

    #[test]
    fn test_disk_read_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Missing.ini");
        assert!(!DiskStore.exists(&path));
        assert!(matches!(
            DiskStore.read(&path),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_memory_store_shared_between_clones() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.write(Path::new("a/Config.ini"), "[A]\n").unwrap();

        assert_eq!(handle.get("a/Config.ini").unwrap().as_deref(), Some("[A]\n"));
        assert_eq!(handle.len().unwrap(), 1);
        assert!(handle.exists(Path::new("a/Config.ini")));
    }

    #[test]
    fn test_memory_store_counts_reads() {
        let store = MemoryStore::new();
        store.insert("Config.ini", "[A]\n").unwrap();

        store.read(Path::new("Config.ini")).unwrap();
        store.read(Path::new("Config.ini")).unwrap();
        let _ = store.read(Path::new("Missing.ini"));

        assert_eq!(store.read_count("Config.ini").unwrap(), 2);
        assert_eq!(store.read_count("Missing.ini").unwrap(), 1);
    }

    #[test]
    fn test_memory_store_simulated_failure() {
        let store = MemoryStore::new();
        store.fail_writes_to("Broken.ini").unwrap();

        assert!(matches!(
            store.write(Path::new("Broken.ini"), "x"),
            Err(Error::WriteFailure { .. })
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_memory_store_poisoned_lock_is_reported() {
        let store = MemoryStore::new();
        let handle = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = handle.state.lock().unwrap();
            panic!("poison the store");
        })
        .join();

        assert!(matches!(
            store.insert("Config.ini", "[A]\n"),
            Err(Error::LockPoisoned { .. })
        ));
        assert!(matches!(store.get("Config.ini"), Err(Error::LockPoisoned { .. })));
        assert!(matches!(
            store.fail_writes_to("Config.ini"),
            Err(Error::LockPoisoned { .. })
        ));
        assert!(matches!(
            store.read(Path::new("Config.ini")),
            Err(Error::LockPoisoned { .. })
        ));
        assert!(!store.exists(Path::new("Config.ini")));
    }
}
