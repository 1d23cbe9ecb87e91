//! In-process cache of parsed documents
//!
//! Documents are loaded at most once per file name and then served from the
//! cache for the rest of the process. There is no invalidation or expiry:
//! the backing files do not change while the application runs.
//!
//! The cache is a cheap cloneable handle. Create one and pass it to the
//! repository; clones share the same entries and the same
//! [`LifecycleGate`], so the phase is tracked per cache rather than per
//! repository.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::lifecycle::LifecycleGate;

type Entries = HashMap<String, Arc<Document>>;

/// Load-once cache of documents keyed by file name
#[derive(Debug, Clone, Default)]
pub struct DocumentCache {
    documents: Arc<Mutex<Entries>>,
    gate: LifecycleGate,
}

impl DocumentCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase gate shared by every holder of this cache
    pub fn gate(&self) -> &LifecycleGate {
        &self.gate
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>> {
        self.documents.lock().map_err(|_| Error::LockPoisoned {
            context: "document cache".to_string(),
        })
    }

    /// Get a cached document, or load and cache it if not present.
    ///
    /// The lock is held while `loader` runs, so two callers asking for the
    /// same name never load it twice. A failed load is not cached; the next
    /// call tries again.
    pub fn get_or_load<F>(&self, name: &str, loader: F) -> Result<Arc<Document>>
    where
        F: FnOnce() -> Result<Document>,
    {
        let mut documents = self.lock()?;
        if let Some(cached) = documents.get(name) {
            return Ok(Arc::clone(cached));
        }

        let document = Arc::new(loader()?);
        documents.insert(name.to_string(), Arc::clone(&document));
        Ok(document)
    }

    /// Get a value from cache without loading
    pub fn get(&self, name: &str) -> Result<Option<Arc<Document>>> {
        Ok(self.lock()?.get(name).cloned())
    }

    /// Check if a name is cached
    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.lock()?.contains_key(name))
    }

    /// Get the number of cached documents
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }
}
