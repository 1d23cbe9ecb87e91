//! Generation/runtime phase gate
//!
//! Documents are either *generated* (many producers merge their data, files
//! are written once) or *read* at runtime from the cache. The two must never
//! interleave within one process:
//!
//! ```text
//! Uninitialized ──begin──▶ Generating ──commit──▶ Committed
//!       │                                             │
//!       └──────────────── read ──▶ RuntimeReady ◀── read
//! ```
//!
//! Transitions only move forward. Once a runtime read has happened every
//! generation call fails, and reading while uncommitted merges are pending
//! fails too. Re-merging after a commit is allowed but logged.
//!
//! The gate is a cloneable handle. Every [`crate::cache::DocumentCache`]
//! carries one, so all repositories sharing a cache share its phase: a
//! document cached by one repository can never be regenerated through
//! another.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{error, warn};

use crate::error::{Error, Result};

/// Lifecycle phase shared by every repository on one cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Uninitialized,
    Generating,
    Committed,
    RuntimeReady,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Generating => "generating",
            Phase::Committed => "committed",
            Phase::RuntimeReady => "runtime-ready",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const RUNTIME_STARTED: &str = "runtime reads have already occurred against this cache";
const NOT_STARTED: &str = "begin_generation must be called first";

/// Enforces the one-directional phase order
#[derive(Debug, Clone, Default)]
pub struct LifecycleGate {
    phase: Arc<Mutex<Phase>>,
}

impl LifecycleGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Phase>> {
        self.phase.lock().map_err(|_| Error::LockPoisoned {
            context: "lifecycle gate".to_string(),
        })
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        match self.phase.lock() {
            Ok(phase) => *phase,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Enter the generation phase
    pub fn begin_generation(&self) -> Result<()> {
        let mut phase = self.lock()?;
        match *phase {
            Phase::Uninitialized | Phase::Generating => {
                *phase = Phase::Generating;
                Ok(())
            }
            Phase::Committed => {
                warn!("Generation restarted after a commit; files will be rewritten on the next commit");
                *phase = Phase::Generating;
                Ok(())
            }
            Phase::RuntimeReady => Err(violation(*phase, "begin_generation", RUNTIME_STARTED)),
        }
    }

    /// Check that a generation write (`operation`) is allowed and mark the
    /// working set dirty
    pub fn ensure_merge(&self, operation: &str) -> Result<()> {
        let mut phase = self.lock()?;
        match *phase {
            Phase::Generating => Ok(()),
            Phase::Committed => {
                warn!("{} after commit; call commit_generation again to persist it", operation);
                *phase = Phase::Generating;
                Ok(())
            }
            Phase::Uninitialized => Err(violation(*phase, operation, NOT_STARTED)),
            Phase::RuntimeReady => Err(violation(*phase, operation, RUNTIME_STARTED)),
        }
    }

    /// Check that a commit is allowed
    pub fn ensure_commit(&self) -> Result<()> {
        let phase = self.lock()?;
        match *phase {
            Phase::Generating | Phase::Committed => Ok(()),
            Phase::Uninitialized => Err(violation(*phase, "commit_generation", NOT_STARTED)),
            Phase::RuntimeReady => Err(violation(*phase, "commit_generation", RUNTIME_STARTED)),
        }
    }

    /// Record a successful commit
    pub fn mark_committed(&self) -> Result<()> {
        *self.lock()? = Phase::Committed;
        Ok(())
    }

    /// Check that a runtime read (`operation`) is allowed and enter the
    /// runtime phase
    pub fn enter_runtime(&self, operation: &str) -> Result<()> {
        let mut phase = self.lock()?;
        match *phase {
            Phase::Generating => Err(violation(
                *phase,
                operation,
                "uncommitted generation is in progress",
            )),
            Phase::Uninitialized | Phase::Committed | Phase::RuntimeReady => {
                *phase = Phase::RuntimeReady;
                Ok(())
            }
        }
    }

    /// Runtime writes are never allowed
    pub fn reject_runtime_write(&self, operation: &str) -> Error {
        violation(
            self.phase(),
            operation,
            "a running instance never rewrites its own configuration; edit the deployed file or regenerate",
        )
    }
}

fn violation(phase: Phase, operation: &str, message: &str) -> Error {
    error!(
        "Phase violation: {} called while {}: {}",
        operation, phase, message
    );
    Error::PhaseViolation {
        operation: operation.to_string(),
        phase: phase.to_string(),
        message: message.to_string(),
    }
}
