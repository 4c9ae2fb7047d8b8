//! Behavior file reload pipeline.
//!
//! Reads the behavior file, parses, compiles and, only when every step
//! succeeds, publishes the result to the registry. A failed attempt leaves
//! the active set untouched and is recorded as the last reload status.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::behavior::{compile, parse, CompileError, ParseError};
use crate::observability::metrics;
use crate::routing::Registry;

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to open behavior file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse behavior file: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to build behavior set: {0}")]
    Compile(#[from] CompileError),
}

/// Summary of a successful reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub generation: u64,
    pub behaviors: usize,
    pub has_default: bool,
}

/// What the last reload attempt did, for the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStatus {
    pub at: Option<DateTime<Utc>>,
    pub success: bool,
    pub error: Option<String>,
    pub attempts: u64,
    pub failures: u64,
}

impl Default for ReloadStatus {
    fn default() -> Self {
        Self {
            at: None,
            success: false,
            error: None,
            attempts: 0,
            failures: 0,
        }
    }
}

/// Runs parse → compile → replace against a shared registry.
#[derive(Debug)]
pub struct Reloader {
    registry: Arc<Registry>,
    allow_duplicate_sections: bool,
    status: ArcSwap<ReloadStatus>,
}

impl Reloader {
    pub fn new(registry: Arc<Registry>, allow_duplicate_sections: bool) -> Self {
        Self {
            registry,
            allow_duplicate_sections,
            status: ArcSwap::from_pointee(ReloadStatus::default()),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Reload from `path`, logging and recording the result either way.
    pub fn reload(&self, path: &Path) -> Result<ReloadOutcome, ReloadError> {
        tracing::info!(path = %path.display(), "Loading behavior file");

        let result = self.try_reload(path);
        match &result {
            Ok(outcome) => {
                tracing::info!(
                    path = %path.display(),
                    generation = outcome.generation,
                    behaviors = outcome.behaviors,
                    default = outcome.has_default,
                    "Behavior set loaded"
                );
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to reload behaviors. Keeping current behavior set."
                );
            }
        }

        metrics::record_reload(result.is_ok());
        self.record(result.as_ref().err());
        result
    }

    fn try_reload(&self, path: &Path) -> Result<ReloadOutcome, ReloadError> {
        let file = File::open(path).map_err(|source| ReloadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let sections = parse(BufReader::new(file), self.allow_duplicate_sections)?;
        let set = compile(&sections)?;

        let behaviors = set.behaviors.len();
        let has_default = set.default_behavior.is_some();
        let generation = self.registry.replace(set);

        Ok(ReloadOutcome {
            generation,
            behaviors,
            has_default,
        })
    }

    fn record(&self, error: Option<&ReloadError>) {
        self.status.rcu(|previous| {
            let failed = error.is_some();
            ReloadStatus {
                at: Some(Utc::now()),
                success: !failed,
                error: error.map(ToString::to_string),
                attempts: previous.attempts + 1,
                failures: previous.failures + u64::from(failed),
            }
        });
    }

    /// Result of the most recent reload attempt.
    pub fn status(&self) -> ReloadStatus {
        ReloadStatus::clone(&self.status.load())
    }
}
