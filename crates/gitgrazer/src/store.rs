// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Persisted record of processed commits
//!
//! The store is a JSON array of commit SHAs. It is loaded once at startup
//! and fully rewritten after every addition, so a SHA that has been marked
//! is never emitted again in a later run.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Default state file name
pub const DEFAULT_STATE_FILE: &str = "processed_commits.json";

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The state file exists but is not a JSON array of strings
    #[error("State file {path} is corrupt: {source}")]
    Corrupt {
        /// Path of the state file
        path: PathBuf,
        /// Parse failure
        source: serde_json::Error,
    },

    /// Reading or writing the state file failed
    #[error("State file {path} I/O error: {source}")]
    Io {
        /// Path of the state file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Set of processed commit SHAs backed by a JSON file
#[derive(Debug)]
pub struct ProcessedStore {
    path: PathBuf,
    processed: HashSet<String>,
}

impl ProcessedStore {
    /// Load the store from `path`
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the file cannot be parsed and
    /// `StoreError::Io` if it cannot be read.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let processed = match fs::read_to_string(&path) {
            Ok(raw) => parse_state(&raw).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashSet::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        debug!(path = %path.display(), count = processed.len(), "Loaded processed commits");
        Ok(Self { path, processed })
    }

    /// Path of the backing state file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether `sha` has already been processed
    #[must_use]
    pub fn has(&self, sha: &str) -> bool {
        self.processed.contains(sha)
    }

    /// Record `sha` as processed and rewrite the state file
    ///
    /// Marking an already-present SHA changes nothing but still persists.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the state file cannot be written. The SHA
    /// stays in memory in that case.
    pub fn mark_processed(&mut self, sha: &str) -> Result<(), StoreError> {
        self.processed.insert(sha.to_string());
        self.persist()
    }

    /// Number of processed SHAs
    #[must_use]
    pub fn len(&self) -> usize {
        self.processed.len()
    }

    /// Whether no SHA has been processed yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    /// Processed SHAs in sorted order
    #[must_use]
    pub fn sorted(&self) -> Vec<&str> {
        let mut shas: Vec<&str> = self.processed.iter().map(String::as_str).collect();
        shas.sort_unstable();
        shas
    }

    /// Write the full set through a sibling temp file and rename it into place
    fn persist(&self) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.sorted())
            .map_err(|e| io_err(io::Error::other(e)))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, json).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

/// Parse the on-disk representation into a set
///
/// Exposed for fuzzing the loader without touching the filesystem.
///
/// # Errors
///
/// Returns the `serde_json` error if `raw` is not a JSON array of strings.
pub fn parse_state(raw: &str) -> Result<HashSet<String>, serde_json::Error> {
    let shas: Vec<String> = serde_json::from_str(raw)?;
    Ok(shas.into_iter().collect())
}
