// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! File-level diff entries between a commit and its first parent

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of change recorded for a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// File did not exist in the parent
    Added,
    /// File content changed in place
    Modified,
    /// File was removed
    Deleted,
    /// File moved to a new path
    Renamed,
}

impl ChangeKind {
    /// Single-letter code as printed by `git diff --name-status`
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
        }
    }

    /// Map a `git2` delta status onto a change kind
    ///
    /// Copies are reported as additions of the new path; type changes and
    /// other in-place statuses are reported as modifications.
    #[must_use]
    pub fn from_delta(delta: git2::Delta) -> Self {
        match delta {
            git2::Delta::Added | git2::Delta::Copied | git2::Delta::Untracked => Self::Added,
            git2::Delta::Deleted => Self::Deleted,
            git2::Delta::Renamed => Self::Renamed,
            _ => Self::Modified,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
        };
        f.write_str(name)
    }
}

/// A single file-level change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    /// Change kind reported by git
    pub kind: ChangeKind,
    /// Path on the parent side; absent for added files
    pub old_path: Option<String>,
    /// Path on the commit side; absent for deleted files
    pub new_path: Option<String>,
    /// Lines added in this file
    pub insertions: usize,
    /// Lines removed from this file
    pub deletions: usize,
}

impl DiffEntry {
    /// An added file
    #[must_use]
    pub fn added(path: impl Into<String>) -> Self {
        Self::new(ChangeKind::Added, None, Some(path.into()))
    }

    /// A file modified in place
    #[must_use]
    pub fn modified(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ChangeKind::Modified, Some(path.clone()), Some(path))
    }

    /// A deleted file
    #[must_use]
    pub fn deleted(path: impl Into<String>) -> Self {
        Self::new(ChangeKind::Deleted, Some(path.into()), None)
    }

    /// A file moved from `from` to `to`
    #[must_use]
    pub fn renamed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(ChangeKind::Renamed, Some(from.into()), Some(to.into()))
    }

    fn new(kind: ChangeKind, old_path: Option<String>, new_path: Option<String>) -> Self {
        Self {
            kind,
            old_path,
            new_path,
            insertions: 0,
            deletions: 0,
        }
    }

    /// Attach per-file line counts
    #[must_use]
    pub fn with_line_stats(mut self, insertions: usize, deletions: usize) -> Self {
        self.insertions = insertions;
        self.deletions = deletions;
        self
    }

    /// The most relevant path: the new side if present, else the old side
    #[must_use]
    pub fn path(&self) -> &str {
        self.new_path
            .as_deref()
            .or(self.old_path.as_deref())
            .unwrap_or("<unknown>")
    }

    /// Terse machine-readable form: `"<code> <path>"`
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("{} {}", self.kind.code(), self.path())
    }
}
