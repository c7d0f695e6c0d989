// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Git history walking
//!
//! This module reads commits and per-file diffs from a repository using
//! the `git2` crate.

use crate::commit::Commit;
use crate::diff::{ChangeKind, DiffEntry};
use crate::error::GitError;
use chrono::{DateTime, FixedOffset};
use git2::{DiffFindOptions, DiffOptions, Patch, Repository, Sort};
use std::path::Path;
use tracing::debug;

/// Configuration for walking commits
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Maximum number of commits to retrieve
    pub limit: Option<usize>,
    /// Start from this reference (defaults to HEAD)
    pub from_ref: Option<String>,
}

impl WalkOptions {
    /// Create options for walking the N most recent commits
    #[must_use]
    pub fn latest(n: usize) -> Self {
        Self {
            limit: Some(n),
            ..Default::default()
        }
    }

    /// Set the starting reference
    #[must_use]
    pub fn from(mut self, reference: &str) -> Self {
        self.from_ref = Some(reference.to_string());
        self
    }
}

/// A git repository wrapper for reading commits
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Open a git repository at the given path
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if the path is not a git repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Discover and open a git repository containing the given path
    ///
    /// This walks up the directory tree to find a `.git` directory.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if no repository is found.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self, GitError> {
        let path = path.as_ref();
        let repo = Repository::discover(path).map_err(|_| GitError::RepositoryNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Self { repo })
    }

    /// Walk commits most-recent-first according to the given options
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the starting reference does not
    /// resolve, or another `GitError` if the history cannot be walked.
    pub fn walk_commits(&self, options: &WalkOptions) -> Result<Vec<Commit>, GitError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;

        if let Some(ref from_ref) = options.from_ref {
            let oid = self.resolve(from_ref)?.id();
            revwalk.push(oid)?;
        } else {
            revwalk.push_head()?;
        }

        let limit = options.limit.unwrap_or(usize::MAX);
        let mut commits = Vec::new();

        for oid_result in revwalk {
            if commits.len() >= limit {
                break;
            }
            let git_commit = self.repo.find_commit(oid_result?)?;
            commits.push(extract_commit(&git_commit)?);
        }

        debug!(count = commits.len(), reference = ?options.from_ref, "Walked commits");
        Ok(commits)
    }

    /// Get a single commit by SHA or reference
    ///
    /// # Errors
    ///
    /// Returns `GitError::InvalidReference` if the reference cannot be resolved.
    pub fn get_commit(&self, reference: &str) -> Result<Commit, GitError> {
        let git_commit = self.resolve(reference)?;
        extract_commit(&git_commit)
    }

    /// File-level changes of `commit` relative to its first parent
    ///
    /// Root commits are compared against the empty tree, so every file they
    /// introduce is reported as added. Renames are detected by similarity.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the commit or its trees cannot be read.
    pub fn diff_entries(&self, commit: &Commit) -> Result<Vec<DiffEntry>, GitError> {
        let git_commit = self.resolve(&commit.sha)?;
        let tree = git_commit.tree()?;
        let parent_tree = if git_commit.parent_count() > 0 {
            Some(git_commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        opts.ignore_whitespace(false);
        let mut diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        let mut find = DiffFindOptions::new();
        find.renames(true);
        diff.find_similar(Some(&mut find))?;

        let mut entries = Vec::with_capacity(diff.deltas().len());
        for (idx, delta) in diff.deltas().enumerate() {
            let kind = ChangeKind::from_delta(delta.status());
            let old_path = delta.old_file().path().map(|p| p.display().to_string());
            let new_path = delta.new_file().path().map(|p| p.display().to_string());

            let mut entry = match kind {
                ChangeKind::Added => DiffEntry::added(new_path.unwrap_or_default()),
                ChangeKind::Deleted => DiffEntry::deleted(old_path.unwrap_or_default()),
                ChangeKind::Renamed => {
                    DiffEntry::renamed(old_path.unwrap_or_default(), new_path.unwrap_or_default())
                }
                ChangeKind::Modified => {
                    DiffEntry::modified(new_path.or(old_path).unwrap_or_default())
                }
            };

            if let Some(patch) = Patch::from_diff(&diff, idx)? {
                let (_, insertions, deletions) = patch.line_stats()?;
                entry = entry.with_line_stats(insertions, deletions);
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    fn resolve(&self, reference: &str) -> Result<git2::Commit<'_>, GitError> {
        let invalid = || GitError::InvalidReference {
            reference: reference.to_string(),
        };
        let obj = self.repo.revparse_single(reference).map_err(|_| invalid())?;
        obj.peel_to_commit().map_err(|_| invalid())
    }
}

/// Extract commit metadata from a git2 commit
fn extract_commit(git_commit: &git2::Commit<'_>) -> Result<Commit, GitError> {
    let sha = git_commit.id().to_string();
    let author = git_commit.author();

    let time = author.when();
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .ok_or_else(|| GitError::InvalidTimestamp { sha: sha.clone() })?;
    let timestamp = DateTime::from_timestamp(time.seconds(), 0)
        .ok_or_else(|| GitError::InvalidTimestamp { sha: sha.clone() })?
        .with_timezone(&offset);

    let encoding = git_commit.message_encoding();
    Ok(Commit {
        message: decode_text(git_commit.message_bytes(), encoding),
        author: decode_text(author.name_bytes(), encoding),
        author_email: decode_text(author.email_bytes(), encoding),
        timestamp,
        parents: git_commit.parent_ids().map(|id| id.to_string()).collect(),
        sha,
    })
}

/// Decode commit text using the commit's `encoding` header
///
/// Latin-1 maps byte-for-byte onto Unicode; anything else is read as UTF-8
/// with invalid sequences replaced.
fn decode_text(bytes: &[u8], encoding: Option<&str>) -> String {
    match encoding.map(str::to_ascii_lowercase).as_deref() {
        Some("iso-8859-1" | "iso8859-1" | "latin1" | "latin-1") => {
            bytes.iter().map(|&b| char::from(b)).collect()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}
