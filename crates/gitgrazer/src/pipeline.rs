// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit-processing pipeline
//!
//! Fetches a page of recent commits, then for each one (oldest first):
//! checks the filters, skips SHAs already in the store, describes the diff,
//! renders, records the SHA, and writes the block to the output sink.
//!
//! # Example
//!
//! ```no_run
//! use gitgrazer::describe::ChangeDescriber;
//! use gitgrazer::filter::{CommitFilter, FilterSet};
//! use gitgrazer::pipeline::Pipeline;
//! use gitgrazer::render::OutputFormat;
//! use gitgrazer::store::ProcessedStore;
//! use gitgrazer_git::GitRepo;
//!
//! let repo = GitRepo::discover(".").expect("open repo");
//! let store = ProcessedStore::load("processed_commits.json").expect("load state");
//! let filters = FilterSet::new().with(CommitFilter::author("Alice"));
//! let mut pipeline = Pipeline::new(store, filters, ChangeDescriber::Basic, OutputFormat::Text);
//!
//! let report = pipeline
//!     .run(&repo, "main", 10, &mut std::io::stdout())
//!     .expect("run");
//! println!("{} new commits", report.emitted);
//! ```

use std::io::{self, Write};

use gitgrazer_git::{Commit, DiffEntry, GitError, GitRepo, WalkOptions};
use thiserror::Error;
use tracing::{info, warn};

use crate::describe::{ChangeDescriber, ChangeDescription};
use crate::filter::FilterSet;
use crate::llm::GenerationError;
use crate::render::OutputFormat;
use crate::store::{ProcessedStore, StoreError};

/// Source of commits and their diffs
pub trait CommitSource {
    /// Up to `max` commits reachable from `reference`, most recent first
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the reference or history cannot be read.
    fn recent_commits(&self, reference: &str, max: usize) -> Result<Vec<Commit>, GitError>;

    /// File-level changes of `commit` relative to its first parent
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the trees cannot be compared.
    fn diff_entries(&self, commit: &Commit) -> Result<Vec<DiffEntry>, GitError>;
}

impl CommitSource for GitRepo {
    fn recent_commits(&self, reference: &str, max: usize) -> Result<Vec<Commit>, GitError> {
        self.walk_commits(&WalkOptions::latest(max).from(reference))
    }

    fn diff_entries(&self, commit: &Commit) -> Result<Vec<DiffEntry>, GitError> {
        GitRepo::diff_entries(self, commit)
    }
}

/// Errors that stop a run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Commits could not be fetched
    #[error("Failed to fetch commits: {0}")]
    Fetch(#[from] GitError),

    /// The store could not record a processed commit
    #[error("Failed to record processed commit: {0}")]
    Store(#[from] StoreError),

    /// The output sink rejected a block
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Why a single commit was skipped after being accepted
#[derive(Debug, Error)]
pub enum CommitError {
    /// The diff could not be computed
    #[error("diff failed: {0}")]
    Diff(#[source] GitError),

    /// The change description could not be generated
    #[error("description failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Result of processing one commit
#[derive(Debug)]
pub enum CommitOutcome {
    /// Rendered, recorded, and ready to emit
    Emitted(String),
    /// Did not satisfy the filters
    Rejected,
    /// Already in the store
    Duplicate,
    /// Accepted but skipped; it will be retried on the next run
    Failed(CommitError),
}

/// Per-run tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Commits fetched from the source
    pub fetched: usize,
    /// Blocks written to the output
    pub emitted: usize,
    /// Commits that failed the filters
    pub rejected: usize,
    /// Commits already processed in an earlier run
    pub duplicates: usize,
    /// Accepted commits whose description failed
    pub failed: usize,
}

/// Wires the store, filters, describer and renderer together
#[derive(Debug)]
pub struct Pipeline {
    store: ProcessedStore,
    filters: FilterSet,
    describer: ChangeDescriber,
    format: OutputFormat,
}

impl Pipeline {
    /// Build a pipeline from its parts
    #[must_use]
    pub fn new(
        store: ProcessedStore,
        filters: FilterSet,
        describer: ChangeDescriber,
        format: OutputFormat,
    ) -> Self {
        Self {
            store,
            filters,
            describer,
            format,
        }
    }

    /// The dedup store
    #[must_use]
    pub fn store(&self) -> &ProcessedStore {
        &self.store
    }

    /// Give the store back, e.g. to inspect it after a run
    #[must_use]
    pub fn into_store(self) -> ProcessedStore {
        self.store
    }

    /// Fetch up to `max` commits from `reference` and process them oldest first,
    /// writing each emitted block to `out`
    ///
    /// # Errors
    ///
    /// Returns `PipelineError` if fetching, recording, or writing fails.
    /// Per-commit description failures are reported in the tallies instead.
    pub fn run<S, W>(
        &mut self,
        source: &S,
        reference: &str,
        max: usize,
        out: &mut W,
    ) -> Result<RunReport, PipelineError>
    where
        S: CommitSource + ?Sized,
        W: Write,
    {
        let mut commits = source.recent_commits(reference, max)?;
        commits.reverse();

        let mut report = RunReport {
            fetched: commits.len(),
            ..Default::default()
        };
        info!(reference, fetched = report.fetched, "Processing commits");

        for commit in &commits {
            match self.process_commit(source, commit)? {
                CommitOutcome::Emitted(block) => {
                    writeln!(out, "{block}")?;
                    report.emitted += 1;
                }
                CommitOutcome::Rejected => report.rejected += 1,
                CommitOutcome::Duplicate => report.duplicates += 1,
                CommitOutcome::Failed(_) => report.failed += 1,
            }
        }
        out.flush()?;

        info!(
            emitted = report.emitted,
            rejected = report.rejected,
            duplicates = report.duplicates,
            failed = report.failed,
            "Run complete"
        );
        Ok(report)
    }

    /// Take one commit through filter, dedup, describe, render and record
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Store` if the commit cannot be recorded; no
    /// block is produced in that case.
    pub fn process_commit<S>(
        &mut self,
        source: &S,
        commit: &Commit,
    ) -> Result<CommitOutcome, PipelineError>
    where
        S: CommitSource + ?Sized,
    {
        if !self.filters.matches(commit) {
            info!(sha = %commit.short_sha(), author = %commit.author, "Rejected by filters");
            return Ok(CommitOutcome::Rejected);
        }

        if self.store.has(&commit.sha) {
            info!(sha = %commit.short_sha(), "Commit has already been processed");
            return Ok(CommitOutcome::Duplicate);
        }

        let description = match self.describe(source, commit) {
            Ok(description) => description,
            Err(e) => {
                warn!(sha = %commit.sha, error = %e, "Skipping commit");
                return Ok(CommitOutcome::Failed(e));
            }
        };

        let block = self.format.render(commit, description.as_ref());
        self.store.mark_processed(&commit.sha)?;
        info!(sha = %commit.short_sha(), subject = %commit.subject(), "Emitting commit");
        Ok(CommitOutcome::Emitted(block))
    }

    /// Describe the commit's diff; empty diffs get no description
    fn describe<S>(
        &self,
        source: &S,
        commit: &Commit,
    ) -> Result<Option<ChangeDescription>, CommitError>
    where
        S: CommitSource + ?Sized,
    {
        let entries = source.diff_entries(commit).map_err(CommitError::Diff)?;
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.describer.generate(&entries)?))
    }
}
