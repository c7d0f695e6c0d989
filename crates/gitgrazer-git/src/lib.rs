// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gitgrazer-git: Git history walking for gitgrazer
//!
//! This library crate reads commits and their file-level diffs from a
//! repository using `git2`, in the shape the gitgrazer pipeline consumes.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use gitgrazer_git::{GitRepo, WalkOptions};
//!
//! let repo = GitRepo::open(".").expect("open repo");
//! let commits = repo.walk_commits(&WalkOptions::latest(10).from("main"))
//!     .expect("walk commits");
//!
//! for c in commits {
//!     let diff = repo.diff_entries(&c).expect("diff");
//!     println!("{} - {} ({} files)", c.short_sha(), c.subject(), diff.len());
//! }
//! ```

pub mod commit;
pub mod diff;
pub mod error;
pub mod parser;

pub use commit::Commit;
pub use diff::{ChangeKind, DiffEntry};
pub use error::GitError;
pub use parser::{GitRepo, WalkOptions};

