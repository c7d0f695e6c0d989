// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit match predicates
//!
//! Each [`CommitFilter`] is a pure test over a [`Commit`]. A [`FilterSet`]
//! combines them with a short-circuiting AND; an empty set matches every
//! commit.

use chrono::NaiveDate;
use gitgrazer_git::Commit;

/// A single predicate over a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitFilter {
    /// Author display name equals this value exactly
    Author(String),
    /// Authored date (in the commit's own offset) lies within the bounds, inclusive
    DateRange {
        /// First accepted day
        start: NaiveDate,
        /// Last accepted day
        end: NaiveDate,
    },
    /// Message contains any of these keywords, ignoring case
    Keywords(Vec<String>),
}

impl CommitFilter {
    /// Author-equality predicate
    #[must_use]
    pub fn author(name: impl Into<String>) -> Self {
        Self::Author(name.into())
    }

    /// Inclusive date-range predicate
    #[must_use]
    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::DateRange { start, end }
    }

    /// Keyword predicate; keywords are lower-cased once here
    #[must_use]
    pub fn keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Keywords(
            keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        )
    }

    /// Whether `commit` satisfies this predicate
    #[must_use]
    pub fn matches(&self, commit: &Commit) -> bool {
        match self {
            Self::Author(name) => commit.author == *name,
            Self::DateRange { start, end } => {
                let day = commit.timestamp.date_naive();
                *start <= day && day <= *end
            }
            Self::Keywords(keywords) => {
                let message = commit.message.to_lowercase();
                keywords.iter().any(|k| message.contains(k.as_str()))
            }
        }
    }
}

/// Ordered conjunction of predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<CommitFilter>,
}

impl FilterSet {
    /// An empty set, which matches everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate; evaluation follows registration order
    pub fn add(&mut self, filter: CommitFilter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Builder form of [`FilterSet::add`]
    #[must_use]
    pub fn with(mut self, filter: CommitFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Registered predicates
    #[must_use]
    pub fn filters(&self) -> &[CommitFilter] {
        &self.filters
    }

    /// Whether no predicate is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True iff every predicate matches
    #[must_use]
    pub fn matches(&self, commit: &Commit) -> bool {
        self.filters.iter().all(|f| f.matches(commit))
    }
}

impl FromIterator<CommitFilter> for FilterSet {
    fn from_iter<T: IntoIterator<Item = CommitFilter>>(iter: T) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}
