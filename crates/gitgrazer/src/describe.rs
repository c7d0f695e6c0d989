// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Change descriptions derived from a commit's diff
//!
//! Three strategies are available: a rule-based listing, the same listing
//! with per-file line counts, and a language-model narrative built from a
//! terse summary of the diff.

use std::fmt;
use std::str::FromStr;

use gitgrazer_git::DiffEntry;
use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, CompletionClient, CompletionRequest, GenerationError};

/// System role sent with every model-assisted request
pub const SYSTEM_PROMPT: &str = "You are a senior developer and code reviewer who specializes in \
decoding and explaining Git commit history. You identify patterns, design decisions, and what \
changed in each commit, and you articulate the work completed so readers understand how the \
project evolved.";

/// Prompt template; `{{diff}}` is replaced with the diff summary
pub const PROMPT_TEMPLATE: &str = "Based on the git diff summary provided:\n\
{{diff}}\n\
Analyze the code changes. Identify what has been added, removed, or altered, the likely purpose \
behind these changes, and their impact on the project's functionality in the short and long \
term. Note adherence to or deviation from coding standards and best practices. Present your \
findings as a clear, concise narrative and include any recommendations for further \
improvement.";

/// A generated description plus the diff summary it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDescription {
    /// Human-readable description
    pub content: String,
    /// One `"<code> <path>"` line per diff entry
    pub diff_summary: String,
}

/// Build the machine-readable summary for `entries`
#[must_use]
pub fn diff_summary(entries: &[DiffEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{}\n", e.summary_line()))
        .collect()
}

/// Label one entry by which path sides are present; first rule wins
fn label(entry: &DiffEntry) -> String {
    match (entry.old_path.as_deref(), entry.new_path.as_deref()) {
        (None, new) => format!("File Added: {}", new.unwrap_or("<unknown>")),
        (Some(old), None) => format!("File Deleted: {old}"),
        (Some(old), Some(new)) if old == new => format!("File Modified: {new}"),
        (Some(old), Some(new)) => format!("File Renamed (Possible): {old} -> {new}"),
    }
}

fn is_modification(entry: &DiffEntry) -> bool {
    matches!(
        (entry.old_path.as_deref(), entry.new_path.as_deref()),
        (Some(old), Some(new)) if old == new
    )
}

/// Strategy name as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Rule-based labels
    #[default]
    Basic,
    /// Labels plus line counts for modified files
    Verbose,
    /// Language-model narrative
    Model,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "basic",
            Self::Verbose => "verbose",
            Self::Model => "model",
        })
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "verbose" => Ok(Self::Verbose),
            "model" | "llm" => Ok(Self::Model),
            other => Err(format!(
                "unknown strategy '{other}' (expected basic, verbose or model)"
            )),
        }
    }
}

/// Model-assisted describer
pub struct ModelDescriber {
    client: Box<dyn CompletionClient>,
    model: String,
}

impl ModelDescriber {
    /// Describe diffs with `client` using `model`
    #[must_use]
    pub fn new(client: Box<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// The request sent for a given summary
    #[must_use]
    pub fn request_for(&self, summary: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(PROMPT_TEMPLATE.replace("{{diff}}", summary)),
            ],
        }
    }

    fn generate(&self, entries: &[DiffEntry]) -> Result<ChangeDescription, GenerationError> {
        let summary = diff_summary(entries);
        let response = self.client.complete(&self.request_for(&summary))?;
        Ok(ChangeDescription {
            content: response.text.trim().to_string(),
            diff_summary: summary,
        })
    }
}

impl fmt::Debug for ModelDescriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDescriber")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Change description strategy chosen at configuration time
#[derive(Debug)]
pub enum ChangeDescriber {
    /// One label per entry
    Basic,
    /// Labels plus `Diff: +N -M` under modified files
    Verbose,
    /// Delegate to a language model
    Model(ModelDescriber),
}

impl ChangeDescriber {
    /// Describe `entries`, in diff order
    ///
    /// # Errors
    ///
    /// Only the model strategy fails, with the client's `GenerationError`.
    pub fn generate(&self, entries: &[DiffEntry]) -> Result<ChangeDescription, GenerationError> {
        match self {
            Self::Basic => Ok(ChangeDescription {
                content: entries.iter().map(|e| label(e) + "\n").collect(),
                diff_summary: diff_summary(entries),
            }),
            Self::Verbose => {
                let mut content = String::new();
                for entry in entries {
                    content.push_str(&label(entry));
                    content.push('\n');
                    if is_modification(entry) {
                        content.push_str(&format!(
                            "  Diff: +{} -{}\n",
                            entry.insertions, entry.deletions
                        ));
                    }
                }
                Ok(ChangeDescription {
                    content,
                    diff_summary: diff_summary(entries),
                })
            }
            Self::Model(describer) => describer.generate(entries),
        }
    }

    /// The strategy kind this describer implements
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Basic => StrategyKind::Basic,
            Self::Verbose => StrategyKind::Verbose,
            Self::Model(_) => StrategyKind::Model,
        }
    }
}
