// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Output rendering for processed commits

use std::fmt;
use std::str::FromStr;

use gitgrazer_git::Commit;
use thiserror::Error;

use crate::describe::ChangeDescription;

/// Separator printed above each text block
pub const SEPARATOR: &str = "----------------------------------------";

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Rendering errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The requested output format does not exist
    #[error("Unsupported output format: '{0}' (expected text or html)")]
    UnsupportedFormat(String),
}

/// Output format for emitted commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text block
    #[default]
    Text,
    /// Escaped `<div>` block
    Html,
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            _ => Err(RenderError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Html => "html",
        })
    }
}

impl OutputFormat {
    /// Render one commit with its optional description
    #[must_use]
    pub fn render(self, commit: &Commit, description: Option<&ChangeDescription>) -> String {
        match self {
            Self::Text => render_text(commit, description),
            Self::Html => render_html(commit, description),
        }
    }
}

fn render_text(commit: &Commit, description: Option<&ChangeDescription>) -> String {
    let mut lines = vec![
        SEPARATOR.to_string(),
        format!("Commit Hash: {}", commit.sha),
        format!("Author: {}", commit.author),
        format!("Date: {}", commit.timestamp.format(DATE_FORMAT)),
        format!("Message: {}", commit.trimmed_message()),
    ];
    if let Some(description) = description {
        lines.push(format!("Diff Summary:\n{}", description.diff_summary.trim_end()));
        lines.push(format!("Changes:\n{}", description.content.trim_end()));
    }
    lines.join("\n")
}

fn render_html(commit: &Commit, description: Option<&ChangeDescription>) -> String {
    let mut body = format!(
        "Commit Hash: {}<br>\nAuthor: {}<br>\nDate: {}<br>\nMessage: {}<br>\n",
        escape_html(&commit.sha),
        html_text(&commit.author),
        commit.timestamp.format(DATE_FORMAT),
        html_text(commit.trimmed_message()),
    );
    if let Some(description) = description {
        body.push_str(&format!(
            "Diff Summary: {}<br>\nChanges: {}<br>\n",
            html_text(description.diff_summary.trim_end()),
            html_text(description.content.trim_end()),
        ));
    }
    format!("<div class='commit'>\n{body}</div>\n")
}

/// Escape, then turn line breaks into `<br>`
fn html_text(text: &str) -> String {
    escape_html(text).replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Escape characters that are significant in HTML text and attributes
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
