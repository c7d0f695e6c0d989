//! Configuration for gitgrazer
//!
//! This module provides the command-line configuration, the default
//! locations of the state file, and API credential resolution.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use clap::Parser;

use crate::describe::{ChangeDescriber, ModelDescriber, StrategyKind};
use crate::filter::{CommitFilter, FilterSet};
use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL, GenerationError, OpenAiClient};
use crate::render::OutputFormat;
use crate::store::DEFAULT_STATE_FILE;

/// Environment variable and config-file key holding the API credential
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// gitgrazer - describe new commits on a branch
#[derive(Parser, Debug, Clone)]
#[command(name = "gitgrazer")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path to the git repository (any directory inside it works)
    #[arg(short, long, env = "GITGRAZER_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// Branch or reference to read commits from
    #[arg(short, long, env = "GITGRAZER_BRANCH", default_value = "main")]
    pub branch: String,

    /// Maximum number of recent commits fetched per run
    #[arg(short = 'n', long, default_value_t = 10)]
    pub max_commits: usize,

    /// Only include commits by this author (exact match)
    #[arg(short, long)]
    pub author: Option<String>,

    /// Only include commits authored on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<NaiveDate>,

    /// Only include commits authored on or before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Only include commits whose message mentions one of these keywords
    ///
    /// May be repeated; matching ignores case.
    #[arg(short, long = "keyword")]
    pub keywords: Vec<String>,

    /// Output format: text or html
    #[arg(short, long, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Change description strategy: basic, verbose or model
    #[arg(short, long, default_value_t = StrategyKind::Basic)]
    pub strategy: StrategyKind,

    /// Path to the processed-commits state file
    ///
    /// Defaults to ~/.local/share/gitgrazer/processed_commits.json (or
    /// platform equivalent).
    #[arg(long, env = "GITGRAZER_STATE_FILE")]
    pub state_file: Option<PathBuf>,

    /// JSON config file consulted when OPENAI_API_KEY is not set
    #[arg(long, env = "GITGRAZER_CONFIG", default_value = "config.json")]
    pub config_file: PathBuf,

    /// Model identifier for the model strategy
    #[arg(long, env = "GITGRAZER_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "GITGRAZER_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Request timeout for the model strategy, in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: PathBuf::from("."),
            branch: "main".to_string(),
            max_commits: 10,
            author: None,
            since: None,
            until: None,
            keywords: Vec::new(),
            format: OutputFormat::Text,
            strategy: StrategyKind::Basic,
            state_file: None,
            config_file: PathBuf::from("config.json"),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 60,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Get the state file path, using a default if not specified
    ///
    /// Default location is platform-specific:
    /// - macOS: ~/Library/Application Support/gitgrazer/processed_commits.json
    /// - Linux: ~/.local/share/gitgrazer/processed_commits.json
    /// - Windows: %LOCALAPPDATA%\gitgrazer\processed_commits.json
    #[must_use]
    pub fn state_file_path(&self) -> PathBuf {
        self.state_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("gitgrazer")
                .join(DEFAULT_STATE_FILE)
        })
    }

    /// Build the predicate set: author, then date range, then keywords
    #[must_use]
    pub fn filters(&self) -> FilterSet {
        let mut filters = FilterSet::new();
        if let Some(ref author) = self.author {
            filters.add(CommitFilter::author(author.as_str()));
        }
        if self.since.is_some() || self.until.is_some() {
            filters.add(CommitFilter::date_range(
                self.since.unwrap_or(NaiveDate::MIN),
                self.until.unwrap_or(NaiveDate::MAX),
            ));
        }
        if !self.keywords.is_empty() {
            filters.add(CommitFilter::keywords(&self.keywords));
        }
        filters
    }

    /// Request timeout for the completion client
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The repository path doesn't exist
    /// - `max_commits` is zero
    /// - `since` is after `until`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.repo.exists() {
            return Err(ConfigError::RepoNotFound(self.repo.clone()));
        }
        if self.max_commits == 0 {
            return Err(ConfigError::ZeroMaxCommits);
        }
        if let (Some(since), Some(until)) = (self.since, self.until)
            && since > until
        {
            return Err(ConfigError::InvalidDateRange { since, until });
        }
        Ok(())
    }

    /// Resolve the API credential from the environment, then the config file
    ///
    /// # Errors
    ///
    /// See [`resolve_api_key`].
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_api_key(std::env::var(API_KEY_VAR).ok(), &self.config_file)
    }

    /// Build the configured change describer
    ///
    /// The model strategy resolves its credential here, so a missing key
    /// fails before any commit is read.
    ///
    /// # Errors
    ///
    /// Returns the credential errors of [`resolve_api_key`], or
    /// `ConfigError::Client` if the HTTP client cannot be built.
    pub fn describer(&self) -> Result<ChangeDescriber, ConfigError> {
        match self.strategy {
            StrategyKind::Basic => Ok(ChangeDescriber::Basic),
            StrategyKind::Verbose => Ok(ChangeDescriber::Verbose),
            StrategyKind::Model => {
                let client = OpenAiClient::new(&self.api_base, self.api_key()?, self.timeout())?;
                Ok(ChangeDescriber::Model(ModelDescriber::new(
                    Box::new(client),
                    &self.model,
                )))
            }
        }
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Resolve the credential: a non-empty `env_value` wins, else the
/// `OPENAI_API_KEY` entry of the JSON object in `config_file`
///
/// # Errors
///
/// Returns `ConfigError::MissingCredential` if neither source has a value,
/// and `ConfigError::ConfigFileInvalid` if the file exists but is not a JSON
/// object.
pub fn resolve_api_key(env_value: Option<String>, config_file: &Path) -> Result<String, ConfigError> {
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return Ok(value);
    }

    let raw = match fs::read_to_string(config_file) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingCredential(config_file.to_path_buf()));
        }
        Err(e) => return Err(ConfigError::ConfigFileUnreadable(config_file.to_path_buf(), e)),
    };

    let values: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw)
        .map_err(|e| ConfigError::ConfigFileInvalid(config_file.to_path_buf(), e))?;

    values
        .get(API_KEY_VAR)
        .and_then(serde_json::Value::as_str)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| ConfigError::MissingCredential(config_file.to_path_buf()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepoNotFound(PathBuf),

    /// Nothing would ever be fetched
    #[error("--max-commits must be at least 1")]
    ZeroMaxCommits,

    /// Date bounds are inverted
    #[error("--since {since} is after --until {until}")]
    InvalidDateRange {
        /// Lower bound
        since: NaiveDate,
        /// Upper bound
        until: NaiveDate,
    },

    /// No API credential in the environment or config file
    #[error("No value for OPENAI_API_KEY in the environment or in config file {0}")]
    MissingCredential(PathBuf),

    /// Config file exists but cannot be read
    #[error("Failed to read config file {0}: {1}")]
    ConfigFileUnreadable(PathBuf, io::Error),

    /// Config file is not a JSON object
    #[error("Config file {0} is not a JSON object: {1}")]
    ConfigFileInvalid(PathBuf, serde_json::Error),

    /// The completion client could not be constructed
    #[error("Failed to set up the completion client: {0}")]
    Client(#[from] GenerationError),
}
