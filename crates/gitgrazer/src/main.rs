//! gitgrazer: describe new commits on a branch
//!
//! This binary walks the most recent commits of a branch, keeps those that
//! match the configured filters and were not seen in an earlier run, and
//! prints a description of each to stdout.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use gitgrazer::config::Config;
use gitgrazer::pipeline::{Pipeline, RunReport};
use gitgrazer::store::ProcessedStore;
use gitgrazer_git::GitRepo;
use tracing::{error, info};

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr so stdout carries only rendered commits
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(config.log_level().into()),
        )
        .init();

    match run(&config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> anyhow::Result<RunReport> {
    config.validate()?;

    let describer = config.describer()?;
    let store = ProcessedStore::load(config.state_file_path())?;
    let repo = GitRepo::discover(&config.repo)?;

    info!(
        repo = %config.repo.display(),
        branch = %config.branch,
        strategy = %config.strategy,
        format = %config.format,
        state_file = %store.path().display(),
        processed = store.len(),
        "Starting gitgrazer"
    );

    let mut pipeline = Pipeline::new(store, config.filters(), describer, config.format);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline
        .run(&repo, &config.branch, config.max_commits, &mut out)
        .with_context(|| format!("processing {} on {}", config.repo.display(), config.branch))
}
