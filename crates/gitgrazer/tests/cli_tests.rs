// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! CLI parsing tests
//!
//! These tests verify flag parsing, value validation, and how parsed
//! flags turn into filters and strategies.

use chrono::NaiveDate;
use clap::Parser;
use gitgrazer::config::{Config, ConfigError};
use gitgrazer::describe::StrategyKind;
use gitgrazer::filter::CommitFilter;
use gitgrazer::render::OutputFormat;
use tracing::Level;

fn parse(args: &[&str]) -> Config {
    let mut argv = vec!["gitgrazer"];
    argv.extend_from_slice(args);
    Config::try_parse_from(argv).expect("parse should succeed")
}

// ============================================================================
// Source selection
// ============================================================================

#[test]
fn test_branch_and_max_commits() {
    let config = parse(&["-b", "develop", "-n", "25"]);
    assert_eq!(config.branch, "develop");
    assert_eq!(config.max_commits, 25);
}

#[test]
fn test_repo_long_flag() {
    let config = parse(&["--repo", "/tmp/project"]);
    assert_eq!(config.repo, std::path::PathBuf::from("/tmp/project"));
}

#[test]
fn test_max_commits_must_be_a_number() {
    let result = Config::try_parse_from(["gitgrazer", "-n", "lots"]);
    assert!(result.is_err());
}

// ============================================================================
// Format and strategy
// ============================================================================

#[test]
fn test_format_values() {
    assert_eq!(parse(&["-f", "html"]).format, OutputFormat::Html);
    assert_eq!(parse(&["--format", "TEXT"]).format, OutputFormat::Text);
}

#[test]
fn test_unsupported_format_is_rejected() {
    let err = Config::try_parse_from(["gitgrazer", "--format", "markdown"])
        .expect_err("markdown is not a format");
    assert!(err.to_string().contains("markdown"));
}

#[test]
fn test_strategy_values() {
    assert_eq!(parse(&[]).strategy, StrategyKind::Basic);
    assert_eq!(parse(&["-s", "verbose"]).strategy, StrategyKind::Verbose);
    assert_eq!(parse(&["--strategy", "model"]).strategy, StrategyKind::Model);
    assert_eq!(parse(&["--strategy", "llm"]).strategy, StrategyKind::Model);
}

#[test]
fn test_unknown_strategy_is_rejected() {
    assert!(Config::try_parse_from(["gitgrazer", "-s", "psychic"]).is_err());
}

#[test]
fn test_model_and_api_base_override() {
    let config = parse(&[
        "-s",
        "model",
        "--model",
        "gpt-4o-mini",
        "--api-base",
        "http://localhost:8080/v1",
        "--timeout-secs",
        "5",
    ]);
    assert_eq!(config.model, "gpt-4o-mini");
    assert_eq!(config.api_base, "http://localhost:8080/v1");
    assert_eq!(config.timeout(), std::time::Duration::from_secs(5));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn test_repeated_keyword_flag() {
    let config = parse(&["-k", "Fix", "--keyword", "bug"]);
    assert_eq!(config.keywords, vec!["Fix", "bug"]);
    assert_eq!(
        config.filters().filters(),
        &[CommitFilter::keywords(["fix", "bug"])]
    );
}

#[test]
fn test_date_flags_build_one_range() {
    let config = parse(&["--since", "2024-01-01", "--until", "2024-01-31"]);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    let end = NaiveDate::from_ymd_opt(2024, 1, 31).expect("date");
    assert_eq!(
        config.filters().filters(),
        &[CommitFilter::date_range(start, end)]
    );
}

#[test]
fn test_open_ended_until() {
    let config = parse(&["--until", "2024-01-31"]);
    let end = NaiveDate::from_ymd_opt(2024, 1, 31).expect("date");
    assert_eq!(
        config.filters().filters(),
        &[CommitFilter::date_range(NaiveDate::MIN, end)]
    );
}

#[test]
fn test_bad_date_is_rejected() {
    assert!(Config::try_parse_from(["gitgrazer", "--since", "01/02/2024"]).is_err());
    assert!(Config::try_parse_from(["gitgrazer", "--since", "2024-02-30"]).is_err());
}

#[test]
fn test_all_filters_combined() {
    let config = parse(&["-a", "Alice", "--since", "2024-01-01", "-k", "fix"]);
    assert_eq!(config.filters().filters().len(), 3);
}

#[test]
fn test_inverted_dates_fail_validation() {
    let config = Config {
        repo: std::env::temp_dir(),
        ..parse(&["--since", "2024-03-01", "--until", "2024-02-01"])
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidDateRange { .. })
    ));
}

// ============================================================================
// Logging flags
// ============================================================================

#[test]
fn test_verbose_and_quiet_flags() {
    assert_eq!(parse(&["-v"]).log_level(), Level::DEBUG);
    assert_eq!(parse(&["--quiet"]).log_level(), Level::WARN);
    assert_eq!(parse(&[]).log_level(), Level::INFO);
}

#[test]
fn test_verbose_wins_over_quiet() {
    assert_eq!(parse(&["-v", "-q"]).log_level(), Level::DEBUG);
}

#[test]
fn test_bool_flags_take_no_value() {
    assert!(Config::try_parse_from(["gitgrazer", "--verbose=true"]).is_err());
}

// ============================================================================
// Credentials
// ============================================================================

#[test]
fn test_model_strategy_without_credential_fails_fast() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let config = Config {
        strategy: StrategyKind::Model,
        config_file: dir.path().join("missing.json"),
        ..Default::default()
    };
    // Only meaningful when the variable is not set in the test environment
    if std::env::var(gitgrazer::config::API_KEY_VAR).is_err() {
        assert!(matches!(
            config.describer(),
            Err(ConfigError::MissingCredential(_))
        ));
    }
}

#[test]
fn test_model_strategy_with_file_credential() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let file = dir.path().join("config.json");
    std::fs::write(&file, r#"{"OPENAI_API_KEY": "sk-test"}"#).expect("write");
    let config = Config {
        strategy: StrategyKind::Model,
        config_file: file,
        model: "gpt-4o-mini".to_string(),
        ..Default::default()
    };
    let describer = config.describer().expect("describer");
    assert_eq!(describer.kind(), StrategyKind::Model);
}
