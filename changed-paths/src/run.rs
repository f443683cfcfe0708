//! Orchestration for one action invocation.
//!
//! parse patterns -> resolve trigger event -> select strategy -> retrieve ->
//! evaluate -> emit. Each phase maps its failures onto one [`ActionError`]
//! variant so the exit code identifies the phase.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::core::evaluator::{ResultMapping, evaluate};
use crate::core::parser::{PatternSet, parse_pattern_spec};
use crate::core::pattern::MatchMode;
use crate::core::strategy::{MissingRef, RetrievalContext, select_strategy};
use crate::core::types::TriggerEvent;
use crate::error::ActionError;
use crate::io::config::load_config;
use crate::io::event::{RunnerEnv, build_trigger_event, load_payload};
use crate::io::github::{ChangedFilesApi, GitHubClient};
use crate::io::outputs::{write_results, write_summary};
use crate::retrieve::retrieve_changes;

/// Raw inputs as supplied by the invocation environment.
#[derive(Debug, Clone, Default)]
pub struct ActionInputs {
    /// Raw pattern spec (`paths` input).
    pub paths: Option<String>,
    pub github_token: Option<String>,
    pub match_mode: MatchMode,
    /// Optional TOML config file.
    pub config_path: Option<PathBuf>,
    /// Overrides `api_url` from the config file.
    pub api_url: Option<String>,
    /// Webhook payload file (`GITHUB_EVENT_PATH`).
    pub event_path: Option<PathBuf>,
    pub runner_env: RunnerEnv,
    /// Output file (`GITHUB_OUTPUT`); stdout when `None`.
    pub output_file: Option<PathBuf>,
}

/// What an invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub context: RetrievalContext,
    pub changed_files: usize,
    pub results: ResultMapping,
}

/// Run the action end to end against the GitHub API and emit outputs.
#[instrument(skip_all)]
pub fn run_action(inputs: &ActionInputs) -> Result<RunReport, ActionError> {
    let patterns = parse_patterns_input(inputs.paths.as_deref(), inputs.match_mode)?;
    let token = required_input("github-token", inputs.github_token.as_deref())?;

    let mut config =
        load_config(inputs.config_path.as_deref()).map_err(ActionError::configuration)?;
    if let Some(api_url) = inputs
        .api_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    {
        config.api_url = api_url.to_string();
    }
    debug!(api_url = %config.api_url, max_pages = config.max_pages, "config loaded");

    let payload =
        load_payload(inputs.event_path.as_deref()).map_err(ActionError::configuration)?;
    let event = build_trigger_event(&payload, &inputs.runner_env);

    let client = GitHubClient::new(token, &config).map_err(ActionError::configuration)?;
    let report = evaluate_event(&client, &patterns, &event, config.max_pages)?;

    emit_report(&report, inputs.output_file.as_deref())?;
    Ok(report)
}

/// Resolve, retrieve, and evaluate for an already-parsed pattern set.
///
/// Repository identity is checked before any request is made.
#[instrument(skip_all, fields(patterns = patterns.len()))]
pub fn evaluate_event<A: ChangedFilesApi>(
    api: &A,
    patterns: &PatternSet,
    event: &TriggerEvent,
    max_pages: u32,
) -> Result<RunReport, ActionError> {
    let repo = event.repository.as_ref().ok_or_else(|| {
        ActionError::Precondition(
            "repository could not be determined from the triggering event".to_string(),
        )
    })?;
    let context = select_strategy(event).map_err(|MissingRef| {
        ActionError::Precondition(
            "no commit ref available for the single-commit fallback".to_string(),
        )
    })?;
    info!(repo = %repo, strategy = context.strategy_name(), "retrieving changed files");

    let changes =
        retrieve_changes(api, repo, &context, max_pages).map_err(ActionError::retrieval)?;
    let results = evaluate(patterns, &changes);
    Ok(RunReport {
        context,
        changed_files: changes.len(),
        results,
    })
}

/// Print the changed-file count, then write one output per label.
pub fn emit_report(report: &RunReport, output_file: Option<&Path>) -> Result<(), ActionError> {
    write_summary(report.changed_files, report.context.strategy_name())
        .map_err(ActionError::output)?;
    write_results(output_file, &report.results).map_err(ActionError::output)
}

/// Validate the required `paths` input and parse it.
pub fn parse_patterns_input(
    paths: Option<&str>,
    mode: MatchMode,
) -> Result<PatternSet, ActionError> {
    let raw = required_input("paths", paths)?;
    parse_pattern_spec(raw, mode).map_err(ActionError::configuration)
}

fn required_input<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, ActionError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            ActionError::Configuration(format!("input required and not supplied: {name}"))
        })
}
