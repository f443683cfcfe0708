//! CI helper that reports whether changed files match path patterns.
//!
//! `changed-paths run` reads its inputs the way a workflow step receives
//! them (`INPUT_*` and `GITHUB_*` environment variables), fetches the files
//! changed by the triggering event, and writes one boolean output per label.

use std::io::BufRead;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use changed_paths::core::evaluator::evaluate;
use changed_paths::core::pattern::MatchMode;
use changed_paths::core::types::ChangeSet;
use changed_paths::error::ActionError;
use changed_paths::io::event::RunnerEnv;
use changed_paths::io::outputs::write_results;
use changed_paths::logging;
use changed_paths::run::{ActionInputs, parse_patterns_input, run_action};

#[derive(Parser)]
#[command(
    name = "changed-paths",
    version,
    about = "Report whether files changed by a pull request or push match path patterns"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch changed files for the triggering event and write outputs.
    Run(RunArgs),
    /// Evaluate a pattern spec against local paths (no network access).
    Check(CheckArgs),
}

#[derive(Args)]
struct PatternArgs {
    /// Pattern spec: comma/newline separated list, or a JSON object of label -> pattern.
    #[arg(long, env = "INPUT_PATHS")]
    paths: Option<String>,
    /// Interpret patterns as `regex` or `literal` strings.
    #[arg(
        long,
        env = "INPUT_MATCH-MODE",
        default_value = "regex",
        value_parser = parse_match_mode
    )]
    match_mode: MatchMode,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    patterns: PatternArgs,
    /// Token used to authenticate API requests.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,
    /// Optional TOML config file.
    #[arg(long, env = "INPUT_CONFIG")]
    config: Option<PathBuf>,
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,
    /// Webhook payload of the triggering event.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,
    /// `owner/name`, used when the payload has no repository.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,
    #[arg(long, env = "GITHUB_SHA")]
    sha: Option<String>,
    #[arg(long = "ref", env = "GITHUB_REF")]
    git_ref: Option<String>,
    /// File that receives `label=bool` lines; stdout when unset.
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

#[derive(Args)]
struct CheckArgs {
    #[command(flatten)]
    patterns: PatternArgs,
    /// Changed paths; read from stdin (one per line) when omitted.
    changed: Vec<String>,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Check(args) => cmd_check(args),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn cmd_run(args: RunArgs) -> Result<(), ActionError> {
    let inputs = ActionInputs {
        paths: args.patterns.paths,
        github_token: args.github_token,
        match_mode: args.patterns.match_mode,
        config_path: non_empty_path(args.config),
        api_url: args.api_url,
        event_path: non_empty_path(args.event_path),
        runner_env: RunnerEnv {
            repository: args.repository,
            sha: args.sha,
            git_ref: args.git_ref,
        },
        output_file: non_empty_path(args.output_file),
    };
    run_action(&inputs)?;
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<(), ActionError> {
    let patterns =
        parse_patterns_input(args.patterns.paths.as_deref(), args.patterns.match_mode)?;
    let changes: ChangeSet = if args.changed.is_empty() {
        read_stdin_paths()?
    } else {
        args.changed.into_iter().collect()
    };
    let results = evaluate(&patterns, &changes);
    write_results(None, &results).map_err(ActionError::output)
}

fn read_stdin_paths() -> Result<ChangeSet, ActionError> {
    let stdin = std::io::stdin();
    let mut paths = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.map_err(ActionError::configuration)?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(trimmed.to_string());
        }
    }
    Ok(paths.into_iter().collect())
}

/// Unset workflow inputs arrive as empty strings, which select the default mode.
fn parse_match_mode(value: &str) -> Result<MatchMode, String> {
    value.parse()
}

/// Workflow runners export unset inputs as empty strings.
fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}
