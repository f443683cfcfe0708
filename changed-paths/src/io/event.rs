//! Triggering-event loading.
//!
//! The CI runner writes the webhook payload to `GITHUB_EVENT_PATH` and exposes a
//! few more fields as environment variables. Only the fields the engine needs
//! are deserialized; everything else in the payload is ignored.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::core::strategy::is_null_sha;
use crate::core::types::{RepoId, TriggerEvent};

/// Subset of the webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EventPayload {
    pub repository: Option<PayloadRepository>,
    pub number: Option<u64>,
    pub pull_request: Option<PayloadPullRequest>,
    pub before: Option<String>,
    pub after: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayloadRepository {
    pub name: String,
    pub owner: PayloadOwner,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayloadOwner {
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayloadPullRequest {
    pub number: u64,
}

/// Runner-provided context outside the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerEnv {
    /// `GITHUB_REPOSITORY` (`owner/name`).
    pub repository: Option<String>,
    /// `GITHUB_SHA`.
    pub sha: Option<String>,
    /// `GITHUB_REF`.
    pub git_ref: Option<String>,
}

/// Read the payload file. `None` means no payload is available.
pub fn load_payload(path: Option<&Path>) -> Result<EventPayload> {
    let Some(path) = path else {
        debug!("no event payload path, using empty payload");
        return Ok(EventPayload::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read event payload {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parse event payload {}", path.display()))
}

/// Combine payload and runner context into the fields the engine consumes.
///
/// - repository: payload `repository`, else `GITHUB_REPOSITORY`.
/// - pull request: `pull_request.number`, else top-level `number`.
/// - current ref: `GITHUB_SHA`, else a non-null payload `after`, else `GITHUB_REF`.
pub fn build_trigger_event(payload: &EventPayload, env: &RunnerEnv) -> TriggerEvent {
    let repository = payload
        .repository
        .as_ref()
        .filter(|repo| !repo.owner.login.is_empty() && !repo.name.is_empty())
        .map(|repo| RepoId::new(&repo.owner.login, &repo.name))
        .or_else(|| env.repository.as_deref().and_then(RepoId::parse_slug));

    let pull_request_number = payload
        .pull_request
        .as_ref()
        .map(|pr| pr.number)
        .or(payload.number);

    let before = non_empty(payload.before.as_deref());
    let after = non_empty(payload.after.as_deref());
    let current_ref = non_empty(env.sha.as_deref())
        .or_else(|| after.clone().filter(|sha| !is_null_sha(sha)))
        .or_else(|| non_empty(env.git_ref.as_deref()));

    TriggerEvent {
        repository,
        pull_request_number,
        before,
        after,
        current_ref,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA_A: &str = "1234567890123456789012345678901234567890";
    const SHA_B: &str = "abcdefabcdefabcdefabcdefabcdefabcdefabcd";

    fn parse(json: &str) -> EventPayload {
        serde_json::from_str(json).expect("payload")
    }

    #[test]
    fn pull_request_payload() {
        let payload = parse(
            r#"{
                "number": 7,
                "pull_request": {"number": 1, "title": "ignored"},
                "repository": {"name": "some-repo", "owner": {"login": "some-owner"}}
            }"#,
        );
        let event = build_trigger_event(&payload, &RunnerEnv::default());
        assert_eq!(event.pull_request_number, Some(1));
        assert_eq!(event.repository, Some(RepoId::new("some-owner", "some-repo")));
    }

    #[test]
    fn top_level_number_is_used_without_pull_request_object() {
        let payload = parse(r#"{"number": 42}"#);
        let event = build_trigger_event(&payload, &RunnerEnv::default());
        assert_eq!(event.pull_request_number, Some(42));
    }

    #[test]
    fn push_payload_keeps_commit_range() {
        let payload = parse(&format!(r#"{{"before": "{SHA_A}", "after": "{SHA_B}"}}"#));
        let env = RunnerEnv {
            repository: Some("o/r".to_string()),
            sha: None,
            git_ref: Some("refs/heads/main".to_string()),
        };
        let event = build_trigger_event(&payload, &env);
        assert_eq!(event.before.as_deref(), Some(SHA_A));
        assert_eq!(event.after.as_deref(), Some(SHA_B));
        assert_eq!(event.current_ref.as_deref(), Some(SHA_B));
        assert_eq!(event.repository, Some(RepoId::new("o", "r")));
    }

    #[test]
    fn runner_sha_is_preferred_for_current_ref() {
        let payload = parse(&format!(r#"{{"after": "{SHA_B}"}}"#));
        let env = RunnerEnv {
            sha: Some(SHA_A.to_string()),
            ..RunnerEnv::default()
        };
        let event = build_trigger_event(&payload, &env);
        assert_eq!(event.current_ref.as_deref(), Some(SHA_A));
    }

    #[test]
    fn null_after_falls_back_to_runner_ref() {
        let payload = parse(&format!(
            r#"{{"before": "{SHA_A}", "after": "0000000000000000000000000000000000000000"}}"#
        ));
        let env = RunnerEnv {
            sha: None,
            git_ref: Some("refs/heads/x".to_string()),
            ..RunnerEnv::default()
        };
        let event = build_trigger_event(&payload, &env);
        assert_eq!(event.current_ref.as_deref(), Some("refs/heads/x"));
        assert_eq!(
            event.after.as_deref(),
            Some("0000000000000000000000000000000000000000")
        );
    }

    #[test]
    fn missing_after_falls_back_to_runner_ref() {
        let env = RunnerEnv {
            git_ref: Some("refs/heads/x".to_string()),
            ..RunnerEnv::default()
        };
        let event = build_trigger_event(&EventPayload::default(), &env);
        assert_eq!(event.current_ref.as_deref(), Some("refs/heads/x"));
        assert_eq!(event.after, None);
    }

    #[test]
    fn empty_strings_are_absent() {
        let payload = parse(r#"{"before": "", "after": "  "}"#);
        let env = RunnerEnv {
            repository: Some(String::new()),
            sha: Some(String::new()),
            git_ref: None,
        };
        let event = build_trigger_event(&payload, &env);
        assert_eq!(event, TriggerEvent::default());
    }

    #[test]
    fn load_payload_reads_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("event.json");
        fs::write(&path, r#"{"pull_request": {"number": 3}}"#).expect("write");
        let payload = load_payload(Some(&path)).expect("load");
        assert_eq!(payload.pull_request, Some(PayloadPullRequest { number: 3 }));
    }

    #[test]
    fn load_payload_without_path_is_empty() {
        assert_eq!(load_payload(None).expect("load"), EventPayload::default());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("event.json");
        fs::write(&path, "not json").expect("write");
        let err = load_payload(Some(&path)).expect_err("malformed");
        assert!(format!("{err:#}").contains("parse event payload"));
    }
}
