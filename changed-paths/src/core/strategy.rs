//! Retrieval strategy selection.
//!
//! Precedence: pull request > compare commits > single commit. The choice is a
//! pure function of the triggering event.

use crate::core::types::TriggerEvent;

/// Identifies which change list to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalContext {
    PullRequest { number: u64 },
    Compare { base: String, head: String },
    SingleCommit { reference: String },
}

impl RetrievalContext {
    /// Short strategy name for logs and error messages.
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::PullRequest { .. } => "pull-request-files",
            Self::Compare { .. } => "compare-commits",
            Self::SingleCommit { .. } => "single-commit",
        }
    }
}

/// The event carried no ref usable for the single-commit fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MissingRef;

/// True for the "no predecessor" sentinel (all zeros, e.g. a new branch push).
pub fn is_null_sha(sha: &str) -> bool {
    !sha.is_empty() && sha.bytes().all(|b| b == b'0')
}

/// Resolve the retrieval context from the triggering event.
pub fn select_strategy(event: &TriggerEvent) -> Result<RetrievalContext, MissingRef> {
    if let Some(number) = event.pull_request_number {
        return Ok(RetrievalContext::PullRequest { number });
    }

    match (event.before.as_deref(), event.after.as_deref()) {
        (Some(before), Some(after)) if !is_null_sha(before) => {
            return Ok(RetrievalContext::Compare {
                base: before.to_string(),
                head: after.to_string(),
            });
        }
        _ => {}
    }

    event
        .current_ref
        .clone()
        .map(|reference| RetrievalContext::SingleCommit { reference })
        .ok_or(MissingRef)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO: &str = "0000000000000000000000000000000000000000";
    const SHA_A: &str = "1234567890123456789012345678901234567890";
    const SHA_B: &str = "abcdefabcdefabcdefabcdefabcdefabcdefabcd";

    fn event(pr: Option<u64>, before: Option<&str>, after: Option<&str>) -> TriggerEvent {
        TriggerEvent {
            repository: None,
            pull_request_number: pr,
            before: before.map(str::to_string),
            after: after.map(str::to_string),
            current_ref: Some(SHA_B.to_string()),
        }
    }

    #[test]
    fn pull_request_wins_over_commit_range() {
        let ctx = select_strategy(&event(Some(1), Some(SHA_A), Some(SHA_B))).expect("select");
        assert_eq!(ctx, RetrievalContext::PullRequest { number: 1 });
        assert_eq!(ctx.strategy_name(), "pull-request-files");
    }

    #[test]
    fn push_with_predecessor_compares_commits() {
        let ctx = select_strategy(&event(None, Some(SHA_A), Some(SHA_B))).expect("select");
        assert_eq!(
            ctx,
            RetrievalContext::Compare {
                base: SHA_A.to_string(),
                head: SHA_B.to_string()
            }
        );
    }

    #[test]
    fn null_before_falls_back_to_single_commit() {
        let ctx = select_strategy(&event(None, Some(ZERO), Some(SHA_B))).expect("select");
        assert_eq!(
            ctx,
            RetrievalContext::SingleCommit {
                reference: SHA_B.to_string()
            }
        );
    }

    #[test]
    fn missing_after_falls_back_to_single_commit() {
        let ctx = select_strategy(&event(None, Some(SHA_A), None)).expect("select");
        assert_eq!(ctx.strategy_name(), "single-commit");
    }

    #[test]
    fn no_ref_for_fallback_is_an_error() {
        let mut ev = event(None, None, None);
        ev.current_ref = None;
        assert_eq!(select_strategy(&ev), Err(MissingRef));
    }

    #[test]
    fn null_sha_detection() {
        assert!(is_null_sha(ZERO));
        assert!(is_null_sha(&"0".repeat(64)));
        assert!(!is_null_sha(""));
        assert!(!is_null_sha(SHA_A));
    }
}
