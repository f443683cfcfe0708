//! Change-set retrieval: drain every page of the selected strategy.
//!
//! Pages are requested strictly in order; page N+1 is only requested after
//! page N has been consumed. A failed page aborts the whole retrieval so a
//! partial change set is never evaluated.

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, instrument};

use crate::core::strategy::RetrievalContext;
use crate::core::types::{ChangeSet, RepoId};
use crate::io::github::{ChangedFilesApi, FilePage};

/// Fetch the complete change set for `context`.
///
/// Fails if the provider still reports a next page after `max_pages` pages.
#[instrument(
    skip_all,
    fields(repo = %repo, strategy = context.strategy_name(), max_pages = max_pages)
)]
pub fn retrieve_changes<A: ChangedFilesApi>(
    api: &A,
    repo: &RepoId,
    context: &RetrievalContext,
    max_pages: u32,
) -> Result<ChangeSet> {
    let mut changes = ChangeSet::default();
    for page in 1..=max_pages {
        let FilePage {
            filenames,
            has_next_page,
        } = fetch_page(api, repo, context, page).with_context(|| {
            format!("{} page {page} for {repo}", context.strategy_name())
        })?;
        debug!(page, files = filenames.len(), has_next_page, "page fetched");
        changes.extend_page(filenames);
        if !has_next_page {
            info!(pages = page, files = changes.len(), "change set retrieved");
            return Ok(changes);
        }
    }
    Err(anyhow!(
        "{} for {repo} still has more pages after {max_pages} pages (raise max_pages)",
        context.strategy_name()
    ))
}

fn fetch_page<A: ChangedFilesApi>(
    api: &A,
    repo: &RepoId,
    context: &RetrievalContext,
    page: u32,
) -> Result<FilePage> {
    match context {
        RetrievalContext::PullRequest { number } => {
            api.list_pull_request_files(repo, *number, page)
        }
        RetrievalContext::Compare { base, head } => api.compare_commits(repo, base, head, page),
        RetrievalContext::SingleCommit { reference } => api.get_commit(repo, reference, page),
    }
}
