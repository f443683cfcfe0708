//! Test-only helpers: an in-memory paginated API and event builders.

use std::cell::RefCell;

use anyhow::{Result, anyhow};

use crate::core::types::{RepoId, TriggerEvent};
use crate::io::github::{ChangedFilesApi, FilePage};

pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// A request observed by [`FakeApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    PullRequestFiles { number: u64, page: u32 },
    Compare { base: String, head: String, page: u32 },
    Commit { reference: String, page: u32 },
}

/// Serves the same pages for every strategy and records each call.
///
/// Page `n` (1-based) returns `pages[n - 1]`; pages past the end are empty.
#[derive(Debug, Default)]
pub struct FakeApi {
    pages: Vec<Vec<String>>,
    fail_on_page: Option<u32>,
    calls: RefCell<Vec<FakeCall>>,
    repos: RefCell<Vec<RepoId>>,
}

impl FakeApi {
    pub fn with_pages(pages: Vec<Vec<String>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    /// Make the given page fail with an "upstream failure" error.
    pub fn failing_on_page(mut self, page: u32) -> Self {
        self.fail_on_page = Some(page);
        self
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.calls.borrow().clone()
    }

    /// Distinct repositories requested, in first-seen order.
    pub fn repos(&self) -> Vec<RepoId> {
        self.repos.borrow().clone()
    }

    fn serve(&self, repo: &RepoId, call: FakeCall, page: u32) -> Result<FilePage> {
        self.calls.borrow_mut().push(call);
        {
            let mut repos = self.repos.borrow_mut();
            if !repos.contains(repo) {
                repos.push(repo.clone());
            }
        }
        if self.fail_on_page == Some(page) {
            return Err(anyhow!("upstream failure"));
        }
        let index = page.saturating_sub(1) as usize;
        Ok(FilePage {
            filenames: self.pages.get(index).cloned().unwrap_or_default(),
            has_next_page: index + 1 < self.pages.len(),
        })
    }
}

impl ChangedFilesApi for FakeApi {
    fn list_pull_request_files(&self, repo: &RepoId, number: u64, page: u32) -> Result<FilePage> {
        self.serve(repo, FakeCall::PullRequestFiles { number, page }, page)
    }

    fn compare_commits(
        &self,
        repo: &RepoId,
        base: &str,
        head: &str,
        page: u32,
    ) -> Result<FilePage> {
        let call = FakeCall::Compare {
            base: base.to_string(),
            head: head.to_string(),
            page,
        };
        self.serve(repo, call, page)
    }

    fn get_commit(&self, repo: &RepoId, reference: &str, page: u32) -> Result<FilePage> {
        let call = FakeCall::Commit {
            reference: reference.to_string(),
            page,
        };
        self.serve(repo, call, page)
    }
}

/// Build owned pages from string slices.
pub fn pages(pages: &[&[&str]]) -> Vec<Vec<String>> {
    pages
        .iter()
        .map(|page| page.iter().map(|path| path.to_string()).collect())
        .collect()
}

/// The three paths used across the pull-request scenarios.
pub fn sample_paths() -> Vec<String> {
    vec![
        "folder-1/sub-folder-1/file.txt".to_string(),
        "folder-1/sub-folder-2/file.txt".to_string(),
        "folder-2/sub-folder-1/file.txt".to_string(),
    ]
}

/// Pull-request event for `some-owner/some-repo`.
pub fn pull_request_event(number: u64) -> TriggerEvent {
    TriggerEvent {
        repository: Some(RepoId::new("some-owner", "some-repo")),
        pull_request_number: Some(number),
        before: None,
        after: None,
        current_ref: Some("1234567890123456789012345678901234567890".to_string()),
    }
}

/// Push event for `some-owner/some-repo`; the current ref is `after`.
pub fn push_event(before: &str, after: &str) -> TriggerEvent {
    TriggerEvent {
        repository: Some(RepoId::new("some-owner", "some-repo")),
        pull_request_number: None,
        before: Some(before.to_string()),
        after: Some(after.to_string()),
        current_ref: Some(after.to_string()),
    }
}
