//! Shared deterministic types for the changed-path engine.
//!
//! These types carry data between the pure core and the I/O layer. They are
//! built once per invocation and never mutated afterwards.

use std::fmt;

/// Repository identity (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name` (the `GITHUB_REPOSITORY` format).
    pub fn parse_slug(slug: &str) -> Option<Self> {
        let (owner, name) = slug.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Triggering-event fields the engine consumes.
///
/// Empty strings are normalized to `None` by the constructors in `io::event`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerEvent {
    pub repository: Option<RepoId>,
    pub pull_request_number: Option<u64>,
    pub before: Option<String>,
    pub after: Option<String>,
    /// Ref used for the single-commit fallback (commit SHA preferred).
    pub current_ref: Option<String>,
}

/// Every changed path in the evaluated range, in retrieval order.
///
/// Duplicates are kept; evaluation only tests existence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet(Vec<String>);

impl ChangeSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn extend_page(&mut self, page: Vec<String>) {
        self.0.extend(page);
    }

    pub fn into_paths(self) -> Vec<String> {
        self.0
    }
}

impl FromIterator<String> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
