//! Match evaluation: patterns x changed paths -> labeled booleans.

use indexmap::IndexMap;

use crate::core::parser::PatternSet;
use crate::core::pattern::MatchPattern;
use crate::core::types::ChangeSet;

/// Output label used for an unnamed pattern list.
pub const DEFAULT_LABEL: &str = "has-changes";

/// Evaluated outputs, in the order they should be emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultMapping(IndexMap<String, bool>);

impl ResultMapping {
    pub fn get(&self, label: &str) -> Option<bool> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(label, matched)| (label.as_str(), *matched))
    }
}

impl FromIterator<(String, bool)> for ResultMapping {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Evaluate `patterns` against every path in `changes`.
///
/// Unnamed: one `has-changes` entry, true if any path matches any pattern.
/// Named: one entry per label, each computed independently.
pub fn evaluate(patterns: &PatternSet, changes: &ChangeSet) -> ResultMapping {
    match patterns {
        PatternSet::Unnamed(list) => {
            let matched = list.iter().any(|pattern| any_path_matches(pattern, changes));
            ResultMapping::from_iter([(DEFAULT_LABEL.to_string(), matched)])
        }
        PatternSet::Named(named) => named
            .iter()
            .map(|(label, pattern)| (label.clone(), any_path_matches(pattern, changes)))
            .collect(),
    }
}

fn any_path_matches(pattern: &MatchPattern, changes: &ChangeSet) -> bool {
    changes.iter().any(|path| pattern.is_match(path))
}
