//! Compiled path matchers.
//!
//! Every leaf token of a pattern spec becomes a [`MatchPattern`]. Regex and
//! literal tokens compile to the same representation, so evaluation never
//! needs to know which form the user wrote.

use std::str::FromStr;

use clap::ValueEnum;
use regex::Regex;
use thiserror::Error;

/// How leaf tokens of a pattern spec are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchMode {
    /// Tokens are regular expressions (`folder-2/*` means `folder-2` followed by `/`s).
    #[default]
    Regex,
    /// Tokens are plain strings; metacharacters are escaped before compiling.
    Literal,
}

/// Case-insensitive; an empty value (unset workflow input) is the default mode.
impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        <Self as ValueEnum>::from_str(s, true)
    }
}

/// A token that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern '{token}': {reason}")]
pub struct PatternError {
    pub token: String,
    pub reason: String,
}

/// A compiled matcher tested against a single changed path.
///
/// Matching is unanchored: the pattern matches if it finds any substring of
/// the path, unless the token itself carries `^`/`$`.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    source: String,
    regex: Regex,
}

impl MatchPattern {
    pub fn compile(token: &str, mode: MatchMode) -> Result<Self, PatternError> {
        let expr = match mode {
            MatchMode::Regex => token.to_string(),
            MatchMode::Literal => regex::escape(token),
        };
        let regex = Regex::new(&expr).map_err(|err| PatternError {
            token: token.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            source: token.to_string(),
            regex,
        })
    }

    /// The token as written in the pattern spec.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

impl PartialEq for MatchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.regex.as_str() == other.regex.as_str()
    }
}

impl Eq for MatchPattern {}
