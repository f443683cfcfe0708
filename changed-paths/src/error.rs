//! Failure taxonomy for an action invocation.
//!
//! Each variant names the phase that failed and maps to a stable exit code.
//! Messages carry the full context chain of the underlying error.

use thiserror::Error;

use crate::exit_codes;

#[derive(Debug, Error)]
pub enum ActionError {
    /// Missing input, bad config file, or a pattern that does not compile.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The triggering event cannot identify what to inspect.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// A page fetch failed or pagination did not finish.
    #[error("retrieval failed: {0}")]
    Retrieval(String),
    /// Results could not be written.
    #[error("output failed: {0}")]
    Output(String),
}

impl ActionError {
    pub fn configuration(err: impl Into<anyhow::Error>) -> Self {
        Self::Configuration(chain(err.into()))
    }

    pub fn retrieval(err: impl Into<anyhow::Error>) -> Self {
        Self::Retrieval(chain(err.into()))
    }

    pub fn output(err: impl Into<anyhow::Error>) -> Self {
        Self::Output(chain(err.into()))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => exit_codes::CONFIGURATION,
            Self::Precondition(_) => exit_codes::PRECONDITION,
            Self::Retrieval(_) => exit_codes::RETRIEVAL,
            Self::Output(_) => exit_codes::OUTPUT,
        }
    }
}

fn chain(err: anyhow::Error) -> String {
    format!("{err:#}")
}
