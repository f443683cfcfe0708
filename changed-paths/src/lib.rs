//! Changed-path evaluation for CI events.
//!
//! Given a pattern spec and a triggering event, this crate fetches every file
//! path changed by the pull request or push and reports whether any of them
//! match. The architecture keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (pattern parsing, strategy
//!   selection, evaluation). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config and event files, provider
//!   API, outputs). Isolated behind traits where tests need fakes.
//!
//! Orchestration modules ([`retrieve`], [`run`]) coordinate core logic with
//! I/O to implement CLI commands.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod retrieve;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
