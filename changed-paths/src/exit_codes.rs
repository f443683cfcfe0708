//! Stable exit codes for the `changed-paths` CLI.
//!
//! `2` is left to clap for command-line usage errors.

/// Evaluation finished and outputs were written (regardless of match results).
pub const OK: i32 = 0;
/// Missing input, invalid config file, or a pattern that does not compile.
pub const CONFIGURATION: i32 = 3;
/// The triggering event lacks repository identity or a ref to inspect.
pub const PRECONDITION: i32 = 4;
/// Fetching the changed files failed.
pub const RETRIEVAL: i32 = 5;
/// Writing outputs failed.
pub const OUTPUT: i32 = 6;
