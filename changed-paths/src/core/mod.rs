//! Deterministic, pure logic for changed-path evaluation.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod evaluator;
pub mod parser;
pub mod pattern;
pub mod strategy;
pub mod types;
