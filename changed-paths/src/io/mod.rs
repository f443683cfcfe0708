//! I/O helpers: configuration, event payloads, provider API, outputs.

pub mod config;
pub mod event;
pub mod github;
pub mod outputs;
