//! Shared test utilities for the confkit workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`dir`]: [`TestDir`] temporary directory with file helpers
//! - [`schemas`]: a two-version `project` schema chain used across suites
//! - [`logging`]: opt-in tracing output for tests

pub mod dir;
pub mod logging;
pub mod schemas;

pub use dir::TestDir;
pub use logging::init_tracing;
