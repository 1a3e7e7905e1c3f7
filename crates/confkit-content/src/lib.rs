//! Comment-preserving YAML editing for confkit
//!
//! Merges structural changes onto existing YAML text without disturbing
//! comments or ordering, canonicalizes blank-line placement, and diffs
//! parsed values.

pub mod diff;
pub mod document;
pub mod error;
pub mod format;
pub mod merge;
mod tree;

pub use diff::{SemanticChange, SemanticDiff, unified_text_diff};
pub use document::{YamlDocument, parse_yaml};
pub use error::{Error, Result};
pub use format::format_config;
pub use merge::merge;
