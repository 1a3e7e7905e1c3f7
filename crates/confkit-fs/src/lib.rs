//! Filesystem primitives for confkit
//!
//! Provides normalized path handling, atomic locked writes and a
//! format-agnostic store for small settings files.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, relative_path};
