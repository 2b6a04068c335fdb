//! Content loaders for reading effect data from files.
//!
//! This module provides loaders that convert RON/TOML files into
//! `effects-core` types. File-level shapes live in `*Spec` structures
//! and are converted after parsing so the core types never carry
//! loader-only fields.

pub mod config;
pub mod effects;

pub use config::ConfigLoader;
pub use effects::{EffectSpec, EffectsLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
