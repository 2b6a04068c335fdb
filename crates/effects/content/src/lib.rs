//! Data-driven effect content and loaders.
//!
//! This crate houses the built-in effect catalog and provides loaders
//! for RON/TOML data files:
//! - Effect catalogs (data-driven via RON)
//! - Engine configuration (data-driven via TOML)
//!
//! Content is consumed by the engine at startup and never appears in
//! runtime state. All loaders convert file-level `*Spec` structures into
//! `effects-core` types.

pub mod builtin;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use builtin::builtin_catalog;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, EffectSpec, EffectsLoader};
