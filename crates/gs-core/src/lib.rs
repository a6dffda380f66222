//! Core types, configuration, and utilities for git-scope.
//!
//! This crate provides the foundational types shared across the workspace:
//!
//! - Domain types ([`Repo`], [`RepoStatus`], [`FleetSummary`])
//! - Configuration loading and creation ([`Config`])
//! - Path expansion for user-supplied directories ([`expand_path`])
//! - Error types for configuration handling ([`ConfigError`])
//! - Type aliases for `FxHashMap`/`FxHashSet`

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod paths;
pub mod types;

pub use config::{
    ColorScheme, Config, DEFAULT_EDITOR, DEFAULT_IGNORE, FULL_SCAN_IGNORE, ScanSettings, TuiConfig,
};
pub use error::ConfigError;
pub use hash::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set, fx_hash_set_with_capacity};
pub use paths::{expand_path, expand_paths, home_dir, smart_default_roots};
pub use types::{FleetSummary, Repo, RepoStatus};
