// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Engine configuration.
//!
//! Settings are resolved once, when an engine is initialised, by layering the
//! built-in defaults, an optional TOML/JSON file and the `FERRUM_*` environment
//! overrides (see [`ferrum_config::env`]).

pub mod layered;
pub mod locate;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub use layered::{ConfigDiffEvent, ConfigLayer, LayeredConfig};
pub use locate::{resolve_config_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Logical length from which calls are split across the worker pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 65_536;

/// Fully resolved engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub engine: EngineSection,
    pub kernels: KernelsSection,
}

/// `[engine]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// Worker threads; `0` uses the available parallelism.
    pub threads: usize,
    /// Minimum logical length for parallel execution.
    pub parallel_threshold: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            threads: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// `[kernels]`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KernelsSection {
    /// Names removed from every shape.
    pub disabled: Vec<String>,
    /// `alias = "existing name"`.
    pub aliases: BTreeMap<String, String>,
}

/// Errors raised while locating, reading or applying configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse JSON {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("configuration path {path:?} does not exist")]
    NotFound { path: PathBuf },
    #[error("unsupported configuration format for {path:?}; expected .toml or .json")]
    UnsupportedFormat { path: PathBuf },
    #[error("invalid configuration (source: {path:?}): {source}")]
    Invalid {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
    #[error("alias '{alias}' points at unknown kernel '{target}'")]
    UnknownAlias { alias: String, target: String },
    #[error("alias '{alias}' collides with an existing kernel")]
    AliasConflict { alias: String },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
