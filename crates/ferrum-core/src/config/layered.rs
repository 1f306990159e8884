// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use core::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ferrum_config::EnvOverrides;
use serde_json::{Map, Value};
use tracing::debug;

use super::{ConfigError, EngineConfig};

/// Layer that changed a configuration field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigLayer {
    File,
    Env,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLayer::File => write!(f, "file"),
            ConfigLayer::Env => write!(f, "env"),
        }
    }
}

/// Diff emitted while applying a layer on top of the defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigDiffEvent {
    pub layer: ConfigLayer,
    pub path: String,
    pub previous: Option<Value>,
    pub current: Option<Value>,
}

/// Configuration obtained by merging defaults → file → environment.
#[derive(Clone, Debug)]
pub struct LayeredConfig {
    config: EngineConfig,
    source: Option<PathBuf>,
    events: Vec<ConfigDiffEvent>,
}

impl LayeredConfig {
    /// Built-in defaults only.
    pub fn defaults() -> Self {
        Self {
            config: EngineConfig::default(),
            source: None,
            events: Vec::new(),
        }
    }

    /// Loads `path` (if any) over the defaults, then applies `env`.
    ///
    /// The file format is picked from the extension. Unknown fields in either
    /// layer are rejected when the merged value is deserialised.
    pub fn load(path: Option<&Path>, env: &EnvOverrides) -> Result<Self, ConfigError> {
        let mut value = serde_json::to_value(EngineConfig::default())
            .map_err(|source| ConfigError::Invalid { path: None, source })?;
        let mut events = Vec::new();

        if let Some(path) = path {
            let layer = load_file(path)?;
            apply_layer(&mut value, &layer, ConfigLayer::File, &mut events);
        }
        if let Some(layer) = env_layer(env) {
            apply_layer(&mut value, &layer, ConfigLayer::Env, &mut events);
        }

        let config: EngineConfig =
            serde_json::from_value(value).map_err(|source| ConfigError::Invalid {
                path: path.map(Path::to_path_buf),
                source,
            })?;

        for event in &events {
            debug!(
                layer = %event.layer,
                field = %event.path,
                previous = ?event.previous,
                current = ?event.current,
                "configuration field overridden"
            );
        }

        Ok(Self {
            config,
            source: path.map(Path::to_path_buf),
            events,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn into_config(self) -> EngineConfig {
        self.config
    }

    /// File the configuration was read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn events(&self) -> &[ConfigDiffEvent] {
        &self.events
    }
}

fn load_file(path: &Path) -> Result<Value, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => load_toml(path),
        Some("json") => load_json(path),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_toml(path: &Path) -> Result<Value, ConfigError> {
    let value: toml::Value = toml::from_str(&read(path)?).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_value(value).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_json(path: &Path) -> Result<Value, ConfigError> {
    serde_json::from_str(&read(path)?).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn env_layer(env: &EnvOverrides) -> Option<Value> {
    if !env.overrides_engine() {
        return None;
    }
    let mut engine = Map::new();
    if let Some(threads) = env.threads {
        engine.insert("threads".into(), Value::from(threads));
    }
    if let Some(threshold) = env.effective_threshold() {
        engine.insert("parallel_threshold".into(), Value::from(threshold));
    }
    let mut root = Map::new();
    root.insert("engine".into(), Value::Object(engine));
    Some(Value::Object(root))
}

fn apply_layer(
    dest: &mut Value,
    layer: &Value,
    kind: ConfigLayer,
    events: &mut Vec<ConfigDiffEvent>,
) {
    let before = dest.clone();
    merge(dest, layer);
    diff(&before, dest, &mut Vec::new(), kind, events);
}

fn merge(dest: &mut Value, src: &Value) {
    match (dest, src) {
        (Value::Object(dest_map), Value::Object(src_map)) => {
            for (key, value) in src_map {
                match dest_map.get_mut(key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        dest_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (dest_slot, src_value) => {
            *dest_slot = src_value.clone();
        }
    }
}

fn diff(
    before: &Value,
    after: &Value,
    path: &mut Vec<String>,
    layer: ConfigLayer,
    out: &mut Vec<ConfigDiffEvent>,
) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(before_map), Value::Object(after_map)) => {
            let mut keys: Vec<&String> = before_map.keys().chain(after_map.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                path.push(key.clone());
                let before_child = before_map.get(key).unwrap_or(&Value::Null);
                let after_child = after_map.get(key).unwrap_or(&Value::Null);
                diff(before_child, after_child, path, layer, out);
                path.pop();
            }
        }
        _ => {
            out.push(ConfigDiffEvent {
                layer,
                path: path.join("."),
                previous: (!before.is_null()).then(|| before.clone()),
                current: (!after.is_null()).then(|| after.clone()),
            });
        }
    }
}
