use std::path::PathBuf;

/// Directory or file holding the engine configuration when none is passed explicitly.
pub const CONFIG_VAR: &str = "FERRUM_CONFIG";
/// Worker thread count for the engine pool.
pub const THREADS_VAR: &str = "FERRUM_THREADS";
/// Minimum logical length before a call is split across the pool.
pub const PARALLEL_THRESHOLD_VAR: &str = "FERRUM_PARALLEL_THRESHOLD";
/// Truthy values force every call onto the calling thread.
pub const SEQUENTIAL_VAR: &str = "FERRUM_SEQUENTIAL";

/// Snapshot of the `FERRUM_*` environment variables that override file configuration.
///
/// Values that fail to parse are treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub config_path: Option<PathBuf>,
    pub threads: Option<usize>,
    pub parallel_threshold: Option<usize>,
    pub sequential: bool,
}

impl EnvOverrides {
    /// Reads the overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the overrides from an arbitrary key lookup. Tests use this to
    /// avoid mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_path = lookup(CONFIG_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        let threads = lookup(THREADS_VAR).and_then(|v| v.trim().parse::<usize>().ok());

        let parallel_threshold =
            lookup(PARALLEL_THRESHOLD_VAR).and_then(|v| v.trim().parse::<usize>().ok());

        let sequential = lookup(SEQUENTIAL_VAR)
            .map(|v| !matches!(v.trim(), "" | "0" | "false" | "False" | "off" | "OFF"))
            .unwrap_or(false);

        Self {
            config_path,
            threads,
            parallel_threshold,
            sequential,
        }
    }

    /// Effective parallel threshold after applying the sequential switch.
    pub fn effective_threshold(&self) -> Option<usize> {
        if self.sequential {
            Some(usize::MAX)
        } else {
            self.parallel_threshold
        }
    }

    /// Whether any engine setting is overridden (the config path does not count).
    pub fn overrides_engine(&self) -> bool {
        self.threads.is_some() || self.effective_threshold().is_some()
    }
}
