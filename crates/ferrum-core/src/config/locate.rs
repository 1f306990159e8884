// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::path::{Path, PathBuf};

use ferrum_config::EnvOverrides;

use super::ConfigError;

/// File looked up inside configuration directories.
pub const CONFIG_FILE_NAME: &str = "ferrum.toml";
/// JSON alternative accepted when no TOML file is present in a directory.
pub const CONFIG_JSON_NAME: &str = "ferrum.json";
/// Directory, relative to the working directory, searched when nothing is configured.
pub const CONFIG_DIR_NAME: &str = "lib";
/// Directory under the user's home searched last.
pub const HOME_DIR_NAME: &str = ".ferrum";

/// Resolves which configuration file an engine should load.
///
/// An explicit path wins, then `FERRUM_CONFIG`. Either may name a file or a
/// directory holding [`CONFIG_FILE_NAME`]; a named location that does not
/// exist is an error. Without either, `./lib/ferrum.toml` and then
/// `~/.ferrum/ferrum.toml` are tried, and `Ok(None)` means built-in defaults.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: &EnvOverrides,
) -> Result<Option<PathBuf>, ConfigError> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = dirs::home_dir();
    resolve_in(explicit, env, &cwd, home.as_deref())
}

fn resolve_in(
    explicit: Option<&Path>,
    env: &EnvOverrides,
    cwd: &Path,
    home: Option<&Path>,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(named) = explicit.or(env.config_path.as_deref()) {
        return named_location(named).map(Some);
    }

    let fallbacks = [
        Some(cwd.join(CONFIG_DIR_NAME)),
        home.map(|home| home.join(HOME_DIR_NAME)),
    ];
    Ok(fallbacks
        .into_iter()
        .flatten()
        .find_map(|dir| config_in_dir(&dir)))
}

fn named_location(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        return config_in_dir(path).ok_or_else(|| ConfigError::NotFound {
            path: path.join(CONFIG_FILE_NAME),
        });
    }
    Err(ConfigError::NotFound {
        path: path.to_path_buf(),
    })
}

fn config_in_dir(dir: &Path) -> Option<PathBuf> {
    [CONFIG_FILE_NAME, CONFIG_JSON_NAME]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn explicit_file_and_directory_forms() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&file, "").unwrap();
        let env = EnvOverrides::default();

        let resolved = resolve_in(Some(&file), &env, dir.path(), None).unwrap();
        assert_eq!(resolved, Some(file.clone()));

        let resolved = resolve_in(Some(dir.path()), &env, dir.path(), None).unwrap();
        assert_eq!(resolved, Some(file));
    }

    #[test]
    fn missing_named_locations_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let env = EnvOverrides::default();

        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            resolve_in(Some(&missing), &env, dir.path(), None),
            Err(ConfigError::NotFound { .. })
        ));

        // A directory without a configuration file is also an error.
        assert!(matches!(
            resolve_in(Some(dir.path()), &env, dir.path(), None),
            Err(ConfigError::NotFound { .. })
        ));

        let env = EnvOverrides {
            config_path: Some(missing),
            ..EnvOverrides::default()
        };
        assert!(resolve_in(None, &env, dir.path(), None).is_err());
    }

    #[test]
    fn explicit_path_wins_over_environment() {
        let dir = tempfile::tempdir().unwrap();
        let chosen = dir.path().join("chosen.json");
        fs::write(&chosen, "{}").unwrap();
        let env = EnvOverrides {
            config_path: Some(dir.path().join("ignored.toml")),
            ..EnvOverrides::default()
        };
        let resolved = resolve_in(Some(&chosen), &env, dir.path(), None).unwrap();
        assert_eq!(resolved, Some(chosen));
    }

    #[test]
    fn falls_back_to_lib_then_home() {
        let cwd = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let env = EnvOverrides::default();

        assert_eq!(
            resolve_in(None, &env, cwd.path(), Some(home.path())).unwrap(),
            None
        );

        let home_dir = home.path().join(HOME_DIR_NAME);
        fs::create_dir(&home_dir).unwrap();
        let home_file = home_dir.join(CONFIG_FILE_NAME);
        fs::write(&home_file, "").unwrap();
        assert_eq!(
            resolve_in(None, &env, cwd.path(), Some(home.path())).unwrap(),
            Some(home_file)
        );

        let lib = cwd.path().join(CONFIG_DIR_NAME);
        fs::create_dir(&lib).unwrap();
        let lib_file = lib.join(CONFIG_FILE_NAME);
        fs::write(&lib_file, "").unwrap();
        assert_eq!(
            resolve_in(None, &env, cwd.path(), Some(home.path())).unwrap(),
            Some(lib_file)
        );
    }
}
