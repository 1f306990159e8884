// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::fs;

use ferrum_core::config::CONFIG_FILE_NAME;
use ferrum_core::prelude::*;
use ferrum_core::ConfigError;

#[test]
fn init_from_directory_reads_ferrum_toml() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &file,
        r#"
        [engine]
        threads = 3

        [kernels]
        disabled = ["lgamma"]

        [kernels.aliases]
        plus = "add"
        "#,
    )
    .unwrap();

    let engine = Engine::init(Some(dir.path())).unwrap();
    assert_eq!(engine.config_source().unwrap(), Some(file));
    assert_eq!(engine.threads().unwrap(), 3);
    assert!(!engine.names(Shape::Unary).unwrap().contains(&"lgamma".to_string()));

    let sum = engine.binary("plus", &[1.0f32, 2.0], &[3.0f32, 4.0]).unwrap();
    assert_eq!(sum.to_string(), "[4.0, 6.0]");
    engine.close().unwrap();
}

#[test]
fn init_from_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("engine.json");
    fs::write(&file, r#"{"engine": {"threads": 1}}"#).unwrap();

    let engine = Engine::init(Some(&file)).unwrap();
    assert_eq!(engine.threads().unwrap(), 1);
}

#[test]
fn missing_path_fails_without_a_handle() {
    let dir = tempfile::tempdir().unwrap();
    let err = Engine::init(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(
        err,
        FerrumError::Config(ConfigError::NotFound { .. })
    ));

    // A directory without a configuration file is just as missing.
    let err = Engine::init(Some(dir.path())).unwrap_err();
    assert!(matches!(
        err,
        FerrumError::Config(ConfigError::NotFound { .. })
    ));
}

#[test]
fn malformed_files_are_config_errors() {
    let dir = tempfile::tempdir().unwrap();

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "[engine\nthreads = 2").unwrap();
    assert!(matches!(
        Engine::init(Some(&broken)),
        Err(FerrumError::Config(ConfigError::Toml { .. }))
    ));

    let unknown = dir.path().join("unknown.toml");
    fs::write(&unknown, "[engine]\nspeed = \"fast\"\n").unwrap();
    assert!(matches!(
        Engine::init(Some(&unknown)),
        Err(FerrumError::Config(ConfigError::Invalid { .. }))
    ));

    let bad_alias = dir.path().join("alias.toml");
    fs::write(&bad_alias, "[kernels.aliases]\nplus = \"addition\"\n").unwrap();
    let err = Engine::init(Some(&bad_alias)).unwrap_err();
    assert!(err.to_string().contains("addition"));
}
