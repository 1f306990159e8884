// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::sync::OnceLock;

use ferrum_config::tracing::{self as config_tracing, InitError};
use tracing::warn;

static INIT_GUARD: OnceLock<Result<(), InitError>> = OnceLock::new();

/// Installs the `FERRUM_LOG`-driven subscriber once per process.
///
/// Safe to call from every entry point; an already installed subscriber (ours
/// or the host application's) counts as success.
pub fn init_tracing() {
    let result = INIT_GUARD.get_or_init(|| match config_tracing::init_tracing() {
        Ok(()) | Err(InitError::AlreadyInitialised) => Ok(()),
        Err(err) => Err(err),
    });

    if let Err(err) = result {
        warn!("failed to initialise tracing subscriber: {err}");
    }
}
