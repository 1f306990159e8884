use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directives are read from this variable before falling back to `RUST_LOG`.
pub const LOG_VAR: &str = "FERRUM_LOG";
/// When set to a file path, a Chrome trace is written there in addition to the fmt output.
pub const TRACE_CHROME_VAR: &str = "FERRUM_TRACE_CHROME";

static INITIALISED: OnceLock<()> = OnceLock::new();
static CHROME_GUARD: OnceLock<Mutex<Option<tracing_chrome::FlushGuard>>> = OnceLock::new();

/// Configures the global tracing subscriber.
pub fn init_tracing() -> Result<(), InitError> {
    INITIALISED
        .set(())
        .map_err(|_| InitError::AlreadyInitialised)?;

    let ansi = std::io::stdout().is_terminal();
    let filter = EnvFilter::try_from_env(LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi);

    let chrome_layer = match chrome_trace_path()? {
        Some(path) => {
            let (layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            let cell = CHROME_GUARD.get_or_init(|| Mutex::new(None));
            if let Ok(mut slot) = cell.lock() {
                *slot = Some(guard);
            }
            Some(layer)
        }
        None => None,
    };

    Registry::default()
        .with(filter)
        .with(fmt_layer)
        .with(chrome_layer)
        .try_init()
        .map_err(|err| InitError::Subscriber(err.to_string()))
}

/// Flushes and drops the Chrome trace writer, if one was installed.
pub fn flush_chrome_trace() {
    if let Some(cell) = CHROME_GUARD.get() {
        if let Ok(mut slot) = cell.lock() {
            slot.take();
        }
    }
}

fn chrome_trace_path() -> Result<Option<PathBuf>, InitError> {
    match std::env::var(TRACE_CHROME_VAR) {
        Ok(raw) if !raw.trim().is_empty() => Ok(Some(PathBuf::from(raw))),
        Ok(_) => Ok(None),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(InitError::Env(err)),
    }
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("tracing has already been initialised")]
    AlreadyInitialised,
    #[error("failed to read FERRUM_TRACE_CHROME: {0}")]
    Env(std::env::VarError),
    #[error("another global subscriber is already installed: {0}")]
    Subscriber(String),
}
