//! Process-level knobs shared by the Ferrum crates: the tracing subscriber and
//! the `FERRUM_*` environment overrides consulted when an engine is built.

pub mod env;
pub mod tracing;

pub use env::EnvOverrides;
