// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use thiserror::Error;

use crate::config::ConfigError;
use crate::registry::Shape;
use crate::view::Extent;

/// Errors reported by views, the registry and the engine.
///
/// Every failure is reported synchronously to the caller of the failing call
/// and leaves the engine in the state it had before the call.
#[derive(Debug, Error)]
pub enum FerrumError {
    /// Engine construction failed to resolve, read or parse its configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The engine was closed before (or while) the call was made.
    #[error("engine has been closed")]
    UseAfterClose,
    /// A view addresses elements beyond the end of its backing slice, or has a
    /// zero stride.
    #[error(
        "view out of bounds: offset {offset}, stride {stride}, length {len} over {available} elements"
    )]
    OutOfBounds {
        offset: usize,
        stride: usize,
        len: usize,
        available: usize,
    },
    /// Matrix view parameters are inconsistent with each other.
    #[error("invalid matrix layout: {reason}")]
    InvalidLayout { reason: &'static str },
    /// Vector operands of one call disagree in logical length.
    #[error("length mismatch: expected {expected} elements, got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// Operands of one call disagree in dimensions or region.
    #[error("extent mismatch: {left} cannot be combined with {right}")]
    ExtentMismatch { left: Extent, right: Extent },
    /// No kernel is registered under the name for the invoked shape.
    #[error("unknown operation '{name}' for shape {shape}")]
    UnknownOperation { name: String, shape: Shape },
    /// A kernel with the same name and shape is already registered.
    #[error("operation '{name}' is already registered for shape {shape}")]
    DuplicateOperation { name: String, shape: Shape },
}

impl FerrumError {
    pub(crate) fn unknown(name: &str, shape: Shape) -> Self {
        FerrumError::UnknownOperation {
            name: name.to_string(),
            shape,
        }
    }
}

/// Convenience alias used throughout `ferrum-core`.
pub type PureResult<T> = Result<T, FerrumError>;
