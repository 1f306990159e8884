// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Strided `f32` vector-math kernels behind a named dispatch table.
//!
//! An [`Engine`] owns a registry of elementwise kernels grouped by shape
//! (`bB`, `bfB`, `fbB`, `bbB`, `bBB`, `bffffB`, `bbffffB`). Callers pass
//! borrowed [`BufferView`]s or [`MatrixView`]s (or plain slices) and receive a
//! fresh dense [`Buffer`].
//!
//! ```no_run
//! use ferrum_core::{BufferView, Engine};
//!
//! let engine = Engine::init(None)?;
//! let sum = engine.binary("add", &[1.0f32, 2.0, 3.0, 4.0], &[5.0f32, 6.0, 7.0, 8.0])?;
//! assert_eq!(sum.to_string(), "[6.0, 8.0, 10.0, 12.0]");
//!
//! let data = [1.0f32, -1.0, 4.0, -1.0, 9.0];
//! let roots = engine.unary("sqrt", BufferView::strided(&data, 0, 2)?)?;
//! assert_eq!(roots.as_slice(), &[1.0f32, 2.0, 3.0][..]);
//! engine.close()?;
//! # Ok::<(), ferrum_core::FerrumError>(())
//! ```

pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod kernels;
pub mod registry;
pub mod telemetry;
pub mod view;

pub use buffer::{format_values, Buffer};
pub use config::{ConfigError, EngineConfig, EngineSection, KernelsSection};
pub use engine::Engine;
pub use error::{FerrumError, PureResult};
pub use kernels::{Affine, Kernel};
pub use registry::{KernelRegistry, KernelSignature, Shape};
pub use view::{BufferView, Extent, MatrixView, Operand, Region};

pub mod prelude {
    pub use crate::buffer::{format_values, Buffer};
    pub use crate::engine::Engine;
    pub use crate::error::{FerrumError, PureResult};
    pub use crate::kernels::Affine;
    pub use crate::registry::Shape;
    pub use crate::view::{BufferView, MatrixView, Operand};
}
