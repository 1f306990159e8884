// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! The engine handle and its elementwise entry points.
//!
//! Every entry point follows the same sequence: check that the engine is
//! open, check that the operands agree in extent, resolve the kernel for the
//! entry point's shape, then fill a fresh dense buffer by logical index. Any
//! failure happens before the output is allocated, so callers never observe
//! partial results.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use ferrum_config::EnvOverrides;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info};

use crate::buffer::Buffer;
use crate::config::{resolve_config_path, ConfigError, EngineConfig, LayeredConfig};
use crate::error::{FerrumError, PureResult};
use crate::kernels::{Affine, Kernel};
use crate::registry::{KernelRegistry, KernelSignature, Shape};
use crate::telemetry::observer;
use crate::view::{common_len, Operand};

/// Elements handed to one rayon task on the parallel path.
const CHUNK: usize = 4096;

/// Resolves `$name` under `$shape` and unwraps the matching kernel variant.
macro_rules! resolve {
    ($runtime:expr, $name:expr, $variant:ident, $shape:expr) => {
        match $runtime.registry.resolve($name, $shape)? {
            Kernel::$variant(f) => f,
            _ => return Err(FerrumError::unknown($name, $shape)),
        }
    };
}

/// Everything an open engine owns. Shared with in-flight calls so that a
/// concurrent [`Engine::close`] never pulls state out from under them.
#[derive(Debug)]
struct Runtime {
    registry: KernelRegistry,
    pool: ThreadPool,
    parallel_threshold: usize,
    source: Option<PathBuf>,
}

#[derive(Debug)]
enum EngineState {
    Open(Arc<Runtime>),
    Closed,
}

/// Handle to an initialised kernel engine.
///
/// The handle is `Send + Sync`; share it by reference or `Arc` to call it from
/// several threads at once. After [`Engine::close`] every call fails with
/// [`FerrumError::UseAfterClose`].
#[derive(Debug)]
pub struct Engine {
    state: RwLock<EngineState>,
}

impl Engine {
    /// Initialises an engine from the configuration at `config_path`.
    ///
    /// `config_path` may name a file or a directory holding `ferrum.toml`.
    /// Without it, `FERRUM_CONFIG`, `./lib` and `~/.ferrum` are searched, and
    /// the built-in defaults apply when none of them holds a configuration.
    pub fn init(config_path: Option<&Path>) -> PureResult<Self> {
        let env = EnvOverrides::from_env();
        let path = resolve_config_path(config_path, &env)?;
        let layered = LayeredConfig::load(path.as_deref(), &env)?;
        let source = layered.source().map(Path::to_path_buf);
        Self::build(layered.into_config(), KernelRegistry::builtin(), source)
    }

    /// Builds an engine from an already resolved configuration without any I/O.
    pub fn with_config(config: EngineConfig) -> PureResult<Self> {
        Self::build(config, KernelRegistry::builtin(), None)
    }

    /// Builds an engine over a caller-supplied registry. The `[kernels]`
    /// section of `config` is applied on top of it.
    pub fn with_registry(config: EngineConfig, registry: KernelRegistry) -> PureResult<Self> {
        Self::build(config, registry, None)
    }

    fn build(
        config: EngineConfig,
        mut registry: KernelRegistry,
        source: Option<PathBuf>,
    ) -> PureResult<Self> {
        registry.configure(&config.kernels)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.engine.threads)
            .thread_name(|idx| format!("ferrum-worker-{idx}"))
            .build()
            .map_err(ConfigError::from)?;

        info!(
            source = ?source,
            kernels = registry.len(),
            threads = pool.current_num_threads(),
            parallel_threshold = config.engine.parallel_threshold,
            "ferrum engine initialised"
        );

        let runtime = Runtime {
            registry,
            pool,
            parallel_threshold: config.engine.parallel_threshold,
            source,
        };
        Ok(Self {
            state: RwLock::new(EngineState::Open(Arc::new(runtime))),
        })
    }

    pub fn is_open(&self) -> bool {
        matches!(
            *self.state.read().unwrap_or_else(PoisonError::into_inner),
            EngineState::Open(_)
        )
    }

    /// Releases the registry and the worker pool.
    ///
    /// Calls already running finish against the state they started with.
    /// Closing twice reports [`FerrumError::UseAfterClose`].
    pub fn close(&self) -> PureResult<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match std::mem::replace(&mut *state, EngineState::Closed) {
            EngineState::Open(runtime) => {
                info!(source = ?runtime.source, "ferrum engine closed");
                Ok(())
            }
            EngineState::Closed => Err(FerrumError::UseAfterClose),
        }
    }

    fn runtime(&self) -> PureResult<Arc<Runtime>> {
        match &*self.state.read().unwrap_or_else(PoisonError::into_inner) {
            EngineState::Open(runtime) => Ok(Arc::clone(runtime)),
            EngineState::Closed => Err(FerrumError::UseAfterClose),
        }
    }

    /// Sorted kernel names available to the entry point of `shape`.
    pub fn names(&self, shape: Shape) -> PureResult<Vec<String>> {
        Ok(self.runtime()?.registry.names(shape))
    }

    pub fn signatures(&self) -> PureResult<Vec<KernelSignature>> {
        Ok(self.runtime()?.registry.signatures())
    }

    /// Worker threads in the engine pool.
    pub fn threads(&self) -> PureResult<usize> {
        Ok(self.runtime()?.pool.current_num_threads())
    }

    pub fn parallel_threshold(&self) -> PureResult<usize> {
        Ok(self.runtime()?.parallel_threshold)
    }

    /// Configuration file the engine was initialised from, if any.
    pub fn config_source(&self) -> PureResult<Option<PathBuf>> {
        Ok(self.runtime()?.source.clone())
    }

    /// `vect_bB`: `out[i] = f(a[i])`.
    pub fn unary<'a>(&self, name: &str, a: impl Into<Operand<'a>>) -> PureResult<Buffer> {
        let a = a.into();
        let runtime = self.runtime()?;
        let f = resolve!(runtime, name, Unary, Shape::Unary);
        let mut out = Buffer::zeroed(a.len());
        let parallel = runtime.fill(&mut out, |i| f(a.at(i)));
        finish(name, Shape::Unary, out.len(), parallel);
        Ok(out)
    }

    /// `vect_bfB`: `out[i] = f(a[i], scalar)`.
    pub fn unary_scalar<'a>(
        &self,
        name: &str,
        a: impl Into<Operand<'a>>,
        scalar: f32,
    ) -> PureResult<Buffer> {
        let a = a.into();
        let runtime = self.runtime()?;
        let f = resolve!(runtime, name, UnaryScalar, Shape::UnaryScalar);
        let mut out = Buffer::zeroed(a.len());
        let parallel = runtime.fill(&mut out, |i| f(a.at(i), scalar));
        finish(name, Shape::UnaryScalar, out.len(), parallel);
        Ok(out)
    }

    /// `vect_fbB`: `out[i] = f(scalar, a[i])`.
    pub fn scalar_unary<'a>(
        &self,
        name: &str,
        scalar: f32,
        a: impl Into<Operand<'a>>,
    ) -> PureResult<Buffer> {
        let a = a.into();
        let runtime = self.runtime()?;
        let f = resolve!(runtime, name, ScalarUnary, Shape::ScalarUnary);
        let mut out = Buffer::zeroed(a.len());
        let parallel = runtime.fill(&mut out, |i| f(scalar, a.at(i)));
        finish(name, Shape::ScalarUnary, out.len(), parallel);
        Ok(out)
    }

    /// `vect_bbB`: `out[i] = f(a[i], b[i])`.
    pub fn binary<'a, 'b>(
        &self,
        name: &str,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'b>>,
    ) -> PureResult<Buffer> {
        let (a, b) = (a.into(), b.into());
        let runtime = self.runtime()?;
        let len = common_len(&a, &b)?;
        let f = resolve!(runtime, name, Binary, Shape::Binary);
        let mut out = Buffer::zeroed(len);
        let parallel = runtime.fill(&mut out, |i| f(a.at(i), b.at(i)));
        finish(name, Shape::Binary, len, parallel);
        Ok(out)
    }

    /// `vect_bBB`: `(first[i], second[i]) = f(a[i], b[i])`.
    ///
    /// Both outputs are fresh buffers; `b` is never written.
    pub fn binary_pair<'a, 'b>(
        &self,
        name: &str,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'b>>,
    ) -> PureResult<(Buffer, Buffer)> {
        let (a, b) = (a.into(), b.into());
        let runtime = self.runtime()?;
        let len = common_len(&a, &b)?;
        let f = resolve!(runtime, name, BinaryPair, Shape::BinaryPair);
        let mut first = Buffer::zeroed(len);
        let mut second = Buffer::zeroed(len);
        let parallel = runtime.fill_pair(&mut first, &mut second, |i| f(a.at(i), b.at(i)));
        finish(name, Shape::BinaryPair, len, parallel);
        Ok((first, second))
    }

    /// `vect_bffffB`: `out[i] = f(a[i], affine)`.
    pub fn unary_affine<'a>(
        &self,
        name: &str,
        a: impl Into<Operand<'a>>,
        affine: Affine,
    ) -> PureResult<Buffer> {
        let a = a.into();
        let runtime = self.runtime()?;
        let f = resolve!(runtime, name, UnaryAffine, Shape::UnaryAffine);
        let mut out = Buffer::zeroed(a.len());
        let parallel = runtime.fill(&mut out, |i| f(a.at(i), affine));
        finish(name, Shape::UnaryAffine, out.len(), parallel);
        Ok(out)
    }

    /// `vect_bbffffB`: `out[i] = f(a[i], b[i], affine)`.
    pub fn binary_affine<'a, 'b>(
        &self,
        name: &str,
        a: impl Into<Operand<'a>>,
        b: impl Into<Operand<'b>>,
        affine: Affine,
    ) -> PureResult<Buffer> {
        let (a, b) = (a.into(), b.into());
        let runtime = self.runtime()?;
        let len = common_len(&a, &b)?;
        let f = resolve!(runtime, name, BinaryAffine, Shape::BinaryAffine);
        let mut out = Buffer::zeroed(len);
        let parallel = runtime.fill(&mut out, |i| f(a.at(i), b.at(i), affine));
        finish(name, Shape::BinaryAffine, len, parallel);
        Ok(out)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let EngineState::Open(runtime) = std::mem::replace(state, EngineState::Closed) {
            debug!(source = ?runtime.source, "ferrum engine dropped while open");
        }
    }
}

impl Runtime {
    fn is_parallel(&self, len: usize) -> bool {
        len >= self.parallel_threshold.max(1)
    }

    /// Writes `f(i)` into `out[i]`. Returns whether the pool was used.
    fn fill<F>(&self, out: &mut [f32], f: F) -> bool
    where
        F: Fn(usize) -> f32 + Sync,
    {
        if !self.is_parallel(out.len()) {
            for (idx, slot) in out.iter_mut().enumerate() {
                *slot = f(idx);
            }
            return false;
        }
        self.pool.install(|| {
            out.par_chunks_mut(CHUNK)
                .enumerate()
                .for_each(|(chunk, slots)| {
                    let base = chunk * CHUNK;
                    for (idx, slot) in slots.iter_mut().enumerate() {
                        *slot = f(base + idx);
                    }
                });
        });
        true
    }

    /// Two-output variant of [`Runtime::fill`].
    fn fill_pair<F>(&self, first: &mut [f32], second: &mut [f32], f: F) -> bool
    where
        F: Fn(usize) -> (f32, f32) + Sync,
    {
        if !self.is_parallel(first.len()) {
            for (idx, (x, y)) in first.iter_mut().zip(second.iter_mut()).enumerate() {
                (*x, *y) = f(idx);
            }
            return false;
        }
        self.pool.install(|| {
            first
                .par_chunks_mut(CHUNK)
                .zip(second.par_chunks_mut(CHUNK))
                .enumerate()
                .for_each(|(chunk, (xs, ys))| {
                    let base = chunk * CHUNK;
                    for (idx, (x, y)) in xs.iter_mut().zip(ys.iter_mut()).enumerate() {
                        (*x, *y) = f(base + idx);
                    }
                });
        });
        true
    }
}

fn finish(name: &str, shape: Shape, len: usize, parallel: bool) {
    debug!(kernel = name, %shape, len, parallel, "kernel call completed");
    observer::emit_call(name, shape, len, parallel);
}
