// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

pub mod observer;
pub mod trace_init;

pub use observer::{set_call_observer, CallObserver, KernelCallEvent};
pub use trace_init::init_tracing;
