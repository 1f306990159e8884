// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Elementwise kernels of one buffer, optionally with one scalar.

/// `1 / x`.
pub(crate) fn inv(x: f32) -> f32 {
    x.recip()
}

pub(crate) fn inv_sqrt(x: f32) -> f32 {
    x.sqrt().recip()
}

pub(crate) fn inv_cbrt(x: f32) -> f32 {
    x.cbrt().recip()
}

/// `x^(2/3)`, real-valued for negative inputs.
pub(crate) fn pow2o3(x: f32) -> f32 {
    let c = x.cbrt();
    c * c
}

/// `x^(3/2)`; NaN for negative inputs.
pub(crate) fn pow3o2(x: f32) -> f32 {
    let s = x.sqrt();
    s * s * s
}

pub(crate) fn exp10(x: f32) -> f32 {
    10f32.powf(x)
}

pub(crate) fn sqr(x: f32) -> f32 {
    x * x
}

/// Fractional part with the sign of `x`; zero for infinities.
pub(crate) fn frac(x: f32) -> f32 {
    if x.is_infinite() {
        0f32.copysign(x)
    } else {
        x - x.trunc()
    }
}

/// `max(x, 0)`; NaN propagates.
pub(crate) fn ramp(x: f32) -> f32 {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}

pub(crate) fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Leaky rectifier: `x` for positive inputs, `alpha * x` otherwise.
pub(crate) fn leaky_relu(x: f32, alpha: f32) -> f32 {
    if x > 0.0 {
        x
    } else {
        alpha * x
    }
}

/// Exponential linear unit: `x` for positive inputs, `alpha * (e^x - 1)` otherwise.
pub(crate) fn elu(x: f32, alpha: f32) -> f32 {
    if x > 0.0 {
        x
    } else {
        alpha * x.exp_m1()
    }
}
