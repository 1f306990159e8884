// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Elementwise kernels of two buffers, including the paired-output and
//! scale/shift families.

use super::Affine;

/// C `fmod`: remainder with the sign of the dividend.
pub(crate) fn fmod(a: f32, b: f32) -> f32 {
    a % b
}

/// IEEE remainder: `a - b * n` where `n` is `a / b` rounded to nearest, ties to even.
pub(crate) fn frem(a: f32, b: f32) -> f32 {
    let (a, b) = (a as f64, b as f64);
    (a - b * (a / b).round_ties_even()) as f32
}

pub(crate) fn equals(a: f32, b: f32) -> f32 {
    if a == b {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn sincos(a: f32, _b: f32) -> (f32, f32) {
    a.sin_cos()
}

/// Integral and fractional parts, both carrying the sign of `a`.
pub(crate) fn modf(a: f32, _b: f32) -> (f32, f32) {
    (a.trunc(), super::unary::frac(a))
}

pub(crate) fn swap(a: f32, b: f32) -> (f32, f32) {
    (b, a)
}

/// `(sa*x + sha) / (sb*x + shb)`.
pub(crate) fn linear_frac_unary(x: f32, p: Affine) -> f32 {
    (p.scale_a * x + p.shift_a) / (p.scale_b * x + p.shift_b)
}

/// Two affine maps applied in sequence: `sb*(sa*x + sha) + shb`.
pub(crate) fn scale_shift_unary(x: f32, p: Affine) -> f32 {
    p.scale_b * (p.scale_a * x + p.shift_a) + p.shift_b
}

/// `(sa*a + sha) / (sb*b + shb)`.
pub(crate) fn linear_frac(a: f32, b: f32, p: Affine) -> f32 {
    (p.scale_a * a + p.shift_a) / (p.scale_b * b + p.shift_b)
}

/// `(sa*a + sha) + (sb*b + shb)`.
pub(crate) fn scale_shift(a: f32, b: f32, p: Affine) -> f32 {
    (p.scale_a * a + p.shift_a) + (p.scale_b * b + p.shift_b)
}
