// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Built-in kernel vocabulary.
//!
//! Kernels are plain function pointers over `f32` values. They carry no state,
//! which is what lets the engine split an index range across threads without
//! changing results. Numeric behaviour follows the `f32` methods of the
//! standard library (IEEE-754, NaN in means NaN out, `round` rounds half away
//! from zero); the special functions go through `statrs` in `f64`.

mod binary;
mod special;
mod unary;

use crate::registry::Shape;

/// The four scalars of the `bffffB` / `bbffffB` families: two scale/shift pairs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Affine {
    pub scale_a: f32,
    pub shift_a: f32,
    pub scale_b: f32,
    pub shift_b: f32,
}

impl Affine {
    pub const fn new(scale_a: f32, shift_a: f32, scale_b: f32, shift_b: f32) -> Self {
        Self {
            scale_a,
            shift_a,
            scale_b,
            shift_b,
        }
    }
}

/// A resolved kernel, tagged by shape.
#[derive(Clone, Copy, Debug)]
pub enum Kernel {
    /// `bB`
    Unary(fn(f32) -> f32),
    /// `bfB`: element first, scalar second.
    UnaryScalar(fn(f32, f32) -> f32),
    /// `fbB`: scalar first, element second.
    ScalarUnary(fn(f32, f32) -> f32),
    /// `bbB`
    Binary(fn(f32, f32) -> f32),
    /// `bBB`
    BinaryPair(fn(f32, f32) -> (f32, f32)),
    /// `bffffB`
    UnaryAffine(fn(f32, Affine) -> f32),
    /// `bbffffB`
    BinaryAffine(fn(f32, f32, Affine) -> f32),
}

impl Kernel {
    pub fn shape(&self) -> Shape {
        match self {
            Kernel::Unary(_) => Shape::Unary,
            Kernel::UnaryScalar(_) => Shape::UnaryScalar,
            Kernel::ScalarUnary(_) => Shape::ScalarUnary,
            Kernel::Binary(_) => Shape::Binary,
            Kernel::BinaryPair(_) => Shape::BinaryPair,
            Kernel::UnaryAffine(_) => Shape::UnaryAffine,
            Kernel::BinaryAffine(_) => Shape::BinaryAffine,
        }
    }
}

/// Every kernel registered by [`crate::registry::KernelRegistry::builtin`].
pub fn builtin() -> Vec<(&'static str, Kernel)> {
    use Kernel::*;

    vec![
        // bB
        ("abs", Unary(f32::abs)),
        ("acos", Unary(f32::acos)),
        ("acosh", Unary(f32::acosh)),
        ("asin", Unary(f32::asin)),
        ("asinh", Unary(f32::asinh)),
        ("atan", Unary(f32::atan)),
        ("atanh", Unary(f32::atanh)),
        ("cbrt", Unary(f32::cbrt)),
        ("cdf_norm", Unary(special::cdf_norm)),
        ("cdf_norm_inv", Unary(special::cdf_norm_inv)),
        ("ceil", Unary(f32::ceil)),
        ("copy", Unary(|x| x)),
        ("cos", Unary(f32::cos)),
        ("cosh", Unary(f32::cosh)),
        ("erf", Unary(special::erf)),
        ("erf_inv", Unary(special::erf_inv)),
        ("erfc", Unary(special::erfc)),
        ("erfc_inv", Unary(special::erfc_inv)),
        ("exp", Unary(f32::exp)),
        ("exp10", Unary(unary::exp10)),
        ("exp2", Unary(f32::exp2)),
        ("expm1", Unary(f32::exp_m1)),
        ("floor", Unary(f32::floor)),
        ("frac", Unary(unary::frac)),
        ("gamma", Unary(special::gamma)),
        ("inv", Unary(unary::inv)),
        ("inv_cbrt", Unary(unary::inv_cbrt)),
        ("inv_sqrt", Unary(unary::inv_sqrt)),
        ("lgamma", Unary(special::lgamma)),
        ("log", Unary(f32::ln)),
        ("log10", Unary(f32::log10)),
        ("log1p", Unary(f32::ln_1p)),
        ("log2", Unary(f32::log2)),
        ("pow2o3", Unary(unary::pow2o3)),
        ("pow3o2", Unary(unary::pow3o2)),
        ("ramp", Unary(unary::ramp)),
        ("relu", Unary(unary::ramp)),
        ("round", Unary(f32::round)),
        ("sigmoid", Unary(unary::sigmoid)),
        ("sin", Unary(f32::sin)),
        ("sinh", Unary(f32::sinh)),
        ("sqr", Unary(unary::sqr)),
        ("sqrt", Unary(f32::sqrt)),
        ("tan", Unary(f32::tan)),
        ("tanh", Unary(f32::tanh)),
        ("trunc", Unary(f32::trunc)),
        // bfB
        ("powx", UnaryScalar(f32::powf)),
        ("set", UnaryScalar(|_, s| s)),
        ("relu", UnaryScalar(unary::leaky_relu)),
        ("elu", UnaryScalar(unary::elu)),
        // fbB
        ("relu", ScalarUnary(|alpha, x| unary::leaky_relu(x, alpha))),
        ("elu", ScalarUnary(|alpha, x| unary::elu(x, alpha))),
        // bbB
        ("add", Binary(|a, b| a + b)),
        ("sub", Binary(|a, b| a - b)),
        ("mul", Binary(|a, b| a * b)),
        ("div", Binary(|a, b| a / b)),
        ("pow", Binary(f32::powf)),
        ("hypot", Binary(f32::hypot)),
        ("atan2", Binary(f32::atan2)),
        ("fmax", Binary(f32::max)),
        ("fmin", Binary(f32::min)),
        ("fmod", Binary(binary::fmod)),
        ("frem", Binary(binary::frem)),
        ("copysign", Binary(f32::copysign)),
        ("equals", Binary(binary::equals)),
        // bBB
        ("sincos", BinaryPair(binary::sincos)),
        ("modf", BinaryPair(binary::modf)),
        ("swap", BinaryPair(binary::swap)),
        // bffffB
        ("linear_frac", UnaryAffine(binary::linear_frac_unary)),
        ("scale_shift", UnaryAffine(binary::scale_shift_unary)),
        // bbffffB
        ("linear_frac", BinaryAffine(binary::linear_frac)),
        ("scale_shift", BinaryAffine(binary::scale_shift)),
    ]
}
