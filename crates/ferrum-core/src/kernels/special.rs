// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of Ferrum — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

//! Special functions evaluated in `f64` through `statrs` and narrowed to `f32`.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf as serf;
use statrs::function::gamma as sgamma;

pub(crate) fn erf(x: f32) -> f32 {
    serf::erf(x as f64) as f32
}

pub(crate) fn erfc(x: f32) -> f32 {
    serf::erfc(x as f64) as f32
}

/// Defined on `[-1, 1]`; NaN outside.
pub(crate) fn erf_inv(x: f32) -> f32 {
    if !(-1.0..=1.0).contains(&x) {
        return f32::NAN;
    }
    serf::erf_inv(x as f64) as f32
}

/// Defined on `[0, 2]`; NaN outside.
pub(crate) fn erfc_inv(x: f32) -> f32 {
    if !(0.0..=2.0).contains(&x) {
        return f32::NAN;
    }
    serf::erfc_inv(x as f64) as f32
}

/// Standard normal cumulative distribution function.
pub(crate) fn cdf_norm(x: f32) -> f32 {
    (0.5 * serf::erfc(-(x as f64) / SQRT_2)) as f32
}

/// Inverse of [`cdf_norm`]; defined on `[0, 1]`, NaN outside.
pub(crate) fn cdf_norm_inv(p: f32) -> f32 {
    if !(0.0..=1.0).contains(&p) {
        return f32::NAN;
    }
    (-SQRT_2 * serf::erfc_inv(2.0 * p as f64)) as f32
}

pub(crate) fn gamma(x: f32) -> f32 {
    sgamma::gamma(x as f64) as f32
}

/// `ln |Γ(x)|`, including negative non-integer arguments. Poles at zero and
/// the negative integers give `+inf`.
pub(crate) fn lgamma(x: f32) -> f32 {
    let x = x as f64;
    if x <= 0.0 && x == x.floor() {
        return f32::INFINITY;
    }
    if x < 0.5 {
        let reflected = (PI / (PI * x).sin().abs()).ln() - sgamma::ln_gamma(1.0 - x);
        reflected as f32
    } else {
        sgamma::ln_gamma(x) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn error_function_pairs_invert_each_other() {
        assert_relative_eq!(erf(0.5), 0.520_499_9, epsilon = 1e-6);
        assert_relative_eq!(erfc(0.5), 0.479_500_1, epsilon = 1e-6);
        assert_relative_eq!(erf_inv(erf(0.3)), 0.3, epsilon = 1e-5);
        assert_relative_eq!(erfc_inv(erfc(1.2)), 1.2, epsilon = 1e-4);
        assert!(erf_inv(1.5).is_nan());
        assert!(erfc_inv(-0.1).is_nan());
    }

    #[test]
    fn normal_cdf_and_quantile() {
        assert_relative_eq!(cdf_norm(0.0), 0.5, epsilon = 1e-7);
        assert_relative_eq!(cdf_norm(1.959_964), 0.975, epsilon = 1e-5);
        assert_relative_eq!(cdf_norm_inv(0.975), 1.959_964, epsilon = 1e-4);
        assert_relative_eq!(cdf_norm_inv(0.5), 0.0, epsilon = 1e-6);
        assert!(cdf_norm_inv(1.5).is_nan());
    }

    #[test]
    fn gamma_family() {
        assert_relative_eq!(gamma(5.0), 24.0, epsilon = 1e-3);
        assert_relative_eq!(gamma(0.5), PI.sqrt() as f32, epsilon = 1e-5);
        assert_relative_eq!(lgamma(10.0), 362_880f64.ln() as f32, epsilon = 1e-4);
        // Γ(-0.5) = -2√π, so ln|Γ(-0.5)| = ln(2√π).
        assert_relative_eq!(lgamma(-0.5), (2.0 * PI.sqrt()).ln() as f32, epsilon = 1e-4);
    }

    #[test]
    fn lgamma_is_infinite_at_poles() {
        for pole in [0.0f32, -0.0, -1.0, -2.0, -17.0] {
            assert_eq!(lgamma(pole), f32::INFINITY, "x = {pole}");
        }
        assert!(lgamma(-1.5).is_finite());
        assert!(lgamma(f32::NAN).is_nan());
    }
}
