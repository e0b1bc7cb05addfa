//! Complex-analytic building blocks of the Calabi–Yau slice.
//!
//! The surface is the locus `z0ⁿ − z1ⁿ = 1` in ℂ², parametrized per patch as
//!
//! ```text
//! z0 = e^(2πi·k0/n) · cosh(x)^(2/n)
//! z1 = e^(2πi·k1/n) · sinh(x)^(2/n)
//! ```
//!
//! with `x = r + iθ`. All powers use the principal branch: the argument of the
//! base is taken in `(-π, π]` (cut along the negative real axis), which is the
//! convention of [`Complex64::powf`] and of `ln`/`exp`-based complex powers in
//! general. Picking another branch per patch folds the mesh, so every helper
//! here goes through the same power function.

use num_complex::Complex64;
use std::f64::consts::TAU;

/// Unit rotation `exp(i·2πk/n)` selecting one of the `n` sheets of a coordinate.
#[must_use]
pub fn phase_factor(k: f64, n: f64) -> Complex64 {
    Complex64::from_polar(1.0, TAU * k / n)
}

/// `(eˣ + e⁻ˣ) / 2`, the complex hyperbolic cosine.
#[must_use]
pub fn u0(x: Complex64) -> Complex64 {
    let a = x.exp();
    let b = (-x).exp();
    0.5 * (a + b)
}

/// `(eˣ - e⁻ˣ) / 2`, the complex hyperbolic sine.
#[must_use]
pub fn u1(x: Complex64) -> Complex64 {
    let a = x.exp();
    let b = (-x).exp();
    0.5 * (a - b)
}

/// Principal-branch power with a real exponent.
///
/// A zero base yields zero for every exponent so that the `sinh(0)` sample
/// at the centre of a patch stays finite.
#[must_use]
pub fn principal_pow(base: Complex64, exponent: f64) -> Complex64 {
    if base.re == 0.0 && base.im == 0.0 {
        return Complex64::new(0.0, 0.0);
    }
    base.powf(exponent)
}

/// First coordinate `z0` of patch sheet `k` at sample `r + iθ`.
#[must_use]
pub fn z0k(r: f64, theta: f64, n: f64, k: f64) -> Complex64 {
    let phase = phase_factor(k, n);
    let cos = u0(Complex64::new(r, theta));
    phase * principal_pow(cos, 2.0 / n)
}

/// Second coordinate `z1` of patch sheet `k` at sample `r + iθ`.
#[must_use]
pub fn z1k(r: f64, theta: f64, n: f64, k: f64) -> Complex64 {
    let phase = phase_factor(k, n);
    let sin = u1(Complex64::new(r, theta));
    phase * principal_pow(sin, 2.0 / n)
}
