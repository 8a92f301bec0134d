//! Significant-figure rounding for presenting results
//!
//! Rounding is half-away-from-zero on the scaled value (`2.345 -> 2.35` when
//! the scaled value is exactly representable). Values are rounded on their
//! binary representation, so a decimal tie that is not exactly representable
//! rounds toward the nearer neighbour.

use num_traits::Float;

/// Default number of significant figures used for display
pub const DEFAULT_SIGNIFICANT_FIGURES: u32 = 3;

/// Seventeen significant digits identify every `f64`, so more is a no-op
const MAX_SIGNIFICANT_FIGURES: u32 = 17;

/// Largest power of ten applied in one scaling step; keeps `10^k` finite
const MAX_SCALE_STEP: i32 = 300;

/// Round `x` to `n` significant figures
///
/// Zero and non-finite inputs are returned unchanged, `n == 0` is treated
/// as `1` and `n >= 17` returns `x` as is. If rounding up would overflow
/// (values within a rounding step of the type's maximum) the input is
/// returned unchanged.
///
/// # Example
/// ```
/// use uncertainty_calc::round_to_significant_figures;
///
/// assert_eq!(round_to_significant_figures(61.51, 3), 61.5);
/// assert_eq!(round_to_significant_figures(0.0001234, 3), 0.000123);
/// assert_eq!(round_to_significant_figures(123456.0, 2), 120000.0);
/// ```
pub fn round_to_significant_figures<T: Float>(x: T, n: u32) -> T {
    if x.is_zero() || !x.is_finite() || n >= MAX_SIGNIFICANT_FIGURES {
        return x;
    }
    let n = n.max(1) as i32;

    let magnitude = order_of_magnitude(x);
    // Digits to keep after the decimal point; negative rounds to tens, hundreds, ...
    let decimal_places = n - 1 - magnitude;

    let rounded = if decimal_places >= 0 {
        scale_down(scale_up(x, decimal_places).round(), decimal_places)
    } else {
        scale_up(scale_down(x, -decimal_places).round(), -decimal_places)
    };

    if rounded.is_finite() { rounded } else { x }
}

/// `floor(log10(|x|))`, corrected for inexact logarithms near powers of ten
fn order_of_magnitude<T: Float>(x: T) -> i32 {
    let abs = x.abs();
    let ten = T::from(10.0).unwrap_or_else(T::one);
    let magnitude = abs.log10().floor().to_i32().unwrap_or(0);

    // Mantissa in [1, 10) when the logarithm was exact
    let mantissa = if magnitude < 0 {
        scale_up(abs, -magnitude)
    } else {
        scale_down(abs, magnitude)
    };

    if mantissa < T::one() {
        magnitude - 1
    } else if mantissa >= ten {
        magnitude + 1
    } else {
        magnitude
    }
}

/// `x * 10^k` for `k >= 0`, split into steps so the factor never overflows
fn scale_up<T: Float>(mut x: T, mut k: i32) -> T {
    let ten = T::from(10.0).unwrap_or_else(T::one);
    while k > MAX_SCALE_STEP {
        x = x * ten.powi(MAX_SCALE_STEP);
        k -= MAX_SCALE_STEP;
    }
    x * ten.powi(k)
}

/// `x / 10^k` for `k >= 0`, split into steps so the divisor never overflows
fn scale_down<T: Float>(mut x: T, mut k: i32) -> T {
    let ten = T::from(10.0).unwrap_or_else(T::one);
    while k > MAX_SCALE_STEP {
        x = x / ten.powi(MAX_SCALE_STEP);
        k -= MAX_SCALE_STEP;
    }
    x / ten.powi(k)
}
