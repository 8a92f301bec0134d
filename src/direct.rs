//! Direct-value combination of measurements without a formula
//!
//! Sums use the linear (worst-case) sum of absolute uncertainties, while
//! products and quotients add relative uncertainties in quadrature. Neither is
//! interchangeable with [`crate::propagate`], which always works in
//! quadrature on absolute contributions.

use tracing::debug;

use crate::{PropagationError, PropagationResult};

/// How a term enters a multiplicative combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Multiply,
    Divide,
}

/// Q = Σ vᵢ with ΔQ = Σ Δvᵢ
///
/// Signs are carried by the values: negate a value to subtract it.
///
/// # Example
/// ```
/// use uncertainty_calc::combine_linear;
///
/// let result = combine_linear(&[5.0, 10.5, 3.2], &[0.2, 0.3, 0.1]).unwrap();
/// assert!((result.value - 18.7).abs() < 1e-12);
/// assert!((result.absolute_uncertainty - 0.6).abs() < 1e-12);
/// ```
pub fn combine_linear(
    values: &[f64],
    uncertainties: &[f64],
) -> Result<PropagationResult, PropagationError> {
    check_inputs(values, uncertainties)?;

    let value: f64 = values.iter().sum();
    let absolute: f64 = uncertainties.iter().sum();
    ensure_finite(value, "sum")?;
    ensure_finite(absolute, "uncertainty sum")?;

    let result = PropagationResult::from_parts(value, absolute);
    if let Some(fractional) = result.fractional_uncertainty {
        ensure_finite(fractional, "fractional uncertainty")?;
    }

    debug!(terms = values.len(), value, absolute, "linear combination");
    Ok(result)
}

/// Q = Π vᵢ^(±1) with (ΔQ/Q)² = Σ (Δvᵢ/vᵢ)²
///
/// `ops[i]` says whether `values[i]` multiplies or divides the running
/// result, which starts at 1. Every value must be non-zero.
///
/// # Example
/// ```
/// use uncertainty_calc::{Operation, combine_multiplicative};
///
/// let result = combine_multiplicative(
///     &[100.0, 50.0],
///     &[2.0, 1.0],
///     &[Operation::Multiply, Operation::Divide],
/// )
/// .unwrap();
/// assert_eq!(result.value, 2.0);
/// assert!((result.fractional().unwrap() - 0.0283).abs() < 1e-4);
/// ```
pub fn combine_multiplicative(
    values: &[f64],
    uncertainties: &[f64],
    ops: &[Operation],
) -> Result<PropagationResult, PropagationError> {
    check_inputs(values, uncertainties)?;
    if ops.len() != values.len() {
        return Err(PropagationError::MismatchedLength {
            values: values.len(),
            uncertainties: ops.len(),
        });
    }
    if let Some(index) = values.iter().position(|&v| v == 0.0) {
        return Err(PropagationError::DivisionByZero { index });
    }

    let mut value = 1.0_f64;
    let mut relative = 0.0_f64;
    for ((&v, &dv), op) in values.iter().zip(uncertainties).zip(ops) {
        match op {
            Operation::Multiply => value *= v,
            Operation::Divide => value /= v,
        }
        relative = relative.hypot(dv / v.abs());
    }
    ensure_finite(value, "product")?;

    let absolute = value.abs() * relative;
    ensure_finite(absolute, "uncertainty")?;

    debug!(terms = values.len(), value, absolute, relative, "multiplicative combination");
    Ok(PropagationResult {
        fractional_uncertainty: Some(relative),
        ..PropagationResult::from_parts(value, absolute)
    })
}

/// Q = Π vᵢ, the all-multiply form of [`combine_multiplicative`]
pub fn combine_product(
    values: &[f64],
    uncertainties: &[f64],
) -> Result<PropagationResult, PropagationError> {
    let ops = vec![Operation::Multiply; values.len()];
    combine_multiplicative(values, uncertainties, &ops)
}

fn check_inputs(values: &[f64], uncertainties: &[f64]) -> Result<(), PropagationError> {
    if values.is_empty() || values.len() != uncertainties.len() {
        return Err(PropagationError::MismatchedLength {
            values: values.len(),
            uncertainties: uncertainties.len(),
        });
    }
    for (i, (&v, &dv)) in values.iter().zip(uncertainties).enumerate() {
        if !v.is_finite() {
            return Err(PropagationError::NonFiniteInput {
                name: format!("value #{}", i + 1),
            });
        }
        if !dv.is_finite() {
            return Err(PropagationError::NonFiniteInput {
                name: format!("uncertainty #{}", i + 1),
            });
        }
        if dv < 0.0 {
            return Err(PropagationError::NegativeUncertainty {
                name: format!("value #{}", i + 1),
                uncertainty: dv,
            });
        }
    }
    Ok(())
}

fn ensure_finite(x: f64, what: &str) -> Result<(), PropagationError> {
    if x.is_finite() {
        Ok(())
    } else {
        Err(PropagationError::NonFiniteInput {
            name: what.to_string(),
        })
    }
}
