//! Uncertainty propagation for measurement formulas
//!
//! Computes the propagated uncertainty of Q = f(x₁, …, xₙ) for independent
//! inputs using the first-order GUM formula without covariance terms:
//! σ_Q² = Σᵢ (∂f/∂xᵢ)² σᵢ²
//!
//! # Reference
//!
//! JCGM 100:2008 "Evaluation of measurement data - Guide to the expression
//! of uncertainty in measurement" (GUM), Section 5.1.2
//! <https://www.bipm.org/documents/20126/2071204/JCGM_100_2008_E.pdf>

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use tracing::{debug, trace};

use crate::helpers::gradient;
use crate::sigfig::round_to_significant_figures;
use crate::traits::Bindings;
use crate::{EvalError, Expr, PropagationError, parser};

/// A measured quantity: nominal value and its absolute uncertainty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub value: f64,
    pub uncertainty: f64,
}

impl Measurement {
    pub fn new(value: f64, uncertainty: f64) -> Self {
        Measurement { value, uncertainty }
    }

    /// Reject non-finite inputs and negative uncertainties
    pub fn validate(&self, name: &str) -> Result<(), PropagationError> {
        if !self.value.is_finite() || !self.uncertainty.is_finite() {
            return Err(PropagationError::NonFiniteInput {
                name: name.to_string(),
            });
        }
        if self.uncertainty < 0.0 {
            return Err(PropagationError::NegativeUncertainty {
                name: name.to_string(),
                uncertainty: self.uncertainty,
            });
        }
        Ok(())
    }
}

/// Measurements keyed by variable name, in insertion order
///
/// Names are unique; inserting an existing name replaces its measurement.
///
/// # Example
/// ```
/// use uncertainty_calc::{Assignment, Measurement};
///
/// let mut assignment = Assignment::new();
/// assignment.insert("l", Measurement::new(5.0, 0.1));
/// assignment.insert("w", Measurement::new(3.0, 0.15));
/// assert_eq!(assignment.names().collect::<Vec<_>>(), ["l", "w"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    entries: IndexMap<String, Measurement, FxBuildHasher>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the measurement for `name`, returning the previous one
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        measurement: Measurement,
    ) -> Option<Measurement> {
        self.entries.insert(name.into(), measurement)
    }

    /// Chainable form of [`Assignment::insert`]
    pub fn with(mut self, name: impl Into<String>, value: f64, uncertainty: f64) -> Self {
        self.insert(name, Measurement::new(value, uncertainty));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Measurement> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Measurement)> {
        self.entries.iter().map(|(name, m)| (name.as_str(), m))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<(S, Measurement)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (S, Measurement)>>(iter: I) -> Self {
        let mut assignment = Assignment::new();
        for (name, measurement) in iter {
            assignment.insert(name, measurement);
        }
        assignment
    }
}

/// Evaluation sees the nominal values only
impl Bindings for Assignment {
    fn value_of(&self, name: &str) -> Option<f64> {
        self.entries.get(name).map(|m| m.value)
    }
}

/// One variable's share of the propagated uncertainty
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution {
    pub variable: String,
    /// ∂Q/∂x evaluated at the nominal values
    pub partial: f64,
    /// |∂Q/∂x · Δx|
    pub uncertainty_component: f64,
}

/// Outcome of a propagation or a direct-value combination
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationResult {
    pub value: f64,
    pub absolute_uncertainty: f64,
    /// `None` when `value` is zero and the ratio is undefined
    pub fractional_uncertainty: Option<f64>,
    /// Per-variable budget; empty for direct-value combinations
    pub contributions: Vec<Contribution>,
}

impl PropagationResult {
    pub(crate) fn from_parts(value: f64, absolute_uncertainty: f64) -> Self {
        let fractional_uncertainty = if value == 0.0 {
            None
        } else {
            Some(absolute_uncertainty / value.abs())
        };
        PropagationResult {
            value,
            absolute_uncertainty,
            fractional_uncertainty,
            contributions: Vec::new(),
        }
    }

    /// Fractional uncertainty, or `ZeroNominalValue` if the value is zero
    pub fn fractional(&self) -> Result<f64, PropagationError> {
        self.fractional_uncertainty
            .ok_or(PropagationError::ZeroNominalValue)
    }

    /// Copy with value and both uncertainties rounded to `n` significant figures
    pub fn rounded(&self, n: u32) -> Self {
        PropagationResult {
            value: round_to_significant_figures(self.value, n),
            absolute_uncertainty: round_to_significant_figures(self.absolute_uncertainty, n),
            fractional_uncertainty: self
                .fractional_uncertainty
                .map(|f| round_to_significant_figures(f, n)),
            contributions: self.contributions.clone(),
        }
    }
}

impl fmt::Display for PropagationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Computed value: {}", self.value)?;
        writeln!(f, "Absolute uncertainty: {}", self.absolute_uncertainty)?;
        match self.fractional_uncertainty {
            Some(frac) => write!(f, "Fractional uncertainty: {}", frac),
            None => write!(f, "Fractional uncertainty: undefined (computed value is zero)"),
        }
    }
}

/// Propagate measurement uncertainties through `expr` in quadrature
///
/// The assignment must name exactly the free variables of `expr`.
///
/// # Example
/// ```
/// use uncertainty_calc::{Assignment, parse, propagate};
///
/// let expr = parse("l*w").unwrap();
/// let assignment = Assignment::new().with("l", 5.0, 0.1).with("w", 3.0, 0.15);
/// let result = propagate(&expr, &assignment).unwrap();
/// assert_eq!(result.value, 15.0);
/// assert!((result.absolute_uncertainty - 0.8078).abs() < 1e-4);
/// ```
pub fn propagate(
    expr: &Expr,
    assignment: &Assignment,
) -> Result<PropagationResult, PropagationError> {
    let variables = expr.variables();
    check_assignment(&variables, assignment)?;
    for (name, measurement) in assignment.iter() {
        measurement.validate(name)?;
    }

    let value = expr.evaluate(assignment)?;
    let partials = gradient(expr, &variables);

    let mut contributions = Vec::with_capacity(variables.len());
    for (name, partial) in variables.into_iter().zip(partials) {
        let uncertainty = assignment.get(&name).map_or(0.0, |m| m.uncertainty);
        let slope = partial.evaluate(assignment)?;
        let component = finite((slope * uncertainty).abs(), || {
            format!("uncertainty contribution of '{}'", name)
        })?;
        trace!(variable = %name, partial = %partial, slope, component, "uncertainty contribution");
        contributions.push(Contribution {
            variable: name,
            partial: slope,
            uncertainty_component: component,
        });
    }

    // hypot accumulates the root-sum-square without overflowing the squares
    let absolute_uncertainty = contributions
        .iter()
        .fold(0.0_f64, |acc, c| acc.hypot(c.uncertainty_component));
    finite(absolute_uncertainty, || "quadrature sum".to_string())?;

    let mut result = PropagationResult::from_parts(value, absolute_uncertainty);
    if let Some(fractional) = result.fractional_uncertainty {
        finite(fractional, || "fractional uncertainty".to_string())?;
    }
    result.contributions = contributions;
    debug!(
        formula = %expr,
        value,
        absolute_uncertainty,
        fractional_uncertainty = ?result.fractional_uncertainty,
        "propagated uncertainty"
    );
    Ok(result)
}

/// Parse `formula` and propagate `assignment` through it
pub fn propagate_str(
    formula: &str,
    assignment: &Assignment,
) -> Result<PropagationResult, PropagationError> {
    let expr = parser::parse(formula)?;
    propagate(&expr, assignment)
}

/// Pass `x` through if finite, otherwise name the overflowing step
fn finite(x: f64, operation: impl FnOnce() -> String) -> Result<f64, EvalError> {
    if x.is_finite() {
        Ok(x)
    } else {
        Err(EvalError::NonFinite {
            operation: operation(),
        })
    }
}

fn check_assignment(variables: &[String], assignment: &Assignment) -> Result<(), PropagationError> {
    let missing: Vec<String> = variables
        .iter()
        .filter(|v| !assignment.contains(v))
        .cloned()
        .collect();
    let extra: Vec<String> = assignment
        .names()
        .filter(|name| !variables.iter().any(|v| v.as_str() == *name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(PropagationError::IncompleteAssignment { missing, extra })
    }
}
