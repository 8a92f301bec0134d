//! Multi-variable differentiation helpers
//!
//! Provides gradient computation for both Expr-based and String-based APIs,
//! plus one-shot evaluation of a formula string.

use crate::traits::Bindings;
use crate::{Expr, PropagationError, parser};

/// Compute the gradient of an expression with respect to multiple variables
/// Returns a vector of partial derivatives [∂f/∂x₁, ∂f/∂x₂, ...]
///
/// # Example
/// ```
/// use uncertainty_calc::{gradient, parse};
///
/// let expr = parse("x^2 + y^2").unwrap();
/// let grad = gradient(&expr, &["x", "y"]);
/// assert_eq!(grad[0].to_string(), "2*x");
/// assert_eq!(grad[1].to_string(), "2*y");
/// ```
pub fn gradient<S: AsRef<str>>(expr: &Expr, vars: &[S]) -> Vec<Expr> {
    vars.iter().map(|var| expr.derive(var.as_ref())).collect()
}

/// Compute gradient from a formula string
///
/// # Example
/// ```
/// use uncertainty_calc::gradient_str;
///
/// let grad = gradient_str("l*w", &["l", "w"]).unwrap();
/// assert_eq!(grad, vec!["w", "l"]);
/// ```
pub fn gradient_str(formula: &str, vars: &[&str]) -> Result<Vec<String>, PropagationError> {
    let expr = parser::parse(formula)?;
    Ok(gradient(&expr, vars).iter().map(|e| e.to_string()).collect())
}

/// Evaluate a formula string with given variable values
///
/// # Example
/// ```
/// use uncertainty_calc::evaluate_str;
///
/// assert_eq!(evaluate_str("x * y + 1", &[("x", 3.0), ("y", 2.0)]).unwrap(), 7.0);
/// ```
pub fn evaluate_str<B: Bindings + ?Sized>(
    formula: &str,
    vars: &B,
) -> Result<f64, PropagationError> {
    let expr = parser::parse(formula)?;
    Ok(expr.evaluate(vars)?)
}
