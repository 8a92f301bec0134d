//! Numeric evaluation of expression trees
//!
//! Unlike symbolic substitution, evaluation is all-or-nothing: every variable
//! must be bound, and any undefined arithmetic (zero denominator, argument
//! outside a function's domain, overflow) is reported with the sub-expression
//! that produced it.

use crate::traits::Bindings;
use crate::{EvalError, Expr};

/// Evaluate `expr` with the given variable values
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use uncertainty_calc::{evaluate, parse};
///
/// let expr = parse("l*w").unwrap();
/// let vars: HashMap<&str, f64> = [("l", 5.0), ("w", 3.0)].into_iter().collect();
/// assert_eq!(evaluate(&expr, &vars).unwrap(), 15.0);
/// ```
pub fn evaluate<B: Bindings + ?Sized>(expr: &Expr, vars: &B) -> Result<f64, EvalError> {
    expr.evaluate(vars)
}

impl Expr {
    /// Evaluate this expression to a finite number
    pub fn evaluate<B: Bindings + ?Sized>(&self, vars: &B) -> Result<f64, EvalError> {
        let value = match self {
            Expr::Number(n) => *n,
            Expr::Constant(c) => c.value(),
            Expr::Symbol(name) => {
                vars.value_of(name)
                    .ok_or_else(|| EvalError::UnboundVariable { name: name.clone() })?
            }
            Expr::Call { func, arg } => func.eval(arg.evaluate(vars)?)?,
            Expr::Add(a, b) => a.evaluate(vars)? + b.evaluate(vars)?,
            Expr::Sub(a, b) => a.evaluate(vars)? - b.evaluate(vars)?,
            Expr::Mul(a, b) => a.evaluate(vars)? * b.evaluate(vars)?,
            Expr::Div(a, b) => {
                let numerator = a.evaluate(vars)?;
                let denominator = b.evaluate(vars)?;
                if denominator == 0.0 {
                    return Err(EvalError::DivisionByZero {
                        expr: self.to_string(),
                    });
                }
                numerator / denominator
            }
            Expr::Pow(a, b) => {
                let base = a.evaluate(vars)?;
                let exponent = b.evaluate(vars)?;
                if base == 0.0 && exponent < 0.0 {
                    return Err(EvalError::DivisionByZero {
                        expr: self.to_string(),
                    });
                }
                if base < 0.0 && exponent.fract() != 0.0 {
                    return Err(EvalError::Domain {
                        function: "pow",
                        argument: base,
                    });
                }
                // Note: 0^0 evaluates to 1.0 following IEEE 754 powf behavior
                base.powf(exponent)
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite {
                operation: self.to_string(),
            })
        }
    }
}
