//! Evaluation and symbolic differentiation rules for every whitelisted function
//!
//! # Derivative References
//!
//! Derivative formulas follow standard calculus (DLMF §4.21-4.28 for the
//! trigonometric family, §4.35-4.37 for the hyperbolic one). Only functions of
//! the whitelist appear on the right-hand side, so a derivative tree can always
//! be evaluated by the same evaluator as the original formula.

use std::sync::Arc;

use super::{Function, div_opt, mul_opt, neg};
use crate::{EvalError, Expr};

/// `1 - u^2`
fn one_minus_square(u: &Arc<Expr>) -> Expr {
    Expr::sub_expr(
        Expr::number(1.0),
        Expr::Pow(Arc::clone(u), Arc::new(Expr::number(2.0))),
    )
}

/// `f(u)^2`
fn squared_call(func: Function, u: &Arc<Expr>) -> Expr {
    Expr::pow(Expr::call_arc(func, Arc::clone(u)), Expr::number(2.0))
}

impl Function {
    /// Evaluate the function at `x`, rejecting arguments outside its real domain
    pub(crate) fn eval(self, x: f64) -> Result<f64, EvalError> {
        let domain = |ok: bool| -> Result<(), EvalError> {
            if ok {
                Ok(())
            } else {
                Err(EvalError::Domain {
                    function: self.name(),
                    argument: x,
                })
            }
        };

        let value = match self {
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin => {
                domain((-1.0..=1.0).contains(&x))?;
                x.asin()
            }
            Function::Acos => {
                domain((-1.0..=1.0).contains(&x))?;
                x.acos()
            }
            Function::Atan => x.atan(),
            Function::Sinh => x.sinh(),
            Function::Cosh => x.cosh(),
            Function::Tanh => x.tanh(),
            Function::Exp => x.exp(),
            Function::Ln => {
                domain(x > 0.0)?;
                x.ln()
            }
            Function::Log10 => {
                domain(x > 0.0)?;
                x.log10()
            }
            Function::Sqrt => {
                domain(x >= 0.0)?;
                x.sqrt()
            }
            Function::Abs => x.abs(),
        };
        Ok(value)
    }

    /// Chain-rule derivative: `d/dx f(u) = f'(u) * u'`
    ///
    /// `u` is the call argument and `u_prime` its derivative with respect to
    /// the differentiation variable.
    pub(crate) fn derivative(self, u: &Arc<Expr>, u_prime: Expr) -> Expr {
        if u_prime.is_zero_num() {
            return Expr::number(0.0);
        }

        match self {
            // d/dx sin(u) = cos(u) * u'
            Function::Sin => mul_opt(Expr::call_arc(Function::Cos, Arc::clone(u)), u_prime),

            // d/dx cos(u) = -sin(u) * u'
            Function::Cos => mul_opt(neg(Expr::call_arc(Function::Sin, Arc::clone(u))), u_prime),

            // d/dx tan(u) = u' / cos(u)^2
            Function::Tan => div_opt(u_prime, squared_call(Function::Cos, u)),

            // d/dx asin(u) = u' / sqrt(1 - u^2)
            Function::Asin => div_opt(u_prime, Expr::call(Function::Sqrt, one_minus_square(u))),

            // d/dx acos(u) = -u' / sqrt(1 - u^2)
            Function::Acos => div_opt(
                neg(u_prime),
                Expr::call(Function::Sqrt, one_minus_square(u)),
            ),

            // d/dx atan(u) = u' / (1 + u^2)
            Function::Atan => div_opt(
                u_prime,
                Expr::add_expr(
                    Expr::number(1.0),
                    Expr::Pow(Arc::clone(u), Arc::new(Expr::number(2.0))),
                ),
            ),

            // d/dx sinh(u) = cosh(u) * u'
            Function::Sinh => mul_opt(Expr::call_arc(Function::Cosh, Arc::clone(u)), u_prime),

            // d/dx cosh(u) = sinh(u) * u'
            Function::Cosh => mul_opt(Expr::call_arc(Function::Sinh, Arc::clone(u)), u_prime),

            // d/dx tanh(u) = u' / cosh(u)^2
            Function::Tanh => div_opt(u_prime, squared_call(Function::Cosh, u)),

            // d/dx exp(u) = exp(u) * u'
            Function::Exp => mul_opt(Expr::call_arc(Function::Exp, Arc::clone(u)), u_prime),

            // d/dx ln(u) = u' / u
            Function::Ln => div_opt(u_prime, (**u).clone()),

            // d/dx log10(u) = u' / (u * ln(10))
            Function::Log10 => div_opt(
                u_prime,
                Expr::Mul(
                    Arc::clone(u),
                    Arc::new(Expr::call(Function::Ln, Expr::number(10.0))),
                ),
            ),

            // d/dx sqrt(u) = u' / (2 * sqrt(u))
            Function::Sqrt => div_opt(
                u_prime,
                Expr::mul_expr(
                    Expr::number(2.0),
                    Expr::call_arc(Function::Sqrt, Arc::clone(u)),
                ),
            ),

            // d/dx |u| = u / |u| * u', undefined at u = 0
            Function::Abs => mul_opt(
                Expr::Div(
                    Arc::clone(u),
                    Arc::new(Expr::call_arc(Function::Abs, Arc::clone(u))),
                ),
                u_prime,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_checks() {
        assert!(matches!(
            Function::Ln.eval(0.0),
            Err(EvalError::Domain { function: "log", .. })
        ));
        assert!(Function::Log10.eval(-1.0).is_err());
        assert!(Function::Sqrt.eval(-1e-12).is_err());
        assert!(Function::Asin.eval(1.5).is_err());
        assert!(Function::Acos.eval(-1.0001).is_err());
        assert_eq!(Function::Sqrt.eval(0.0), Ok(0.0));
        assert_eq!(Function::Asin.eval(1.0), Ok(std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn test_eval_values() {
        let x = 0.3_f64;
        assert_eq!(Function::Sin.eval(x), Ok(x.sin()));
        assert_eq!(Function::Tanh.eval(x), Ok(x.tanh()));
        let ln_e = Function::Ln.eval(std::f64::consts::E).unwrap();
        assert!((ln_e - 1.0).abs() < 1e-15);
        assert_eq!(Function::Abs.eval(-2.0), Ok(2.0));
    }

    #[test]
    fn test_zero_inner_derivative_short_circuits() {
        let u = Arc::new(Expr::symbol("y"));
        for func in Function::ALL {
            assert!(func.derivative(&u, Expr::number(0.0)).is_zero_num());
        }
    }

    #[test]
    fn test_sin_rule_shape() {
        let u = Arc::new(Expr::symbol("x"));
        let d = Function::Sin.derivative(&u, Expr::number(1.0));
        assert_eq!(d, Expr::call(Function::Cos, Expr::symbol("x")));
    }

    #[test]
    fn test_ln_rule_shape() {
        let u = Arc::new(Expr::symbol("x"));
        let d = Function::Ln.derivative(&u, Expr::number(1.0));
        assert_eq!(d, Expr::div_expr(Expr::number(1.0), Expr::symbol("x")));
    }
}
