// Differentiation engine - applies calculus rules
//
// Inline simplifications (0 + u -> u, 1 * u -> u, u^1 -> u) are applied only to
// exact literal 0 and 1 operands. They keep derivative trees small and never
// change the value of the tree at a point where the unsimplified form is
// defined; singular points still surface as evaluation errors.

use std::sync::Arc;

use crate::Expr;
use crate::functions::{Function, div_opt, mul_opt, neg};

/// Symbolic partial derivative of `expr` with respect to `var`
///
/// Every other variable is held constant.
///
/// # Example
/// ```
/// use uncertainty_calc::{differentiate, parse};
///
/// let expr = parse("l*w").unwrap();
/// assert_eq!(differentiate(&expr, "l"), parse("w").unwrap());
/// ```
pub fn differentiate(expr: &Expr, var: &str) -> Expr {
    expr.derive(var)
}

/// `a + b` without literal zero terms
fn add_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        b
    } else if b.is_zero_num() {
        a
    } else {
        Expr::add_expr(a, b)
    }
}

/// `a - b` without literal zero terms
fn sub_opt(a: Expr, b: Expr) -> Expr {
    if b.is_zero_num() {
        a
    } else if a.is_zero_num() {
        neg(b)
    } else {
        Expr::sub_expr(a, b)
    }
}

impl Expr {
    /// Differentiate this expression with respect to a variable
    pub fn derive(&self, var: &str) -> Expr {
        match self {
            // Base cases
            Expr::Number(_) | Expr::Constant(_) => Expr::number(0.0),

            Expr::Symbol(name) => {
                if name == var {
                    Expr::number(1.0)
                } else {
                    Expr::number(0.0)
                }
            }

            // Chain rule through the function's own derivative rule
            Expr::Call { func, arg } => func.derivative(arg, arg.derive(var)),

            // Sum rule: (u + v)' = u' + v'
            Expr::Add(u, v) => add_opt(u.derive(var), v.derive(var)),

            // Subtraction rule: (u - v)' = u' - v'
            Expr::Sub(u, v) => sub_opt(u.derive(var), v.derive(var)),

            // Product rule: (u * v)' = u' * v + u * v'
            Expr::Mul(u, v) => {
                let u_prime = u.derive(var);
                let v_prime = v.derive(var);

                let term1 = mul_opt(u_prime, (**v).clone());
                let term2 = mul_opt((**u).clone(), v_prime);
                add_opt(term1, term2)
            }

            // Quotient rule: (u / v)' = (u' * v - u * v') / v^2
            Expr::Div(u, v) => {
                let u_prime = u.derive(var);
                let v_prime = v.derive(var);

                if v_prime.is_zero_num() {
                    // Constant denominator: (u / c)' = u' / c
                    return div_opt(u_prime, (**v).clone());
                }

                let numerator = sub_opt(
                    mul_opt(u_prime, (**v).clone()),
                    mul_opt((**u).clone(), v_prime),
                );
                div_opt(
                    numerator,
                    Expr::Pow(Arc::clone(v), Arc::new(Expr::number(2.0))),
                )
            }

            Expr::Pow(u, v) => derive_pow(u, v, var),
        }
    }
}

/// Power rule with LOGARITHMIC DIFFERENTIATION for variable exponents
fn derive_pow(u: &Arc<Expr>, v: &Arc<Expr>, var: &str) -> Expr {
    if !v.contains_var(var) {
        // Constant exponent (with respect to var): (u^n)' = n * u^(n-1) * u'
        let u_prime = u.derive(var);
        if u_prime.is_zero_num() {
            return Expr::number(0.0);
        }

        let (n, u_pow_n_minus_1) = match v.as_number() {
            // (u^0)' = 0
            Some(n_val) if n_val == 0.0 => return Expr::number(0.0),
            // (u^1)' = u'
            Some(n_val) if n_val == 1.0 => return u_prime,
            // (u^2)' = 2 * u * u'
            Some(n_val) if n_val == 2.0 => (Expr::number(2.0), (**u).clone()),
            Some(n_val) => (
                Expr::number(n_val),
                Expr::Pow(Arc::clone(u), Arc::new(Expr::number(n_val - 1.0))),
            ),
            None => (
                (**v).clone(),
                Expr::Pow(
                    Arc::clone(u),
                    Arc::new(Expr::sub_expr((**v).clone(), Expr::number(1.0))),
                ),
            ),
        };

        return mul_opt(n, mul_opt(u_pow_n_minus_1, u_prime));
    }

    // Variable exponent: d/dx[u^v] = u^v * (v' * ln(u) + v * u'/u)
    let u_prime = u.derive(var);
    let v_prime = v.derive(var);

    let term1 = mul_opt(v_prime, Expr::call_arc(Function::Ln, Arc::clone(u)));
    let term2 = mul_opt((**v).clone(), div_opt(u_prime, (**u).clone()));

    mul_opt(Expr::Pow(Arc::clone(u), Arc::clone(v)), add_opt(term1, term2))
}
