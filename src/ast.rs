//! Abstract Syntax Tree for measurement formulas

use std::sync::Arc;

use crate::functions::{Constant, Function};

/// An immutable expression tree.
///
/// Children are reference counted so that derivative trees can share
/// untouched sub-trees with the expression they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant number (e.g., 3.14, 1e10)
    Number(f64),

    /// Free variable (e.g., "x", "theta", "v_0")
    Symbol(String),

    /// Named mathematical constant (pi, e)
    Constant(Constant),

    /// Whitelisted unary function applied to one argument
    Call { func: Function, arg: Arc<Expr> },

    // Binary operations
    /// Addition
    Add(Arc<Expr>, Arc<Expr>),

    /// Subtraction
    Sub(Arc<Expr>, Arc<Expr>),

    /// Multiplication
    Mul(Arc<Expr>, Arc<Expr>),

    /// Division
    Div(Arc<Expr>, Arc<Expr>),

    /// Exponentiation
    Pow(Arc<Expr>, Arc<Expr>),
}

impl Expr {
    // Accessor methods

    /// Return the value if this expression is a literal number
    ///
    /// # Example
    /// ```
    /// use uncertainty_calc::Expr;
    /// assert_eq!(Expr::number(2.5).as_number(), Some(2.5));
    /// assert_eq!(Expr::symbol("x").as_number(), None);
    /// ```
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Check if this expression is exactly the literal zero
    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number() == Some(0.0)
    }

    /// Check if this expression is exactly the literal one
    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number() == Some(1.0)
    }

    // Convenience constructors

    /// Create a number expression
    pub fn number(n: f64) -> Self {
        Expr::Number(n)
    }

    /// Create a variable expression
    pub fn symbol(s: impl Into<String>) -> Self {
        Expr::Symbol(s.into())
    }

    /// Create a named constant expression
    pub fn constant(c: Constant) -> Self {
        Expr::Constant(c)
    }

    /// Create an addition expression
    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::Add(Arc::new(left), Arc::new(right))
    }

    /// Create a subtraction expression
    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::Sub(Arc::new(left), Arc::new(right))
    }

    /// Create a multiplication expression
    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::Mul(Arc::new(left), Arc::new(right))
    }

    /// Create a division expression
    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::Div(Arc::new(left), Arc::new(right))
    }

    /// Create a power expression
    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::Pow(Arc::new(base), Arc::new(exponent))
    }

    /// Create a function call expression
    pub fn call(func: Function, arg: Expr) -> Self {
        Expr::Call {
            func,
            arg: Arc::new(arg),
        }
    }

    /// Create a function call from an already shared argument
    pub(crate) fn call_arc(func: Function, arg: Arc<Expr>) -> Self {
        Expr::Call { func, arg }
    }

    /// Create `-1 * e`, the form unary minus parses to
    pub fn neg(e: Expr) -> Self {
        Expr::mul_expr(Expr::number(-1.0), e)
    }

    // Analysis methods

    /// Count the total number of nodes in the AST
    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Symbol(_) | Expr::Constant(_) => 1,
            Expr::Call { arg, .. } => 1 + arg.node_count(),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Get the maximum nesting depth of the AST
    pub fn max_depth(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Symbol(_) | Expr::Constant(_) => 1,
            Expr::Call { arg, .. } => 1 + arg.max_depth(),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check if the expression contains a specific variable
    pub fn contains_var(&self, var: &str) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(_) => false,
            Expr::Symbol(s) => s == var,
            Expr::Call { arg, .. } => arg.contains_var(var),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => l.contains_var(var) || r.contains_var(var),
        }
    }

    /// Check if the expression contains any free variable at all
    pub fn has_free_variables(&self) -> bool {
        match self {
            Expr::Number(_) | Expr::Constant(_) => false,
            Expr::Symbol(_) => true,
            Expr::Call { arg, .. } => arg.has_free_variables(),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => l.has_free_variables() || r.has_free_variables(),
        }
    }

    /// Collect the distinct free variables in first-encounter order
    ///
    /// # Example
    /// ```
    /// use uncertainty_calc::parse;
    /// let expr = parse("w * l + l^2").unwrap();
    /// assert_eq!(expr.variables(), vec!["w".to_string(), "l".to_string()]);
    /// ```
    pub fn variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    /// Free variables sorted by name, the order used when prompting for values
    pub fn sorted_variables(&self) -> Vec<String> {
        let mut vars = self.variables();
        vars.sort();
        vars
    }

    fn collect_variables(&self, vars: &mut Vec<String>) {
        match self {
            Expr::Symbol(s) => {
                if !vars.iter().any(|v| v == s) {
                    vars.push(s.clone());
                }
            }
            Expr::Call { arg, .. } => arg.collect_variables(vars),
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
            Expr::Number(_) | Expr::Constant(_) => {}
        }
    }
}
