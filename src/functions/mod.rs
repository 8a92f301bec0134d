//! Whitelisted mathematical functions and named constants
//!
//! Every function the parser accepts is a variant of the closed [`Function`]
//! enum, so adding one forces both an evaluator and a derivative rule to be
//! written (see `definitions`).

use crate::Expr;

mod definitions;

/// Unary functions understood by the parser, evaluator and differentiator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    // Trigonometric
    Sin,
    Cos,
    Tan,
    // Inverse trigonometric
    Asin,
    Acos,
    Atan,
    // Hyperbolic
    Sinh,
    Cosh,
    Tanh,
    // Exp / Log
    Exp,
    /// Natural logarithm, spelled `log` or `ln`
    Ln,
    Log10,
    // Roots / misc
    Sqrt,
    Abs,
}

impl Function {
    /// All whitelisted functions
    pub const ALL: [Function; 14] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Asin,
        Function::Acos,
        Function::Atan,
        Function::Sinh,
        Function::Cosh,
        Function::Tanh,
        Function::Exp,
        Function::Ln,
        Function::Log10,
        Function::Sqrt,
        Function::Abs,
    ];

    /// Look up a function by the name used in formulas
    pub fn from_name(name: &str) -> Option<Function> {
        let func = match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "asin" => Function::Asin,
            "acos" => Function::Acos,
            "atan" => Function::Atan,
            "sinh" => Function::Sinh,
            "cosh" => Function::Cosh,
            "tanh" => Function::Tanh,
            "exp" => Function::Exp,
            "log" | "ln" => Function::Ln,
            "log10" => Function::Log10,
            "sqrt" => Function::Sqrt,
            "abs" => Function::Abs,
            _ => return None,
        };
        Some(func)
    }

    /// Canonical name, as rendered by `Display`
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Exp => "exp",
            Function::Ln => "log",
            Function::Log10 => "log10",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
        }
    }
}

/// Named mathematical constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    /// Look up a constant by the name used in formulas
    pub fn from_name(name: &str) -> Option<Constant> {
        match name {
            "pi" => Some(Constant::Pi),
            "e" => Some(Constant::E),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "e",
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

// ===== Helper functions for building derivative expressions =====

/// Multiply, optimizing for exact literal 0 and 1 operands
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() || b.is_zero_num() {
        Expr::number(0.0)
    } else if a.is_one_num() {
        b
    } else if b.is_one_num() {
        a
    } else {
        Expr::mul_expr(a, b)
    }
}

/// Divide, optimizing for a literal zero numerator and unit denominator
pub(crate) fn div_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        Expr::number(0.0)
    } else if b.is_one_num() {
        a
    } else {
        Expr::div_expr(a, b)
    }
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    if e.is_zero_num() {
        e
    } else {
        Expr::neg(e)
    }
}
