//! Measurement Uncertainty Propagation Library
//!
//! Propagates independent measurement uncertainties through a formula using
//! first-order partial derivatives, and combines raw values directly for the
//! common add/subtract and multiply/divide cases.
//!
//! # Features
//! - Formula parsing with spans on errors (`+ - * / ^`, unary functions, `pi`, `e`)
//! - Symbolic partial derivatives, including variable exponents
//! - Quadrature propagation with a per-variable uncertainty budget
//! - Direct linear and multiplicative combinations
//! - Significant-figure rounding for presentation
//! - **Builder pattern API** for limits and precision
//!
//! # Usage Examples
//!
//! ## One-shot propagation
//! ```
//! use uncertainty_calc::{Assignment, propagate_str};
//!
//! let assignment = Assignment::new().with("l", 5.0, 0.1).with("w", 3.0, 0.15);
//! let result = propagate_str("l*w", &assignment).unwrap().rounded(3);
//! assert_eq!(result.value, 15.0);
//! assert_eq!(result.absolute_uncertainty, 0.808);
//! ```
//!
//! ## Expressions
//! ```
//! use uncertainty_calc::{differentiate, parse};
//!
//! let expr = parse("0.5*m*v^2").unwrap();
//! assert_eq!(differentiate(&expr, "m").to_string(), "0.5*v^2");
//! ```

mod ast;
mod builder;
mod differentiation;
mod direct;
mod display;
mod error;
mod evaluator;
pub mod functions;
mod helpers;
mod parser;
mod sigfig;
pub mod traits;
mod uncertainty;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::Expr;
pub use builder::Propagator;
pub use differentiation::differentiate;
pub use direct::{Operation, combine_linear, combine_multiplicative, combine_product};
pub use error::{EvalError, ParseError, PropagationError, Span};
pub use evaluator::evaluate;
pub use functions::{Constant, Function};
pub use helpers::{evaluate_str, gradient, gradient_str};
pub use parser::{parse, parse_with_limits};
pub use sigfig::{DEFAULT_SIGNIFICANT_FIGURES, round_to_significant_figures};
pub use traits::Bindings;
pub use uncertainty::{
    Assignment, Contribution, Measurement, PropagationResult, propagate, propagate_str,
};

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;
