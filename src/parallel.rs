//! Parallel batch propagation using Rayon
//!
//! Propagation is a pure function of the expression and the assignment, so
//! one formula can be pushed through many measurement sets independently.
//!
//! Enable with the `parallel` feature:
//! ```toml
//! uncertainty_calc = { version = "0.1", features = ["parallel"] }
//! ```

use crate::{Assignment, Expr, PropagationError, PropagationResult, propagate};
use rayon::prelude::*;
use tracing::debug;

/// Propagate `expr` over every assignment in parallel
///
/// Results are returned in the order of `assignments`; a failure in one
/// assignment does not affect the others.
///
/// # Example
/// ```
/// use uncertainty_calc::{Assignment, parse};
/// use uncertainty_calc::parallel::propagate_batch;
///
/// let expr = parse("l*w").unwrap();
/// let runs = vec![
///     Assignment::new().with("l", 5.0, 0.1).with("w", 3.0, 0.15),
///     Assignment::new().with("l", 2.0, 0.1),
/// ];
/// let results = propagate_batch(&expr, &runs);
/// assert_eq!(results[0].as_ref().unwrap().value, 15.0);
/// assert!(results[1].is_err());
/// ```
pub fn propagate_batch(
    expr: &Expr,
    assignments: &[Assignment],
) -> Vec<Result<PropagationResult, PropagationError>> {
    debug!(formula = %expr, runs = assignments.len(), "batch propagation");
    assignments
        .par_iter()
        .map(|assignment| propagate(expr, assignment))
        .collect()
}
