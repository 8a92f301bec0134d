//! Builder pattern API for configuring propagation
//!
//! Provides a fluent interface for the parser limits and the presentation
//! precision used by a calculation.
//!
//! # Example
//! ```
//! use uncertainty_calc::{Assignment, Propagator};
//!
//! let assignment = Assignment::new()
//!     .with("m", 2.0, 0.1)
//!     .with("v", 10.0, 0.5);
//!
//! let result = Propagator::new()
//!     .significant_figures(3)
//!     .propagate_str("0.5*m*v^2", &assignment)?;
//!
//! assert_eq!(result.value, 100.0);
//! assert_eq!(result.absolute_uncertainty, 11.2);
//! # Ok::<(), uncertainty_calc::PropagationError>(())
//! ```

use crate::{
    Assignment, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr, ParseError, PropagationError,
    PropagationResult, parser, uncertainty,
};

/// Builder for propagation operations
#[derive(Debug, Clone, Copy, Default)]
pub struct Propagator {
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
    significant_figures: Option<u32>,
}

impl Propagator {
    /// Create a new propagation builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum AST depth
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set maximum AST node count
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    /// Round every result to `n` significant figures
    ///
    /// Without this setting results are returned at full precision.
    pub fn significant_figures(mut self, n: u32) -> Self {
        self.significant_figures = Some(n);
        self
    }

    /// Parse a formula under this builder's limits
    pub fn parse(&self, formula: &str) -> Result<Expr, ParseError> {
        parser::parse_with_limits(
            formula,
            self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            self.max_nodes.unwrap_or(DEFAULT_MAX_NODES),
        )
    }

    /// Propagate through an already-built expression
    ///
    /// Expressions built by hand are held to the same limits as parsed ones.
    pub fn propagate(
        &self,
        expr: &Expr,
        assignment: &Assignment,
    ) -> Result<PropagationResult, PropagationError> {
        self.check_limits(expr)?;
        let result = uncertainty::propagate(expr, assignment)?;
        Ok(match self.significant_figures {
            Some(n) => result.rounded(n),
            None => result,
        })
    }

    /// Parse and propagate a string formula
    pub fn propagate_str(
        &self,
        formula: &str,
        assignment: &Assignment,
    ) -> Result<PropagationResult, PropagationError> {
        let expr = self.parse(formula)?;
        self.propagate(&expr, assignment)
    }

    fn check_limits(&self, expr: &Expr) -> Result<(), ParseError> {
        if let Some(max_d) = self.max_depth
            && expr.max_depth() > max_d
        {
            return Err(ParseError::MaxDepthExceeded);
        }
        if let Some(max_n) = self.max_nodes
            && expr.node_count() > max_n
        {
            return Err(ParseError::MaxNodesExceeded);
        }
        Ok(())
    }
}
