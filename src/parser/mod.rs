//! Parser module - converts formula strings to AST
mod lexer;
mod pratt;
mod tokens;

use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr, ParseError};
use tracing::trace;

/// Parse a formula string into an expression AST
///
/// Grammar: decimal literals, variables (`[A-Za-z_][A-Za-z0-9_]*`), the
/// operators `+ - * / ^` (`**` is accepted for `^`), parentheses, the
/// whitelisted unary functions (`sin`, `sqrt`, `log`, ...) and the constants
/// `pi` and `e`.
///
/// # Example
/// ```
/// use uncertainty_calc::parse;
///
/// let expr = parse("0.5*m*v^2").unwrap();
/// assert_eq!(expr.variables(), vec!["m".to_string(), "v".to_string()]);
/// ```
///
/// # Errors
/// Returns `ParseError` if:
/// - The input is empty
/// - The input contains invalid syntax or an unknown function
/// - Parentheses are unbalanced
/// - A function is called with other than one argument
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    parse_with_limits(input, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES)
}

/// Parse with explicit AST depth and node count limits
pub fn parse_with_limits(
    input: &str,
    max_depth: usize,
    max_nodes: usize,
) -> Result<Expr, ParseError> {
    // Pipeline: validate -> lex -> parse (depth checked while folding) -> check size

    if input.trim().is_empty() {
        return Err(ParseError::EmptyFormula);
    }

    let tokens = lexer::lex(input)?;
    let expr = pratt::parse_expression(&tokens, max_depth)?;

    if expr.node_count() > max_nodes {
        return Err(ParseError::MaxNodesExceeded);
    }

    trace!(formula = input, nodes = expr.node_count(), "parsed formula");
    Ok(expr)
}
