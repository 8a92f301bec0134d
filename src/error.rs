use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of bytes in the formula string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed byte offset)
    pub start: usize,
    /// End position (exclusive, 0-indexed byte offset)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

/// Errors produced while turning formula text into an expression tree
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Formula cannot be empty")]
    EmptyFormula,

    #[error("Invalid number format: '{value}'{}", span_suffix(.span))]
    InvalidNumber { value: String, span: Option<Span> },

    #[error("Invalid token: '{token}'{}", span_suffix(.span))]
    InvalidToken { token: String, span: Option<Span> },

    #[error("Expected {expected}, but got {got}{}", span_suffix(.span))]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("Unbalanced parentheses{}", span_suffix(.span))]
    UnbalancedParentheses { span: Option<Span> },

    #[error("Function '{name}' takes exactly one argument, got {count}{}", span_suffix(.span))]
    WrongArgumentCount {
        name: String,
        count: usize,
        span: Option<Span>,
    },

    #[error("Unknown function '{name}'{}", span_suffix(.span))]
    UnknownFunction { name: String, span: Option<Span> },

    #[error("Expression nesting depth exceeds maximum limit")]
    MaxDepthExceeded,

    #[error("Expression size exceeds maximum node count limit")]
    MaxNodesExceeded,
}

impl ParseError {
    /// Create InvalidToken at a known location
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        ParseError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    /// Create UnexpectedToken at a known location
    pub fn unexpected_at(expected: impl Into<String>, got: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            got: got.into(),
            span: Some(span),
        }
    }
}

/// Undefined arithmetic met while reducing an expression to a number
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("No value supplied for variable '{name}'")]
    UnboundVariable { name: String },

    #[error("Division by zero in '{expr}'")]
    DivisionByZero { expr: String },

    #[error("{function}({argument}) is outside the function's domain")]
    Domain {
        function: &'static str,
        argument: f64,
    },

    #[error("Result of '{operation}' is not a finite number")]
    NonFinite { operation: String },
}

/// Failures of a single uncertainty calculation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error(
        "Variable table does not match the expression ({})",
        describe_mismatch(.missing, .extra)
    )]
    IncompleteAssignment {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Got {values} values but {uncertainties} uncertainties")]
    MismatchedLength { values: usize, uncertainties: usize },

    #[error("Value #{} is zero and cannot take part in a product or quotient", .index + 1)]
    DivisionByZero { index: usize },

    #[error("Uncertainty of '{name}' is negative ({uncertainty})")]
    NegativeUncertainty { name: String, uncertainty: f64 },

    #[error("Input '{name}' is not a finite number")]
    NonFiniteInput { name: String },

    #[error("Fractional uncertainty is undefined because the computed value is zero")]
    ZeroNominalValue,
}

fn describe_mismatch(missing: &[String], extra: &[String]) -> String {
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing: {}", missing.join(", ")));
    }
    if !extra.is_empty() {
        parts.push(format!("unexpected: {}", extra.join(", ")));
    }
    parts.join("; ")
}
