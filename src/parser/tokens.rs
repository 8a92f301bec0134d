use crate::Span;

/// Infix operators of the formula grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    /// `^`, or `**` for formulas written in programming notation
    Pow,
}

impl Operator {
    /// Binding power used by the Pratt parser
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 10,
            Operator::Mul | Operator::Div => 20,
            Operator::Pow => 30,
        }
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Identifier(String),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Render the token the way the user typed it, for error messages
    pub(crate) fn to_user_string(&self) -> String {
        match self {
            Token::Number(n) => format!("'{}'", n),
            Token::Identifier(name) => format!("'{}'", name),
            Token::Operator(op) => format!("'{}'", op.symbol()),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
        }
    }
}

/// A token together with its location in the source text
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpannedToken {
    pub token: Token,
    pub span: Span,
}
