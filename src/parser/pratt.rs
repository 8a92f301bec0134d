use super::tokens::{Operator, SpannedToken, Token};
use crate::functions::{Constant, Function};
use crate::{Expr, ParseError, Span};

/// Parse tokens into an AST using Pratt parsing algorithm
///
/// `max_depth` bounds both the parser's recursion and the nesting depth of
/// the tree it builds. Left-associative chains such as `a + b + c + ...` are
/// folded in a loop, so their depth is checked at each fold and pathological
/// input fails with `MaxDepthExceeded` before a deep tree exists.
pub(crate) fn parse_expression(
    tokens: &[SpannedToken],
    max_depth: usize,
) -> Result<Expr, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::UnexpectedEndOfInput);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        max_depth,
    };

    let node = parser.parse_expr(0)?;

    if let Some(trailing) = parser.current() {
        return Err(ParseError::unexpected_at(
            "an operator or end of input",
            trailing.token.to_user_string(),
            trailing.span,
        ));
    }

    Ok(node.expr)
}

/// A sub-tree together with its nesting depth
struct Node {
    expr: Expr,
    depth: usize,
}

struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn current_token(&self) -> Option<&'a Token> {
        self.current().map(|t| &t.token)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Error for a missing token: points at what was found, or reports end of input
    fn expected(&self, what: &str) -> ParseError {
        match self.current() {
            Some(found) => {
                ParseError::unexpected_at(what, found.token.to_user_string(), found.span)
            }
            None => ParseError::UnexpectedEndOfInput,
        }
    }

    /// Wrap `expr` as a node of the given depth, enforcing the depth limit
    fn node(&self, expr: Expr, depth: usize) -> Result<Node, ParseError> {
        if depth > self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }
        Ok(Node { expr, depth })
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Node, ParseError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(ParseError::MaxDepthExceeded);
        }

        // Parse left side (prefix)
        let mut left = self.parse_prefix()?;

        // Parse operators and right side (infix)
        while let Some(Token::Operator(op)) = self.current_token() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            left = self.parse_infix(left, *op, precedence)?;
        }

        self.depth -= 1;
        Ok(left)
    }

    /// Parse a parenthesized argument list; the opening paren is current
    fn parse_arguments(&mut self) -> Result<Vec<Node>, ParseError> {
        self.advance(); // consume (
        let mut args = Vec::new();

        if let Some(Token::RightParen) = self.current_token() {
            self.advance();
            return Ok(args); // Empty argument list
        }

        loop {
            args.push(self.parse_expr(0)?);

            match self.current_token() {
                Some(Token::Comma) => {
                    self.advance(); // consume ,
                }
                Some(Token::RightParen) => {
                    self.advance(); // consume )
                    break;
                }
                _ => return Err(self.expected("',' or ')'")),
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Node, ParseError> {
        let spanned = self.current().ok_or(ParseError::UnexpectedEndOfInput)?;

        match &spanned.token {
            Token::Number(n) => {
                self.advance();
                self.node(Expr::number(*n), 1)
            }

            Token::Identifier(name) => {
                self.advance();

                if let Some(Token::LeftParen) = self.current_token() {
                    self.parse_call(name, spanned.span)
                } else if Function::from_name(name).is_some() {
                    Err(self.expected(&format!("'(' after function '{}'", name)))
                } else if let Some(constant) = Constant::from_name(name) {
                    self.node(Expr::constant(constant), 1)
                } else {
                    self.node(Expr::symbol(name.clone()), 1)
                }
            }

            // Unary minus: precedence between Mul (20) and Pow (30)
            // This ensures -x^2 parses as -(x^2), not (-x)^2
            Token::Operator(Operator::Sub) => {
                self.advance();
                let operand = self.parse_expr(25)?;
                self.node(Expr::neg(operand.expr), operand.depth + 1)
            }

            // Unary plus: same precedence as unary minus, just returns the expression
            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(25)
            }

            Token::LeftParen => {
                self.advance(); // consume (
                if let Some(Token::RightParen) = self.current_token() {
                    return Err(self.expected("an expression"));
                }
                let inner = self.parse_expr(0)?;

                if let Some(Token::RightParen) = self.current_token() {
                    self.advance(); // consume )
                    Ok(inner)
                } else {
                    Err(self.expected("')'"))
                }
            }

            token => Err(ParseError::unexpected_at(
                "a number, variable, function or '('",
                token.to_user_string(),
                spanned.span,
            )),
        }
    }

    fn parse_call(&mut self, name: &str, name_span: Span) -> Result<Node, ParseError> {
        let func = Function::from_name(name).ok_or_else(|| ParseError::UnknownFunction {
            name: name.to_string(),
            span: Some(name_span),
        })?;

        let mut args = self.parse_arguments()?;
        if args.len() != 1 {
            return Err(ParseError::WrongArgumentCount {
                name: name.to_string(),
                count: args.len(),
                span: Some(name_span),
            });
        }

        let arg = args.remove(0);
        self.node(Expr::call(func, arg.expr), arg.depth + 1)
    }

    fn parse_infix(
        &mut self,
        left: Node,
        op: Operator,
        precedence: u8,
    ) -> Result<Node, ParseError> {
        self.advance();

        // Right associative for power, left for others
        let next_precedence = if op == Operator::Pow {
            precedence
        } else {
            precedence + 1
        };

        let right = self.parse_expr(next_precedence)?;
        let depth = 1 + left.depth.max(right.depth);
        let (l, r) = (left.expr, right.expr);

        let expr = match op {
            Operator::Add => Expr::add_expr(l, r),
            Operator::Sub => Expr::sub_expr(l, r),
            Operator::Mul => Expr::mul_expr(l, r),
            Operator::Div => Expr::div_expr(l, r),
            Operator::Pow => Expr::pow(l, r),
        };
        self.node(expr, depth)
    }
}
