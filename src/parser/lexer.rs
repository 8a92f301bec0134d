//! Lexer: formula text to a flat token stream
//!
//! Parenthesis balance is validated here so that the parser only ever sees
//! well-nested groups.

use super::tokens::{Operator, SpannedToken, Token};
use crate::{ParseError, Span};

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Tokenize `input`, returning every token with its byte span
pub(crate) fn lex(input: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::with_capacity(input.len() / 2 + 1);
    let mut open_parens: Vec<usize> = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = if c.is_ascii_digit() || c == '.' {
            let end = scan_number(bytes, start);
            let text = &input[start..end];
            while chars.peek().is_some_and(|&(i, _)| i < end) {
                chars.next();
            }
            let value: f64 = text.parse().map_err(|_| ParseError::InvalidNumber {
                value: text.to_string(),
                span: Some(Span::new(start, end)),
            })?;
            tokens.push(SpannedToken {
                token: Token::Number(value),
                span: Span::new(start, end),
            });
            continue;
        } else if is_ident_start(c) {
            let mut end = start;
            while let Some(&(i, ch)) = chars.peek() {
                if !is_ident_continue(ch) {
                    break;
                }
                end = i + ch.len_utf8();
                chars.next();
            }
            tokens.push(SpannedToken {
                token: Token::Identifier(input[start..end].to_string()),
                span: Span::new(start, end),
            });
            continue;
        } else {
            chars.next();
            match c {
                '+' => Token::Operator(Operator::Add),
                '-' => Token::Operator(Operator::Sub),
                '/' => Token::Operator(Operator::Div),
                '^' => Token::Operator(Operator::Pow),
                '*' => {
                    if chars.peek().is_some_and(|&(_, next)| next == '*') {
                        chars.next();
                        tokens.push(SpannedToken {
                            token: Token::Operator(Operator::Pow),
                            span: Span::new(start, start + 2),
                        });
                        continue;
                    }
                    Token::Operator(Operator::Mul)
                }
                '(' => {
                    open_parens.push(start);
                    Token::LeftParen
                }
                ')' => {
                    if open_parens.pop().is_none() {
                        return Err(ParseError::UnbalancedParentheses {
                            span: Some(Span::at(start)),
                        });
                    }
                    Token::RightParen
                }
                ',' => Token::Comma,
                other => {
                    return Err(ParseError::invalid_token_at(
                        other.to_string(),
                        Span::new(start, start + other.len_utf8()),
                    ));
                }
            }
        };

        tokens.push(SpannedToken {
            token,
            span: Span::at(start),
        });
    }

    if let Some(&unclosed) = open_parens.last() {
        return Err(ParseError::UnbalancedParentheses {
            span: Some(Span::at(unclosed)),
        });
    }

    Ok(tokens)
}

/// Find the end of a decimal literal starting at `start`
///
/// Accepts `12`, `1.5`, `.5`, `3.` and an exponent suffix (`1e-3`, `2E+4`).
/// The exponent is only consumed when digits follow it, so `2e` lexes as the
/// number `2` followed by the identifier `e`.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        if exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
                exp_end += 1;
            }
            end = exp_end;
        }
    }

    end
}
