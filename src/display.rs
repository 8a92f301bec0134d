// Display formatting for AST
//
// Output re-parses to a structurally equivalent tree, so derivative formulas
// can be shown to the user and pasted back as input.
use crate::Expr;
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => format_number(f, *n),

            Expr::Symbol(s) => write!(f, "{}", s),

            Expr::Constant(c) => write!(f, "{}", c.name()),

            Expr::Call { func, arg } => write!(f, "{}({})", func.name(), arg),

            Expr::Add(u, v) => {
                // Check if v is a negative term (Mul with -1) to display as subtraction
                if let Expr::Mul(left, right) = &**v
                    && left.as_number() == Some(-1.0)
                {
                    write!(f, "{} - {}", u, format_additive_rhs(right))
                } else {
                    write!(f, "{} + {}", u, format_additive_rhs(v))
                }
            }

            Expr::Sub(u, v) => {
                // Parenthesize RHS when it's an addition or subtraction to preserve
                // the intended grouping: `a - (b + c)` instead of `a - b + c`.
                write!(f, "{} - {}", u, format_additive_rhs(v))
            }

            Expr::Mul(u, v) => {
                if u.as_number() == Some(-1.0) {
                    write!(f, "-{}", format_negated(v))
                } else {
                    write!(f, "{}*{}", format_mul_operand(u), format_mul_rhs(v))
                }
            }

            Expr::Div(u, v) => {
                // Denominators are parenthesized unless atomic
                let formatted_denom = match &**v {
                    Expr::Symbol(_) | Expr::Constant(_) | Expr::Call { .. } => v.to_string(),
                    Expr::Number(n) if *n >= 0.0 => v.to_string(),
                    _ => format!("({})", v),
                };
                write!(f, "{}/{}", format_mul_operand(u), formatted_denom)
            }

            Expr::Pow(u, v) => {
                // Add parentheses around base if it's not atomic
                // (C * R)^2 should display as "(C*R)^2", not "C*R^2"
                let formatted_base = match &**u {
                    Expr::Symbol(_) | Expr::Constant(_) | Expr::Call { .. } => u.to_string(),
                    Expr::Number(n) if *n >= 0.0 => u.to_string(),
                    _ => format!("({})", u),
                };

                // Add parentheses around exponent if it's not a simple number or symbol
                let formatted_exp = match &**v {
                    Expr::Symbol(_) | Expr::Constant(_) => v.to_string(),
                    Expr::Number(n) if *n >= 0.0 => v.to_string(),
                    _ => format!("({})", v),
                };

                write!(f, "{}^{}", formatted_base, formatted_exp)
            }
        }
    }
}

fn format_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            write!(f, "Infinity")
        } else {
            write!(f, "-Infinity")
        }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        // Display as integer if no fractional part
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

/// Right operand of `+`/`-`: a nested sum keeps its grouping
fn format_additive_rhs(expr: &Expr) -> String {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => format!("({})", expr),
        Expr::Mul(l, _) if l.as_number() == Some(-1.0) => format!("({})", expr),
        _ => expr.to_string(),
    }
}

/// Operand of unary minus: anything looser than a power needs parentheses
fn format_negated(expr: &Expr) -> String {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) | Expr::Mul(_, _) | Expr::Div(_, _) => {
            format!("({})", expr)
        }
        Expr::Number(n) if *n < 0.0 => format!("({})", expr),
        _ => expr.to_string(),
    }
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) => format!("({})", expr),
        _ => expr.to_string(),
    }
}

/// Right operand of `*`: nested products and quotients keep their grouping
fn format_mul_rhs(expr: &Expr) -> String {
    match expr {
        Expr::Add(_, _) | Expr::Sub(_, _) | Expr::Mul(_, _) | Expr::Div(_, _) => {
            format!("({})", expr)
        }
        Expr::Number(n) if *n < 0.0 => format!("({})", expr),
        _ => expr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn round_trip(formula: &str) {
        let expr = parse(formula).unwrap();
        let shown = expr.to_string();
        let reparsed = parse(&shown).unwrap_or_else(|e| panic!("'{}' failed: {}", shown, e));
        assert_eq!(reparsed, expr, "'{}' displayed as '{}'", formula, shown);
    }

    #[test]
    fn test_display_number() {
        assert_eq!(Expr::number(3.0).to_string(), "3");
        assert!(Expr::number(314.0 / 100.0).to_string().starts_with("3.14"));
        assert_eq!(Expr::number(f64::INFINITY).to_string(), "Infinity");
    }

    #[test]
    fn test_display_basic() {
        assert_eq!(parse("l*w").unwrap().to_string(), "l*w");
        assert_eq!(parse("0.5*m*v^2").unwrap().to_string(), "0.5*m*v^2");
        assert_eq!(parse("sin(2*theta)").unwrap().to_string(), "sin(2*theta)");
        assert_eq!(parse("x - y").unwrap().to_string(), "x - y");
        assert_eq!(parse("-x").unwrap().to_string(), "-x");
    }

    #[test]
    fn test_display_parenthesizes() {
        assert_eq!(parse("(a + b)*c").unwrap().to_string(), "(a + b)*c");
        assert_eq!(parse("a - (b + c)").unwrap().to_string(), "a - (b + c)");
        assert_eq!(parse("(a*b)^2").unwrap().to_string(), "(a*b)^2");
        assert_eq!(parse("a/(b*c)").unwrap().to_string(), "a/(b*c)");
    }

    #[test]
    fn test_display_round_trips() {
        for formula in [
            "(v^2*sin(2*theta))/g",
            "a*(b/c)",
            "a/b/c",
            "a*(b*c)",
            "a + (b + c)",
            "a + (b - c)",
            "a - (b - c)",
            "x^(y^z)",
            "(x^y)^z",
            "-(a + b)",
            "a*-b",
            "2^-x",
            "-(-x)",
            "sqrt(abs(x - 1))/log10(y)",
            "pi*r^2 + e",
        ] {
            round_trip(formula);
        }
    }

    #[test]
    fn test_derivative_is_displayable() {
        let expr = parse("(v^2*sin(2*theta))/g").unwrap();
        let shown = expr.derive("g").to_string();
        assert!(parse(&shown).is_ok(), "derivative '{}' should re-parse", shown);
    }
}
