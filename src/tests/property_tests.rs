//! Property-Based Tests
//!
//! quickcheck properties over arbitrary text and over generated measurement
//! formulas: parser robustness, display re-parsing and the algebra of
//! first-order propagation.

use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};

use crate::{
    Assignment, Expr, combine_linear, combine_product, parse, propagate, propagate_str,
    round_to_significant_figures,
};

/// Variables of generated formulas
const VARIABLES: [&str; 3] = ["l", "m", "t"];

/// A measurement formula over [`VARIABLES`] that is defined whenever every
/// variable is positive
///
/// Terms stay positive by construction: leaves are variables or positive
/// literals, and only sums, products, quotients and small powers of positive
/// terms are formed. Functions with a restricted domain receive `1 + term`
/// or the term itself, and bounded functions are shifted above zero.
#[derive(Debug, Clone)]
struct Formula(String);

impl Arbitrary for Formula {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = g.size().min(4);
        Formula(positive_term(g, depth))
    }
}

fn positive_term(g: &mut Gen, depth: usize) -> String {
    if depth == 0 {
        return match u8::arbitrary(g) % 5 {
            0 | 1 | 2 => VARIABLES[usize::arbitrary(g) % VARIABLES.len()].to_string(),
            3 => format!("{}", u8::arbitrary(g) % 9 + 1),
            _ => "pi".to_string(),
        };
    }

    let next = depth - 1;
    match u8::arbitrary(g) % 9 {
        0 => format!("({} + {})", positive_term(g, next), positive_term(g, next)),
        1 => format!("{}*{}", positive_term(g, next), positive_term(g, next)),
        2 => format!("{}/({})", positive_term(g, next), positive_term(g, next)),
        3 => format!("({})^{}", positive_term(g, next), u8::arbitrary(g) % 3 + 1),
        4 => format!("sqrt({})", positive_term(g, next)),
        5 => format!("log(1 + {})", positive_term(g, next)),
        6 => format!("exp(-{})", positive_term(g, next)),
        7 => format!("(2 + sin({}))", positive_term(g, next)),
        _ => format!("atan({})", positive_term(g, next)),
    }
}

/// A measurement value in [0.5, 2)
fn nominal(raw: u16) -> f64 {
    0.5 + (raw % 1500) as f64 / 1000.0
}

/// A strictly positive measurement value in (0, 1000]
fn positive(raw: u16) -> f64 {
    (raw as f64 + 1.0) / 64.0
}

/// A non-negative uncertainty in [0, 10)
fn spread(raw: u16) -> f64 {
    (raw % 1000) as f64 / 100.0
}

/// Measurements for exactly the variables of `expr`
fn measurements(expr: &Expr, values: [u16; 3], uncertainty: f64) -> Assignment {
    let mut assignment = Assignment::new();
    for name in expr.variables() {
        let slot = VARIABLES.iter().position(|v| *v == name).unwrap_or(0);
        assignment = assignment.with(name, nominal(values[slot]), uncertainty);
    }
    assignment
}

#[cfg(test)]
mod parser_fuzz_tests {
    use super::*;

    /// Property: Parser should never panic on arbitrary input
    #[test]
    fn test_parser_never_panics_on_random_input() {
        fn prop_parser_no_panic(input: String) -> TestResult {
            // Parser should either succeed or return Err, never panic
            let _ = parse(&input);
            TestResult::passed()
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(2000)
            .quickcheck(prop_parser_no_panic as fn(String) -> TestResult);
    }

    /// Property: a displayed formula parses back to an expression with the
    /// same value
    #[test]
    fn test_display_reparses_to_same_value() {
        fn prop_display_round_trip(formula: Formula, values: (u16, u16, u16)) -> TestResult {
            let expr = match parse(&formula.0) {
                Ok(expr) => expr,
                Err(e) => return TestResult::error(format!("{}: {}", formula.0, e)),
            };
            let shown = expr.to_string();
            let reparsed = match parse(&shown) {
                Ok(expr) => expr,
                Err(e) => return TestResult::error(format!("{}: {}", shown, e)),
            };

            let (l, m, t) = values;
            let vars = [("l", nominal(l)), ("m", nominal(m)), ("t", nominal(t))];
            match (expr.evaluate(&vars), reparsed.evaluate(&vars)) {
                (Ok(a), Ok(b)) => TestResult::from_bool(a == b),
                (Err(_), Err(_)) => TestResult::discard(),
                _ => TestResult::failed(),
            }
        }
        QuickCheck::new()
            .tests(500)
            .max_tests(2000)
            .quickcheck(prop_display_round_trip as fn(Formula, (u16, u16, u16)) -> TestResult);
    }

    /// Fuzz test with specifically crafted edge cases
    #[test]
    fn test_parser_edge_cases() {
        let edge_cases = [
            "",
            "   ",
            "()",
            "((()))",
            "+++",
            "---x",
            "1+",
            "+1",
            "sin()",
            "sin(x,y)",
            "1..2",
            "1e999999",
            "1e-999999",
            "x^y^z",
            "x**y",
            "((((x))))",
            "sin(cos(tan(exp(ln(x)))))",
            "x+y*z^w/a-b",
            "1/0",
            "0/0",
            "(-0)",
            "2x",
            "∞", // Unicode
            "π", // Unicode pi
            "ℯ", // Unicode e
        ];

        for case in &edge_cases {
            // Should not panic - may succeed or fail with error
            let _ = parse(case);
        }
    }

    /// Test deeply nested expressions don't stack overflow
    #[test]
    fn test_parser_deep_nesting() {
        // Create deeply nested expression
        let mut expr = "x".to_string();
        for _ in 0..50 {
            expr = format!("({}+1)", expr);
        }

        // Should handle without stack overflow
        let result = parse(&expr);
        assert!(
            result.is_ok(),
            "Deep nesting should parse: {}",
            result.unwrap_err()
        );

        // Past the limit it is an error, not a crash
        let deep = format!("{}x{}", "(".repeat(10_000), ")".repeat(10_000));
        assert!(parse(&deep).is_err());
    }
}

#[cfg(test)]
mod propagation_property_tests {
    use super::*;

    /// Property: exact measurements propagate to zero uncertainty
    #[test]
    fn test_exact_inputs_have_no_uncertainty() {
        fn prop_exact(formula: Formula, values: (u16, u16, u16)) -> TestResult {
            let Ok(expr) = parse(&formula.0) else {
                return TestResult::failed();
            };
            let (l, m, t) = values;
            match propagate(&expr, &measurements(&expr, [l, m, t], 0.0)) {
                Ok(result) => TestResult::from_bool(result.absolute_uncertainty == 0.0),
                // overflow in a deep power or an underflowing quotient
                Err(_) => TestResult::discard(),
            }
        }
        QuickCheck::new()
            .tests(300)
            .max_tests(1000)
            .quickcheck(prop_exact as fn(Formula, (u16, u16, u16)) -> TestResult);
    }

    /// Property: first-order propagation is linear in the input
    /// uncertainties, so doubling every Δx doubles ΔQ
    #[test]
    fn test_uncertainty_scales_linearly() {
        fn prop_scaling(formula: Formula, values: (u16, u16, u16), raw: u16) -> TestResult {
            let Ok(expr) = parse(&formula.0) else {
                return TestResult::failed();
            };
            let (l, m, t) = values;
            let delta = spread(raw);
            let single = propagate(&expr, &measurements(&expr, [l, m, t], delta));
            let double = propagate(&expr, &measurements(&expr, [l, m, t], 2.0 * delta));
            match (single, double) {
                (Ok(single), Ok(double)) => {
                    let expected = 2.0 * single.absolute_uncertainty;
                    let tolerance = 1e-12 * expected.max(f64::MIN_POSITIVE);
                    TestResult::from_bool(
                        (double.absolute_uncertainty - expected).abs() <= tolerance
                            && double.value == single.value,
                    )
                }
                _ => TestResult::discard(),
            }
        }
        QuickCheck::new()
            .tests(300)
            .max_tests(1000)
            .quickcheck(prop_scaling as fn(Formula, (u16, u16, u16), u16) -> TestResult);
    }

    /// Property: the budget holds one entry per variable and its components
    /// combine in quadrature to the total
    #[test]
    fn test_budget_sums_in_quadrature() {
        fn prop_budget(formula: Formula, values: (u16, u16, u16), raw: u16) -> TestResult {
            let Ok(expr) = parse(&formula.0) else {
                return TestResult::failed();
            };
            let (l, m, t) = values;
            let Ok(result) = propagate(&expr, &measurements(&expr, [l, m, t], spread(raw)))
            else {
                return TestResult::discard();
            };
            // Normalized so tiny components do not underflow when squared
            let components = result.contributions.iter().map(|c| c.uncertainty_component);
            let largest = components.clone().fold(0.0_f64, f64::max);
            let total = result.absolute_uncertainty;
            let matches = if largest == 0.0 {
                total == 0.0
            } else {
                let root: f64 = components.map(|c| (c / largest).powi(2)).sum::<f64>().sqrt();
                (root * largest - total).abs() <= 1e-9 * total
            };
            TestResult::from_bool(result.contributions.len() == expr.variables().len() && matches)
        }
        QuickCheck::new()
            .tests(300)
            .max_tests(1000)
            .quickcheck(prop_budget as fn(Formula, (u16, u16, u16), u16) -> TestResult);
    }
}

#[cfg(test)]
mod calculus_property_tests {
    use super::*;
    use crate::differentiate;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON || (a - b).abs() < EPSILON * a.abs().max(b.abs())
    }

    /// Property: d/dx (a*f + b*g) = a*f' + b*g'
    #[test]
    fn test_differentiation_is_linear() {
        fn prop_linear(a: i8, b: i8, x: i16) -> bool {
            let (a, b) = (a as f64 / 4.0, b as f64 / 4.0);
            let x = x as f64 / 1000.0;
            let formula = format!("({})*sin(x) + ({})*x^3", a, b);
            let derivative = differentiate(&parse(&formula).unwrap(), "x");
            let value = derivative.evaluate(&[("x", x)]).unwrap();
            approx_eq(value, a * x.cos() + 3.0 * b * x * x)
        }
        QuickCheck::new()
            .tests(200)
            .quickcheck(prop_linear as fn(i8, i8, i16) -> bool);
    }

    /// Property: for Q = a*b, ΔQ/|Q| = sqrt((Δa/a)² + (Δb/b)²), matching the
    /// direct multiplicative combination
    #[test]
    fn test_product_relative_uncertainty() {
        fn prop_product(a: u16, b: u16, da: u16, db: u16) -> bool {
            let (a, b, da, db) = (positive(a), positive(b), spread(da), spread(db));
            let assignment = Assignment::new().with("a", a, da).with("b", b, db);
            let propagated = propagate_str("a*b", &assignment).unwrap();
            let direct = combine_product(&[a, b], &[da, db]).unwrap();

            let expected = ((da / a).powi(2) + (db / b).powi(2)).sqrt();
            approx_eq(propagated.fractional().unwrap(), expected)
                && approx_eq(direct.fractional().unwrap(), expected)
                && approx_eq(propagated.absolute_uncertainty, direct.absolute_uncertainty)
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_product as fn(u16, u16, u16, u16) -> bool);
    }

    /// Property: the quadrature sum never exceeds the linear sum
    #[test]
    fn test_quadrature_bounded_by_linear_sum() {
        fn prop_bounded(a: u16, b: u16, da: u16, db: u16) -> bool {
            let (a, b, da, db) = (positive(a), positive(b), spread(da), spread(db));
            let assignment = Assignment::new().with("a", a, da).with("b", b, db);
            let quadrature = propagate_str("a + b", &assignment).unwrap();
            let linear = combine_linear(&[a, b], &[da, db]).unwrap();
            quadrature.absolute_uncertainty <= linear.absolute_uncertainty + EPSILON
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop_bounded as fn(u16, u16, u16, u16) -> bool);
    }

    /// Property: rounding to significant figures is idempotent
    #[test]
    fn test_significant_figures_idempotent() {
        fn prop_idempotent(x: f64, n: u8) -> TestResult {
            if !x.is_finite() || !(x == 0.0 || (1e-300..1e300).contains(&x.abs())) {
                return TestResult::discard();
            }
            let n = (n % 10) as u32 + 1;
            let once = round_to_significant_figures(x, n);
            TestResult::from_bool(round_to_significant_figures(once, n) == once)
        }
        QuickCheck::new()
            .tests(1000)
            .max_tests(5000)
            .quickcheck(prop_idempotent as fn(f64, u8) -> TestResult);
    }
}
