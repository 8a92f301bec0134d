use crate::{
    Assignment, Bindings, Constant, EvalError, Expr, Function, Measurement, ParseError,
    PropagationError, Propagator, Span, differentiate, evaluate, gradient, parse,
    parse_with_limits, propagate,
};
use std::collections::HashMap;

#[test]
fn test_builder_configuration() {
    // Defaults: full precision, standard limits
    let assignment = Assignment::new().with("x", 3.0, 0.1);
    let res = Propagator::new().propagate_str("x^2", &assignment).unwrap();
    assert_eq!(res.value, 9.0);
    assert!((res.absolute_uncertainty - 0.6).abs() < 1e-12);

    // Rounded output
    let res = Propagator::new()
        .significant_figures(1)
        .propagate_str("x^2", &assignment)
        .unwrap();
    assert_eq!(res.absolute_uncertainty, 0.6);
    assert_eq!(res.fractional_uncertainty, Some(0.07));

    // Parsing through the builder honours its limits
    let err = Propagator::new().max_nodes(2).parse("a + b").unwrap_err();
    assert_eq!(err, ParseError::MaxNodesExceeded);
}

#[test]
fn test_expression_building() {
    // sqrt(g * L) built by hand equals the parsed form
    let built = Expr::call(
        Function::Sqrt,
        Expr::mul_expr(Expr::symbol("g"), Expr::symbol("L")),
    );
    assert_eq!(built, parse("sqrt(g*L)").unwrap());
    assert_eq!(built.to_string(), "sqrt(g*L)");
    assert_eq!(built.variables(), vec!["g".to_string(), "L".to_string()]);
    assert_eq!(built.sorted_variables(), vec!["L".to_string(), "g".to_string()]);
}

#[test]
fn test_constants_are_not_variables() {
    let expr = parse("2*pi*r + e").unwrap();
    assert_eq!(expr.variables(), vec!["r".to_string()]);
    assert!(matches!(
        expr,
        Expr::Add(_, ref right) if **right == Expr::constant(Constant::E)
    ));
}

#[test]
fn test_power_synonym() {
    assert_eq!(parse("x**2").unwrap(), parse("x^2").unwrap());
}

#[test]
fn test_parse_error_spans() {
    match parse("a + $") {
        Err(ParseError::InvalidToken { token, span }) => {
            assert_eq!(token, "$");
            assert_eq!(span, Some(Span::at(4)));
        }
        other => panic!("Expected InvalidToken, got {:?}", other),
    }
    assert!(matches!(
        parse("(a + b"),
        Err(ParseError::UnbalancedParentheses { .. })
    ));
    assert_eq!(parse("  "), Err(ParseError::EmptyFormula));
}

#[test]
fn test_limits() {
    assert_eq!(
        parse_with_limits("a*b*c", 100, 4),
        Err(ParseError::MaxNodesExceeded)
    );
    assert!(parse_with_limits("a*b*c", 100, 5).is_ok());
}

#[test]
fn test_gradient_and_evaluate() {
    let expr = parse("x*y + sin(x)").unwrap();
    let grad = gradient(&expr, &["x", "y"]);
    let at: HashMap<&str, f64> = [("x", 0.0), ("y", 2.0)].into_iter().collect();
    assert_eq!(evaluate(&grad[0], &at).unwrap(), 3.0);
    assert_eq!(evaluate(&grad[1], &at).unwrap(), 0.0);
    assert_eq!(differentiate(&expr, "y"), Expr::symbol("x"));
}

#[test]
fn test_custom_bindings() {
    // Any type can supply values
    struct Everywhere(f64);
    impl Bindings for Everywhere {
        fn value_of(&self, _name: &str) -> Option<f64> {
            Some(self.0)
        }
    }

    let expr = parse("a + b + c").unwrap();
    assert_eq!(expr.evaluate(&Everywhere(2.0)), Ok(6.0));
}

#[test]
fn test_assignment_reuse_across_formulas() {
    let assignment: Assignment = [
        ("m", Measurement::new(2.0, 0.1)),
        ("v", Measurement::new(10.0, 0.5)),
    ]
    .into_iter()
    .collect();

    let momentum = propagate(&parse("m*v").unwrap(), &assignment).unwrap();
    let energy = propagate(&parse("0.5*m*v^2").unwrap(), &assignment).unwrap();
    assert_eq!(momentum.value, 20.0);
    assert_eq!(energy.value, 100.0);
    // Relative uncertainty of v counts twice in v^2
    assert!(energy.fractional().unwrap() > momentum.fractional().unwrap());
}

#[test]
fn test_errors_surface_through_propagation() {
    let assignment = Assignment::new().with("x", -1.0, 0.1);
    assert_eq!(
        propagate(&parse("log(x)").unwrap(), &assignment),
        Err(PropagationError::Evaluation(EvalError::Domain {
            function: "log",
            argument: -1.0
        }))
    );
}
