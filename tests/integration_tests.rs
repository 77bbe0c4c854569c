// tests/integration_tests.rs
//
// End-to-end behavior of the whole pipeline: expression string in, typed
// operation tree or positioned error out.

use sift_lang::output::{to_json_pretty, to_json_string};
use sift_lang::{
    compile, compile_with_env, ArithmeticOp, CompileError, ComparisonOp, Environment, Literal,
    Operation, QuantifierOp,
};

// ============================================================================
// Precedence Properties
// ============================================================================

#[test]
fn test_conventional_precedence() {
    // 1 + 2 * 3  ->  add(1, multiply(2, 3))
    let op = compile("1 + 2 * 3").unwrap();
    match op {
        Operation::Arithmetic {
            op: ArithmeticOp::Add,
            left,
            right,
        } => {
            assert_eq!(*left, Operation::Literal(Literal::Long(1)));
            match *right {
                Operation::Arithmetic {
                    op: ArithmeticOp::Multiply,
                    left,
                    right,
                } => {
                    assert_eq!(*left, Operation::Literal(Literal::Long(2)));
                    assert_eq!(*right, Operation::Literal(Literal::Long(3)));
                }
                other => panic!("Expected multiply, got {:?}", other),
            }
        }
        other => panic!("Expected add, got {:?}", other),
    }
}

#[test]
fn test_grouping_overrides_precedence() {
    // (1 + 2) * 3  ->  multiply(add(1, 2), 3)
    let op = compile("(1 + 2) * 3").unwrap();
    match op {
        Operation::Arithmetic {
            op: ArithmeticOp::Multiply,
            left,
            right,
        } => {
            assert!(matches!(
                *left,
                Operation::Arithmetic { op: ArithmeticOp::Add, .. }
            ));
            assert_eq!(*right, Operation::Literal(Literal::Long(3)));
        }
        other => panic!("Expected multiply, got {:?}", other),
    }
}

#[test]
fn test_and_chain_is_one_operation() {
    let env = Environment::new().with_parameter("a");
    let op = compile_with_env("a.v > 1 && a.v < 10", &env).unwrap();
    match op {
        Operation::And(operands) => {
            assert_eq!(operands.len(), 2);
            assert!(matches!(
                operands[0],
                Operation::Comparison { op: ComparisonOp::Greater, .. }
            ));
            assert!(matches!(
                operands[1],
                Operation::Comparison { op: ComparisonOp::Less, .. }
            ));
        }
        other => panic!("Expected And, got {:?}", other),
    }

    // A third operand joins the same and, it does not nest
    let op = compile_with_env("a.v > 1 && a.v < 10 && a.v != 5", &env).unwrap();
    match op {
        Operation::And(operands) => {
            assert_eq!(operands.len(), 3);
            assert!(operands
                .iter()
                .all(|operand| matches!(operand, Operation::Comparison { .. })));
        }
        other => panic!("Expected And, got {:?}", other),
    }
}

// ============================================================================
// Lambdas and Scope
// ============================================================================

#[test]
fn test_top_level_filter_binds_parameter() {
    let op = compile("o => o.value > 0").unwrap();
    match op {
        Operation::Filter { parameter, body } => {
            assert_eq!(parameter, "o");
            assert!(matches!(*body, Operation::Comparison { .. }));
        }
        other => panic!("Expected Filter, got {:?}", other),
    }
}

#[test]
fn test_unbound_field_root_fails() {
    let err = compile("o.value > 0").unwrap_err();
    match &err {
        CompileError::Semantic(e) => {
            let message = e.to_string();
            assert!(message.contains("variable 'o' not found"));
            assert!(message.contains("at pos 0"));
        }
        other => panic!("Expected semantic error, got {:?}", other),
    }
}

#[test]
fn test_quantifier_over_declared_root() {
    let env = Environment::new().with_variable("items");
    let op = compile_with_env("items.Any(x => x.price > 10)", &env).unwrap();
    assert!(matches!(
        op,
        Operation::Quantifier { op: QuantifierOp::Any, .. }
    ));
}

#[test]
fn test_nested_parameter_reuse_rejected() {
    let env = Environment::new().with_variable("items");
    let err =
        compile_with_env("items.Any(x => x.tags.Any(x => x == \"sale\"))", &env).unwrap_err();
    assert!(err.to_string().contains("parameter 'x' already used"));
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_repeated_compiles_are_structurally_identical() {
    let expressions = vec![
        "1 + 2 * 3",
        "o => o.price > 10 && o.tags.Any(t => t == \"sale\")",
        "o => Abs(o.balance) > o.items.Sum(x => x.price) * 1.1",
        "(a || b) && !c",
    ];

    for expression in expressions {
        let env = Environment::new()
            .with_parameter("a")
            .with_variable("b")
            .with_variable("c");
        let first = compile_with_env(expression, &env).unwrap();
        let second = compile_with_env(expression, &env).unwrap();
        assert_eq!(first, second, "Failed for expression: {}", expression);
    }
}

// ============================================================================
// Malformed Input
// ============================================================================

#[test]
fn test_unmatched_open_parenthesis() {
    let err = compile("(1 + 2").unwrap_err();
    assert_eq!(err.to_string(), "unmatched opening parenthesis at pos 0");
}

#[test]
fn test_unmatched_close_parenthesis() {
    let err = compile("1 + 2)").unwrap_err();
    assert!(err.to_string().contains("unmatched closing parenthesis"));
}

#[test]
fn test_numeric_operand_type_errors() {
    assert!(
        compile("1 + true")
            .unwrap_err()
            .to_string()
            .contains("must use numeric operands")
    );
    assert!(
        compile("true + false")
            .unwrap_err()
            .to_string()
            .contains("must use numeric operands")
    );
}

#[test]
fn test_every_error_is_positioned() {
    // One representative of each error class; every message carries the
    // human-readable position suffix
    let cases: Vec<(&str, Environment)> = vec![
        ("a = 1", Environment::new()),
        ("\"unterminated", Environment::new()),
        ("1.2.3", Environment::new()),
        ("a ? b", Environment::new()),
        ("&& a", Environment::new()),
        ("(1 + 2", Environment::new()),
        ("1 + 2)", Environment::new()),
        ("1 => 2", Environment::new()),
        ("1 + true", Environment::new()),
        ("o.value", Environment::new()),
        (".value", Environment::new()),
        ("if", Environment::new()),
        ("Nope(1)", Environment::new()),
        ("o.x.Nope(1)", Environment::new().with_parameter("o")),
        ("o.items.Sum(1)", Environment::new().with_parameter("o")),
        ("o.name.Matches(\"[\")", Environment::new().with_parameter("o")),
        (
            "o => o.value > 0",
            Environment::new().with_parameter("o"),
        ),
    ];

    for (expression, env) in cases {
        let err = compile_with_env(expression, &env).unwrap_err();
        let message = err.to_string();
        assert!(
            message.contains(" at pos "),
            "Message without position for {:?}: {}",
            expression,
            message
        );
    }
}

#[test]
fn test_errors_are_values_not_panics() {
    // A grab bag of hostile inputs; none may panic
    let inputs = vec![
        "",
        "   ",
        ")))",
        "(((",
        "&& || !",
        "=>",
        "1 2 3 4 5",
        "....",
        "o.items.Any(x =>)",
        "Abs(Abs(Abs(",
        "\"\\",
        "9999999999999999999999999",
    ];

    for input in inputs {
        let _ = compile(input);
    }
}

// ============================================================================
// Full Expressions
// ============================================================================

#[test]
fn test_realistic_filter() {
    let op = compile(
        "o => o.price > 10 && o.tags.Any(t => t == \"sale\") && o.name.StartsWith(\"winter\")",
    )
    .unwrap();

    match op {
        Operation::Filter { parameter, body } => {
            assert_eq!(parameter, "o");
            match *body {
                Operation::And(operands) => assert_eq!(operands.len(), 3),
                other => panic!("Expected And body, got {:?}", other),
            }
        }
        other => panic!("Expected Filter, got {:?}", other),
    }
}

#[test]
fn test_aggregate_in_comparison() {
    let env = Environment::new().with_parameter("o");
    let op = compile_with_env(
        "o.items.Sum(x => x.price) > o.items.Count() * 5",
        &env,
    )
    .unwrap();
    assert!(matches!(
        op,
        Operation::Comparison { op: ComparisonOp::Greater, .. }
    ));
}

// ============================================================================
// JSON Output
// ============================================================================

#[test]
fn test_json_rendering() {
    let op = compile("o => o.price > 10").unwrap();
    let json = to_json_string(&op);
    assert!(json.contains("\"filter\""));
    assert!(json.contains("\"greater\""));
    assert!(json.contains("\"o.price\""));

    // Deterministic output
    assert_eq!(json, to_json_string(&op));
}

#[test]
fn test_json_pretty_rendering() {
    let env = Environment::new().with_variable("items");
    let op = compile_with_env("items.Count() > 3", &env).unwrap();
    let pretty = to_json_pretty(&op);
    assert!(pretty.contains('\n'));
    assert!(pretty.contains("\"count\""));
}
