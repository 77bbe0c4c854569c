//! JSON rendering of compiled operation trees.
//!
//! Renders an [`Operation`] as a `serde_json::Value` for display and
//! debugging, with compact and pretty string helpers. Output is
//! deterministic (object keys are sorted), so rendered trees are usable as
//! golden values in tests.
//!
//! # Examples
//!
//! ```
//! use sift_lang::{compile_with_env, Environment};
//! use sift_lang::output::to_json_string;
//!
//! let env = Environment::new().with_parameter("o");
//! let operation = compile_with_env("o.price > 10", &env).unwrap();
//! let json = to_json_string(&operation);
//! assert!(json.contains("\"greater\""));
//! ```

use serde_json::{json, Value};

use crate::ast::{Literal, Operation};
use crate::scope::Binding;

/// Render an operation tree as a JSON value.
pub fn to_json(operation: &Operation) -> Value {
    match operation {
        Operation::Arithmetic { op, left, right } => json!({
            "op": op.name(),
            "operands": [to_json(left), to_json(right)],
        }),
        Operation::Comparison { op, left, right } => json!({
            "op": op.name(),
            "operands": [to_json(left), to_json(right)],
        }),
        Operation::And(operands) => json!({
            "op": "and",
            "operands": operands.iter().map(to_json).collect::<Vec<_>>(),
        }),
        Operation::Or(operands) => json!({
            "op": "or",
            "operands": operands.iter().map(to_json).collect::<Vec<_>>(),
        }),
        Operation::Not(operand) => json!({
            "op": "not",
            "operands": [to_json(operand)],
        }),
        Operation::Literal(literal) => literal_json(literal),
        Operation::Field(field) => json!({
            "field": field.dotted(),
            "binding": binding_name(field.binding),
        }),
        Operation::Filter { parameter, body } => json!({
            "filter": { "parameter": parameter, "body": to_json(body) },
        }),
        Operation::Lambda { parameter, body } => json!({
            "lambda": { "parameter": parameter, "body": to_json(body) },
        }),
        Operation::Aggregate {
            op,
            field,
            parameter,
            body,
        } => json!({
            "op": op.name(),
            "field": field.dotted(),
            "parameter": parameter,
            "body": to_json(body),
        }),
        Operation::Quantifier {
            op,
            field,
            parameter,
            predicate,
        } => {
            let mut value = json!({
                "op": op.name(),
                "field": field.dotted(),
            });
            if let Some(parameter) = parameter {
                value["parameter"] = json!(parameter);
            }
            if let Some(predicate) = predicate {
                value["predicate"] = to_json(predicate);
            }
            value
        }
        Operation::StringPredicate { op, field, operand } => {
            let mut value = json!({
                "op": op.name(),
                "field": field.dotted(),
            });
            if let Some(operand) = operand {
                value["operand"] = to_json(operand);
            }
            value
        }
        Operation::MathFunction { op, operand } => json!({
            "op": op.name(),
            "operands": [to_json(operand)],
        }),
    }
}

/// Compact JSON string.
pub fn to_json_string(operation: &Operation) -> String {
    to_json(operation).to_string()
}

/// Pretty-printed JSON string.
pub fn to_json_pretty(operation: &Operation) -> String {
    serde_json::to_string_pretty(&to_json(operation)).expect("operation trees render as json")
}

fn literal_json(literal: &Literal) -> Value {
    match literal {
        Literal::String(s) => json!({ "literal": s }),
        Literal::Long(n) => json!({ "literal": n }),
        Literal::Double(x) => json!({ "literal": x }),
        Literal::Boolean(b) => json!({ "literal": b }),
        Literal::Null => json!({ "literal": null }),
        Literal::Constant(c) => json!({ "constant": c.name(), "value": c.value() }),
    }
}

fn binding_name(binding: Binding) -> &'static str {
    match binding {
        Binding::Parameter => "parameter",
        Binding::Variable => "variable",
    }
}
