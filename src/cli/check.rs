//! Compile expressions and render the resulting operation tree

use super::CliError;
use crate::{compile_with_env, output, Environment, Lexer, Parser};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to compile
    pub expression: String,
    /// Top-level lambda parameter name to pre-bind
    pub parameter: Option<String>,
    /// Externally bound variable names to treat as field roots
    pub variables: Vec<String>,
    /// Pretty-print the output
    pub pretty: bool,
    /// Only run the lexer and parser, don't build operations
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Lexing and parsing passed
    SyntaxValid,
    /// Expression compiled; the operation tree as JSON
    Compiled(serde_json::Value),
}

/// Execute a sift check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    if options.syntax_only {
        let tokens = Lexer::new(&options.expression).tokenize()?;
        Parser::new(tokens).parse()?;
        return Ok(CheckResult::SyntaxValid);
    }

    let mut env = Environment::new();
    if let Some(parameter) = &options.parameter {
        env = env.with_parameter(parameter);
    }
    for variable in &options.variables {
        env = env.with_variable(variable);
    }

    let operation = compile_with_env(&options.expression, &env)?;
    Ok(CheckResult::Compiled(output::to_json(&operation)))
}
