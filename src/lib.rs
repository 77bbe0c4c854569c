pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod scope;
pub mod semantic;

pub use ast::{
    AggregateOp, ArithmeticOp, Arity, ComparisonOp, FieldPath, Literal, MathOp, NamedConstant,
    Operation, QuantifierOp, StringOp, SyntaxTree, Token, TokenKind,
};
pub use lexer::{LexError, Lexer};
pub use output::{to_json, to_json_pretty, to_json_string};
pub use parser::{ParseError, Parser};
pub use scope::{Binding, Environment, Scope};
pub use semantic::{SemanticBuilder, SemanticError};

/// Any failure of the three compilation stages.
///
/// Every variant's message ends with a human-readable ` at pos <offset>`
/// suffix pointing into the original expression.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    /// Lexical error
    Lex(LexError),
    /// Structural error
    Parse(ParseError),
    /// Type, arity or scope error
    Semantic(SemanticError),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{}", e),
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::Semantic(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Lex(e) => Some(e),
            CompileError::Parse(e) => Some(e),
            CompileError::Semantic(e) => Some(e),
        }
    }
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<SemanticError> for CompileError {
    fn from(e: SemanticError) -> Self {
        CompileError::Semantic(e)
    }
}

/// Compile an expression with an empty environment.
///
/// The expression must bind its own names, typically with a top-level
/// lambda.
///
/// # Examples
///
/// ```
/// use sift_lang::{compile, Operation};
///
/// let operation = compile("o => o.price > 10").unwrap();
/// assert!(matches!(operation, Operation::Filter { .. }));
/// ```
pub fn compile(expression: &str) -> Result<Operation, CompileError> {
    compile_with_env(expression, &Environment::new())
}

/// Compile an expression against a pre-populated environment.
///
/// The environment may supply the top-level lambda parameter name and any
/// externally bound variable names to treat as valid field roots.
///
/// # Examples
///
/// ```
/// use sift_lang::{compile_with_env, Environment, Operation};
///
/// let env = Environment::new().with_variable("items");
/// let operation = compile_with_env("items.Any(x => x.price > 10)", &env).unwrap();
/// assert!(matches!(operation, Operation::Quantifier { .. }));
/// ```
pub fn compile_with_env(
    expression: &str,
    env: &Environment,
) -> Result<Operation, CompileError> {
    let tokens = Lexer::new(expression).tokenize()?;
    let tree = Parser::new(tokens).parse()?;
    let operation = SemanticBuilder::new(env.to_scope()).build(&tree)?;
    Ok(operation)
}
