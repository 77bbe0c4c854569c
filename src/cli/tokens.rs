//! Dump the token stream of an expression

use super::CliError;
use crate::Lexer;

/// Lex an expression and render one line per emitted token.
pub fn execute_tokens(expression: &str) -> Result<String, CliError> {
    let tokens = Lexer::new(expression).tokenize()?;

    let mut out = String::new();
    for token in &tokens {
        out.push_str(&format!("{:>5}  {:?}\n", token.position, token.kind));
    }
    Ok(out)
}
