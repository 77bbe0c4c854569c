//! CLI support for sift-lang
//!
//! Provides programmatic access to the `sift` CLI functionality for
//! embedding in other tools.

mod check;
mod tokens;

pub use check::{execute_check, CheckOptions, CheckResult};
pub use tokens::execute_tokens;

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Compilation error from any stage
    Compile(crate::CompileError),
    /// IO error
    Io(io::Error),
    /// No expression provided
    NoExpression,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Compile(e) => write!(f, "Compile error: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoExpression => {
                write!(
                    f,
                    "No expression provided. Pass one as an argument or pipe it to stdin."
                )
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Compile(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::CompileError> for CliError {
    fn from(e: crate::CompileError) -> Self {
        CliError::Compile(e)
    }
}

impl From<crate::LexError> for CliError {
    fn from(e: crate::LexError) -> Self {
        CliError::Compile(e.into())
    }
}

impl From<crate::ParseError> for CliError {
    fn from(e: crate::ParseError) -> Self {
        CliError::Compile(e.into())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
