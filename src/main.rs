use clap::{Parser as ClapParser, Subcommand};
use sift_lang::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sift")]
#[command(about = "Sift - compile lambda filter expressions into typed operation trees")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile an expression and print its operation tree
    Check {
        /// The expression to compile (reads from stdin if not provided)
        expression: Option<String>,

        /// Pre-bind the top-level lambda parameter name
        #[arg(short, long)]
        param: Option<String>,

        /// Bind an external variable name as a valid field root
        #[arg(short, long = "var")]
        vars: Vec<String>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,

        /// Only validate syntax, don't build operations
        #[arg(long)]
        syntax_only: bool,
    },

    /// Lex an expression and dump its token stream
    Tokens {
        /// The expression to lex (reads from stdin if not provided)
        expression: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            expression,
            param,
            vars,
            pretty,
            syntax_only,
        } => run_check(expression, param, vars, pretty, syntax_only),
        Commands::Tokens { expression } => run_tokens(expression),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_expression(expression: Option<String>) -> Result<String, CliError> {
    match expression {
        Some(s) => Ok(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Ok(buffer.trim_end().to_string())
        }
        None => Err(CliError::NoExpression),
    }
}

fn run_check(
    expression: Option<String>,
    param: Option<String>,
    vars: Vec<String>,
    pretty: bool,
    syntax_only: bool,
) -> Result<(), CliError> {
    let options = CheckOptions {
        expression: read_expression(expression)?,
        parameter: param,
        variables: vars,
        pretty,
        syntax_only,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Compiled(tree) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&tree)
            } else {
                serde_json::to_string(&tree)
            }
            .unwrap();
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_tokens(expression: Option<String>) -> Result<(), CliError> {
    let expression = read_expression(expression)?;
    print!("{}", cli::execute_tokens(&expression)?);
    Ok(())
}
