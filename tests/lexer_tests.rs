// tests/lexer_tests.rs

use sift_lang::ast::TokenKind;
use sift_lang::lexer::Lexer;

fn lex(input: &str) -> Vec<TokenKind> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("*", TokenKind::Star),
        ("/", TokenKind::Slash),
        ("%", TokenKind::Percent),
        ("(", TokenKind::LParen),
        (")", TokenKind::RParen),
        ("<", TokenKind::Lt),
        (">", TokenKind::Gt),
        ("!", TokenKind::Not),
    ];

    for (input, expected) in test_cases {
        let tokens = lex(input);
        assert_eq!(tokens, vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_plus_minus_alone_are_operators() {
    // With no digit following there is no literal to sign
    assert_eq!(lex("+"), vec![TokenKind::Plus]);
    assert_eq!(lex("-"), vec![TokenKind::Minus]);
}

// ============================================================================
// Two Character Tokens
// ============================================================================

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("==", TokenKind::EqEq),
        ("!=", TokenKind::NotEq),
        ("<=", TokenKind::LtEq),
        (">=", TokenKind::GtEq),
        ("=>", TokenKind::Arrow),
        ("&&", TokenKind::And),
        ("||", TokenKind::Or),
    ];

    for (input, expected) in test_cases {
        let tokens = lex(input);
        assert_eq!(tokens, vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_two_char_vs_single_char() {
    assert_eq!(lex("< <="), vec![TokenKind::Lt, TokenKind::LtEq]);
    assert_eq!(lex("==!="), vec![TokenKind::EqEq, TokenKind::NotEq]);
}

// ============================================================================
// Operator Errors
// ============================================================================

#[test]
fn test_bare_equals_is_invalid() {
    let result = Lexer::new("a = 1").tokenize();
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(message.contains("unexpected '='"));
    assert!(message.contains("at pos 2"));
}

#[test]
fn test_single_pipe_is_invalid() {
    let result = Lexer::new("a | b").tokenize();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unexpected '|'"));
}

#[test]
fn test_single_ampersand_is_invalid() {
    let result = Lexer::new("a & b").tokenize();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("unexpected '&'"));
}

#[test]
fn test_invalid_character() {
    let result = Lexer::new("#").tokenize();
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("unexpected character '#' at pos 0")
    );
}

#[test]
fn test_no_partial_token_list_on_error() {
    // The error swallows everything lexed before it
    let result = Lexer::new("a > 1 && #").tokenize();
    assert!(result.is_err());
}

// ============================================================================
// Numbers
// ============================================================================

#[test]
fn test_integers() {
    let test_cases = vec![("0", 0), ("1", 1), ("42", 42), ("123456", 123456)];

    for (input, expected) in test_cases {
        let tokens = lex(input);
        assert_eq!(
            tokens,
            vec![TokenKind::Integer(expected)],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_floats() {
    let test_cases = vec![("0.0", 0.0), ("1.5", 1.5), ("3.15", 3.15), ("123.456", 123.456)];

    for (input, expected) in test_cases {
        let tokens = lex(input);
        match &tokens[..] {
            [TokenKind::Float(n)] => {
                assert!((n - expected).abs() < 0.0001, "Failed for input: {}", input)
            }
            other => panic!("Expected Float, got {:?} for input: {}", other, input),
        }
    }
}

#[test]
fn test_signed_literals() {
    assert_eq!(lex("-1"), vec![TokenKind::Integer(-1)]);
    assert_eq!(lex("+1"), vec![TokenKind::Integer(1)]);
    match &lex("-2.5")[..] {
        [TokenKind::Float(n)] => assert!((n + 2.5).abs() < 0.0001),
        other => panic!("Expected Float, got {:?}", other),
    }
}

#[test]
fn test_minus_after_operand_is_binary() {
    assert_eq!(
        lex("a - 1"),
        vec![
            TokenKind::Symbol("a".to_string()),
            TokenKind::Minus,
            TokenKind::Integer(1),
        ]
    );
    // Same without spaces: the symbol still terminates an operand
    assert_eq!(
        lex("a -1"),
        vec![
            TokenKind::Symbol("a".to_string()),
            TokenKind::Minus,
            TokenKind::Integer(1),
        ]
    );
    assert_eq!(
        lex("2-1"),
        vec![
            TokenKind::Integer(2),
            TokenKind::Minus,
            TokenKind::Integer(1),
        ]
    );
}

#[test]
fn test_sign_after_operator_is_literal() {
    assert_eq!(
        lex("a + -1"),
        vec![
            TokenKind::Symbol("a".to_string()),
            TokenKind::Plus,
            TokenKind::Integer(-1),
        ]
    );
    assert_eq!(
        lex("(-1)"),
        vec![
            TokenKind::LParen,
            TokenKind::Integer(-1),
            TokenKind::RParen,
        ]
    );
    // A closing parenthesis terminates an operand
    assert_eq!(
        lex("(a) - 1"),
        vec![
            TokenKind::LParen,
            TokenKind::Symbol("a".to_string()),
            TokenKind::RParen,
            TokenKind::Minus,
            TokenKind::Integer(1),
        ]
    );
}

#[test]
fn test_second_decimal_point_is_invalid() {
    let result = Lexer::new("1.2.3").tokenize();
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("malformed numeric literal")
    );
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_simple_strings() {
    let test_cases = vec![
        (r#""hello""#, "hello"),
        (r#""""#, ""),
        (r#""with spaces""#, "with spaces"),
        ("'single'", "single"),
        ("''", ""),
    ];

    for (input, expected) in test_cases {
        let tokens = lex(input);
        assert_eq!(
            tokens,
            vec![TokenKind::String(expected.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_string_escapes() {
    let test_cases = vec![
        (r#""a\nb""#, "a\nb"),
        (r#""a\tb""#, "a\tb"),
        (r#""a\rb""#, "a\rb"),
        (r#""a\bb""#, "a\u{0008}b"),
        (r#""a\fb""#, "a\u{000C}b"),
        (r#""a\vb""#, "a\u{000B}b"),
        // Unknown escapes pass the character through
        (r#""a\"b""#, "a\"b"),
        (r#""a\\b""#, "a\\b"),
        (r#""a\xb""#, "axb"),
    ];

    for (input, expected) in test_cases {
        let tokens = lex(input);
        assert_eq!(
            tokens,
            vec![TokenKind::String(expected.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_quote_styles_nest() {
    assert_eq!(
        lex(r#"'say "hi"'"#),
        vec![TokenKind::String("say \"hi\"".to_string())]
    );
}

#[test]
fn test_unterminated_string() {
    let result = Lexer::new("a == \"oops").tokenize();
    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    // Reported at the start of the string, not at end of input
    assert!(message.contains("unterminated string literal at pos 5"));
}

#[test]
fn test_backslash_at_end_of_input() {
    let result = Lexer::new("\"oops\\").tokenize();
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("unterminated string literal at pos 0")
    );
}

// ============================================================================
// Symbols and Functions
// ============================================================================

#[test]
fn test_symbols() {
    let test_cases = vec!["x", "foo", "bar123", "snake_case", "_private", "o.child.name"];

    for input in test_cases {
        let tokens = lex(input);
        assert_eq!(
            tokens,
            vec![TokenKind::Symbol(input.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

#[test]
fn test_function_token_consumes_open_paren() {
    assert_eq!(
        lex("Abs(1)"),
        vec![
            TokenKind::Function("Abs".to_string()),
            TokenKind::Integer(1),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_function_with_space_before_paren() {
    assert_eq!(
        lex("Abs (1)"),
        vec![
            TokenKind::Function("Abs".to_string()),
            TokenKind::Integer(1),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_dotted_function() {
    assert_eq!(
        lex("items.Any(x)"),
        vec![
            TokenKind::Function("items.Any".to_string()),
            TokenKind::Symbol("x".to_string()),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_symbol_without_paren_stays_symbol() {
    assert_eq!(
        lex("items.Count"),
        vec![TokenKind::Symbol("items.Count".to_string())]
    );
}

#[test]
fn test_keywords_lex_as_symbols() {
    // Keyword recognition happens in the semantic builder
    let test_cases = vec!["true", "false", "null", "E", "PI", "Tau", "if", "while"];

    for input in test_cases {
        let tokens = lex(input);
        assert_eq!(
            tokens,
            vec![TokenKind::Symbol(input.to_string())],
            "Failed for input: {}",
            input
        );
    }
}

// ============================================================================
// Whitespace Handling
// ============================================================================

#[test]
fn test_whitespace_dropped() {
    let inputs = vec!["a>1", "a > 1", "  a  >  1  ", "\ta\n>\r1"];

    for input in inputs {
        let tokens = lex(input);
        assert_eq!(
            tokens,
            vec![
                TokenKind::Symbol("a".to_string()),
                TokenKind::Gt,
                TokenKind::Integer(1),
            ],
            "Failed for input: {:?}",
            input
        );
    }
}

#[test]
fn test_empty_input() {
    assert_eq!(lex(""), vec![]);
    assert_eq!(lex("   \t\n  "), vec![]);
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_token_positions() {
    let tokens = Lexer::new("ab >= 12").tokenize().unwrap();
    let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
    assert_eq!(positions, vec![0, 3, 6]);
}

#[test]
fn test_full_expression() {
    let tokens = lex(r#"o => o.price > 10 && o.tags.Any(t => t == "sale")"#);
    assert_eq!(
        tokens,
        vec![
            TokenKind::Symbol("o".to_string()),
            TokenKind::Arrow,
            TokenKind::Symbol("o.price".to_string()),
            TokenKind::Gt,
            TokenKind::Integer(10),
            TokenKind::And,
            TokenKind::Function("o.tags.Any".to_string()),
            TokenKind::Symbol("t".to_string()),
            TokenKind::Arrow,
            TokenKind::Symbol("t".to_string()),
            TokenKind::EqEq,
            TokenKind::String("sale".to_string()),
            TokenKind::RParen,
        ]
    );
}
