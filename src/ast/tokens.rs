/// A single lexical token with its source position.
///
/// Tokens are produced once by the lexer and never mutated. The `position`
/// is a character offset into the original expression and is used only for
/// diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Token { kind, position }
    }

    /// Short spelling of the token for diagnostics.
    pub fn describe(&self) -> String {
        self.kind.describe()
    }
}

/// Lexical token kinds.
///
/// Keywords (`true`, `null`, `E`, ...) are not recognized here; they lex as
/// plain symbols and are resolved during semantic building.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or dotted field path
    ///
    /// Starts with a letter, underscore or dot, continues with letters,
    /// digits, underscores or dots, so a full path lexes as one token.
    ///
    /// # Examples
    /// ```text
    /// price
    /// o.child.name
    /// _internal
    /// ```
    Symbol(String),

    /// Function or method call name
    ///
    /// A symbol whose next non-whitespace character is `(`. The opening
    /// parenthesis is consumed as part of this token.
    ///
    /// # Examples
    /// ```text
    /// Abs(
    /// items.Any(
    /// o.name.Contains(
    /// ```
    Function(String),

    /// Integer literal, possibly signed
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -10
    /// ```
    Integer(i64),

    /// Floating-point literal, `.` as the decimal separator regardless of
    /// locale
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// -0.5
    /// ```
    Float(f64),

    /// String literal enclosed in matching `"` or `'`
    ///
    /// # Examples
    /// ```text
    /// "sale"
    /// 'discounted'
    /// ```
    String(String),

    // Arithmetic
    /// Addition (`+`)
    Plus,

    /// Subtraction (`-`)
    Minus,

    /// Multiplication (`*`)
    Star,

    /// Division (`/`)
    Slash,

    /// Modulo (`%`)
    Percent,

    // Comparison
    /// Greater than (`>`)
    Gt,

    /// Greater than or equal (`>=`)
    GtEq,

    /// Less than (`<`)
    Lt,

    /// Less than or equal (`<=`)
    LtEq,

    /// Equality (`==`)
    EqEq,

    /// Inequality (`!=`)
    NotEq,

    // Logical
    /// Logical AND (`&&`), variadic in the operation tree
    And,

    /// Logical OR (`||`), variadic in the operation tree
    Or,

    /// Logical NOT (`!`)
    Not,

    /// Lambda arrow (`=>`)
    ///
    /// Binds a parameter name to a lambda body.
    ///
    /// # Examples
    /// ```text
    /// o => o.price > 10
    /// items.Any(x => x.price > 10)
    /// ```
    Arrow,

    // Grouping
    /// Opening parenthesis used for grouping (a call's `(` is consumed by
    /// its [`TokenKind::Function`] token instead)
    LParen,

    /// Closing parenthesis, shared by grouping and calls
    RParen,

    /// Run of whitespace. Produced internally by the lexer and dropped from
    /// the emitted token sequence.
    Whitespace,

    /// End of input. Terminates the lexer loop and is never emitted.
    Eof,
}

impl TokenKind {
    /// Spelling of the token for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Symbol(name) => name.clone(),
            TokenKind::Function(name) => format!("{}(", name),
            TokenKind::Integer(n) => n.to_string(),
            TokenKind::Float(n) => n.to_string(),
            TokenKind::String(s) => format!("\"{}\"", s),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Percent => "%".to_string(),
            TokenKind::Gt => ">".to_string(),
            TokenKind::GtEq => ">=".to_string(),
            TokenKind::Lt => "<".to_string(),
            TokenKind::LtEq => "<=".to_string(),
            TokenKind::EqEq => "==".to_string(),
            TokenKind::NotEq => "!=".to_string(),
            TokenKind::And => "&&".to_string(),
            TokenKind::Or => "||".to_string(),
            TokenKind::Not => "!".to_string(),
            TokenKind::Arrow => "=>".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Whitespace => " ".to_string(),
            TokenKind::Eof => "<eof>".to_string(),
        }
    }

    /// Whether this token can end an operand. The lexer uses this to decide
    /// if a following `+`/`-` is a binary operator or a literal sign.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Symbol(_)
                | TokenKind::Integer(_)
                | TokenKind::Float(_)
                | TokenKind::RParen
        )
    }
}
