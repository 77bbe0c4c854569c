use crate::scope::Binding;

/// Typed, validated operation tree.
///
/// This is the compiler's final output, handed to the downstream query
/// engine for evaluation. The tree is immutable once built and owned solely
/// by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Arithmetic over two numeric operands
    ///
    /// # Example
    /// ```text
    /// o.price * 1.1
    /// ```
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Operation>,
        right: Box<Operation>,
    },

    /// Comparison of two operands
    ///
    /// Relational comparisons accept numeric or string operands; equality
    /// comparisons accept any type.
    ///
    /// # Example
    /// ```text
    /// o.price > 10
    /// ```
    Comparison {
        op: ComparisonOp,
        left: Box<Operation>,
        right: Box<Operation>,
    },

    /// Logical AND over two or more boolean operands
    And(Vec<Operation>),

    /// Logical OR over two or more boolean operands
    Or(Vec<Operation>),

    /// Logical negation of a single boolean operand
    Not(Box<Operation>),

    /// Literal value
    Literal(Literal),

    /// Dotted field path rooted at a lambda parameter or bound variable
    ///
    /// # Example
    /// ```text
    /// o.child.name
    /// ```
    Field(FieldPath),

    /// Named boolean filter declared with a top-level arrow
    ///
    /// # Example
    /// ```text
    /// o => o.price > 10
    /// ```
    Filter {
        parameter: String,
        body: Box<Operation>,
    },

    /// Named scalar lambda declared with a top-level arrow
    ///
    /// # Example
    /// ```text
    /// o => o.price * 2
    /// ```
    Lambda {
        parameter: String,
        body: Box<Operation>,
    },

    /// Collection-to-scalar reduction over a per-element lambda
    ///
    /// # Example
    /// ```text
    /// o.items.Sum(x => x.price)
    /// ```
    Aggregate {
        op: AggregateOp,
        field: FieldPath,
        parameter: String,
        body: Box<Operation>,
    },

    /// Collection predicate evaluated per element
    ///
    /// `Count` carries no lambda; `Any`, `All` and `CountWhere` carry the
    /// element parameter and its boolean predicate.
    ///
    /// # Examples
    /// ```text
    /// o.items.Any(x => x.price > 10)
    /// o.items.Count()
    /// ```
    Quantifier {
        op: QuantifierOp,
        field: FieldPath,
        parameter: Option<String>,
        predicate: Option<Box<Operation>>,
    },

    /// String test over a field
    ///
    /// `Length` carries no operand; the others carry a string literal or
    /// field operand.
    ///
    /// # Example
    /// ```text
    /// o.name.StartsWith("mr ")
    /// ```
    StringPredicate {
        op: StringOp,
        field: FieldPath,
        operand: Option<Box<Operation>>,
    },

    /// Math function over a single numeric operand
    ///
    /// # Example
    /// ```text
    /// Abs(o.balance)
    /// ```
    MathFunction {
        op: MathOp,
        operand: Box<Operation>,
    },
}

/// Arithmetic binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithmeticOp {
    pub fn name(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Subtract => "subtract",
            ArithmeticOp::Multiply => "multiply",
            ArithmeticOp::Divide => "divide",
            ArithmeticOp::Modulo => "modulo",
        }
    }
}

/// Comparison binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
}

impl ComparisonOp {
    pub fn name(&self) -> &'static str {
        match self {
            ComparisonOp::Greater => "greater",
            ComparisonOp::GreaterEqual => "greater-or-equal",
            ComparisonOp::Less => "less",
            ComparisonOp::LessEqual => "less-or-equal",
            ComparisonOp::Equal => "equal",
            ComparisonOp::NotEqual => "not-equal",
        }
    }

    /// Relational comparisons constrain operand types; equality does not.
    pub fn is_relational(&self) -> bool {
        !matches!(self, ComparisonOp::Equal | ComparisonOp::NotEqual)
    }
}

/// Collection reductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Min,
    Max,
    Sum,
    Average,
}

impl AggregateOp {
    pub fn name(&self) -> &'static str {
        match self {
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
            AggregateOp::Sum => "sum",
            AggregateOp::Average => "average",
        }
    }
}

/// Collection predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierOp {
    Any,
    All,
    Count,
    CountWhere,
}

impl QuantifierOp {
    pub fn name(&self) -> &'static str {
        match self {
            QuantifierOp::Any => "any",
            QuantifierOp::All => "all",
            QuantifierOp::Count => "count",
            QuantifierOp::CountWhere => "count-where",
        }
    }

    /// Any/All produce booleans; Count/CountWhere produce numbers.
    pub fn is_boolean(&self) -> bool {
        matches!(self, QuantifierOp::Any | QuantifierOp::All)
    }
}

/// String tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    Contains,
    StartsWith,
    EndsWith,
    Matches,
    Length,
}

impl StringOp {
    pub fn name(&self) -> &'static str {
        match self {
            StringOp::Contains => "contains",
            StringOp::StartsWith => "starts-with",
            StringOp::EndsWith => "ends-with",
            StringOp::Matches => "matches",
            StringOp::Length => "length",
        }
    }

    /// Length produces a number, the rest produce booleans.
    pub fn is_boolean(&self) -> bool {
        !matches!(self, StringOp::Length)
    }
}

/// Math functions over a single numeric operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Abs,
    Ceiling,
    Floor,
    Exp,
    Log,
    Sqrt,
}

impl MathOp {
    pub fn name(&self) -> &'static str {
        match self {
            MathOp::Abs => "abs",
            MathOp::Ceiling => "ceiling",
            MathOp::Floor => "floor",
            MathOp::Exp => "exp",
            MathOp::Log => "log",
            MathOp::Sqrt => "sqrt",
        }
    }
}

/// Well-known numeric constants recognized as keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedConstant {
    E,
    Pi,
    Tau,
}

impl NamedConstant {
    pub fn name(&self) -> &'static str {
        match self {
            NamedConstant::E => "e",
            NamedConstant::Pi => "pi",
            NamedConstant::Tau => "tau",
        }
    }

    pub fn value(&self) -> f64 {
        match self {
            NamedConstant::E => std::f64::consts::E,
            NamedConstant::Pi => std::f64::consts::PI,
            NamedConstant::Tau => std::f64::consts::TAU,
        }
    }
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Null,
    Constant(NamedConstant),
}

/// A dotted field path rooted at a name visible in scope.
///
/// `o.child.name` under parameter `o` has root `o` and segments
/// `["child", "name"]`; a bare parameter reference has no segments.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPath {
    pub root: String,
    pub segments: Vec<String>,
    pub binding: Binding,
}

impl FieldPath {
    pub fn new(root: String, segments: Vec<String>, binding: Binding) -> Self {
        FieldPath {
            root,
            segments,
            binding,
        }
    }

    /// Full dotted spelling, root included.
    pub fn dotted(&self) -> String {
        let mut path = self.root.clone();
        for segment in &self.segments {
            path.push('.');
            path.push_str(segment);
        }
        path
    }
}

impl Operation {
    /// Whether this operation produces a boolean when evaluated.
    ///
    /// Field references are excluded: a field may hold anything, so the
    /// named-filter/named-lambda split treats a bare field body as scalar.
    pub fn is_boolean(&self) -> bool {
        match self {
            Operation::Comparison { .. }
            | Operation::And(_)
            | Operation::Or(_)
            | Operation::Not(_)
            | Operation::Filter { .. } => true,
            Operation::Quantifier { op, .. } => op.is_boolean(),
            Operation::StringPredicate { op, .. } => op.is_boolean(),
            Operation::Literal(Literal::Boolean(_)) => true,
            _ => false,
        }
    }

    /// Whether this operation produces a number when evaluated.
    pub fn is_numeric(&self) -> bool {
        match self {
            Operation::Arithmetic { .. }
            | Operation::MathFunction { .. }
            | Operation::Aggregate { .. } => true,
            Operation::Quantifier { op, .. } => !op.is_boolean(),
            Operation::StringPredicate { op, .. } => !op.is_boolean(),
            Operation::Literal(literal) => matches!(
                literal,
                Literal::Long(_) | Literal::Double(_) | Literal::Constant(_)
            ),
            _ => false,
        }
    }

    /// Whether this operation is a string literal.
    pub fn is_string(&self) -> bool {
        matches!(self, Operation::Literal(Literal::String(_)))
    }

    /// Whether this operation is a field reference.
    ///
    /// A field's type is only known at evaluation time, so fields are
    /// accepted wherever a specific scalar type is required.
    pub fn is_field(&self) -> bool {
        matches!(self, Operation::Field(_))
    }
}
