use crate::ast::{
    AggregateOp, ArithmeticOp, ComparisonOp, FieldPath, Literal, MathOp, NamedConstant, NodeId,
    Operation, QuantifierOp, StringOp, SyntaxTree, TokenKind,
};
use crate::scope::Scope;

/// Semantic error with the character offset of the offending node.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    /// Wrong number of operands for an operator or method
    OperandCount {
        operator: String,
        expected: &'static str,
        position: usize,
    },

    /// Arithmetic over a non-numeric operand
    NumericOperands { operator: String, position: usize },

    /// Relational comparison over an operand that is neither numeric nor
    /// string
    ComparableOperands { operator: String, position: usize },

    /// Logical operator over a non-boolean operand
    BooleanOperands { operator: String, position: usize },

    /// Child node under a literal or plain symbol
    UnexpectedOperand {
        subject: &'static str,
        position: usize,
    },

    /// Use of `if`, `else`, `while`, `do` or `for`
    ForbiddenKeyword { position: usize },

    /// Lambda parameter name already visible in scope
    ParameterAlreadyUsed { name: String, position: usize },

    /// Field path rooted at a name not in scope
    VariableNotFound { name: String, position: usize },

    /// Field path starting with a dot, or an empty path
    MissingPrecedingVariable { position: usize },

    /// Field path with an empty segment
    MalformedPath { path: String, position: usize },

    /// Undotted call that is not a known math function
    UnknownFunction { name: String, position: usize },

    /// Dotted call whose trailing name is not a known method
    UnknownMethod {
        method: String,
        field: String,
        position: usize,
    },

    /// Method that needs a one-parameter lambda got something else
    LambdaRequired { method: String, position: usize },

    /// Quantifier lambda whose body is not boolean
    BooleanLambda { method: String, position: usize },

    /// Aggregate lambda whose body is not numeric
    NumericLambda { method: String, position: usize },

    /// String predicate over an operand that is neither a string literal
    /// nor a field
    StringOperand { method: String, position: usize },

    /// `Matches` pattern that does not compile
    InvalidPattern { pattern: String, position: usize },
}

impl std::fmt::Display for SemanticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticError::OperandCount {
                operator,
                expected,
                position,
            } => write!(f, "'{}' expects {} at pos {}", operator, expected, position),
            SemanticError::NumericOperands { operator, position } => {
                write!(f, "'{}' must use numeric operands at pos {}", operator, position)
            }
            SemanticError::ComparableOperands { operator, position } => write!(
                f,
                "'{}' must use numeric or string operands at pos {}",
                operator, position
            ),
            SemanticError::BooleanOperands { operator, position } => {
                write!(f, "'{}' must use boolean operands at pos {}", operator, position)
            }
            SemanticError::UnexpectedOperand { subject, position } => {
                write!(f, "unexpected operand on {} at pos {}", subject, position)
            }
            SemanticError::ForbiddenKeyword { position } => {
                write!(f, "conditional statements must not be used at pos {}", position)
            }
            SemanticError::ParameterAlreadyUsed { name, position } => {
                write!(f, "parameter '{}' already used at pos {}", name, position)
            }
            SemanticError::VariableNotFound { name, position } => {
                write!(f, "variable '{}' not found at pos {}", name, position)
            }
            SemanticError::MissingPrecedingVariable { position } => {
                write!(f, "missing preceding variable at pos {}", position)
            }
            SemanticError::MalformedPath { path, position } => {
                write!(f, "malformed field path '{}' at pos {}", path, position)
            }
            SemanticError::UnknownFunction { name, position } => {
                write!(f, "unknown function '{}' at pos {}", name, position)
            }
            SemanticError::UnknownMethod {
                method,
                field,
                position,
            } => write!(
                f,
                "unknown method '{}' on field '{}' at pos {}",
                method, field, position
            ),
            SemanticError::LambdaRequired { method, position } => write!(
                f,
                "'{}' requires a one-parameter lambda at pos {}",
                method, position
            ),
            SemanticError::BooleanLambda { method, position } => write!(
                f,
                "'{}' must use a boolean lambda body at pos {}",
                method, position
            ),
            SemanticError::NumericLambda { method, position } => write!(
                f,
                "'{}' must use a numeric lambda body at pos {}",
                method, position
            ),
            SemanticError::StringOperand { method, position } => write!(
                f,
                "'{}' must use a string literal or field operand at pos {}",
                method, position
            ),
            SemanticError::InvalidPattern { pattern, position } => {
                write!(f, "invalid match pattern '{}' at pos {}", pattern, position)
            }
        }
    }
}

impl std::error::Error for SemanticError {}

/// Converts a syntax tree into a typed, validated operation tree.
///
/// One recursive walk, dispatching on token kind. All type, arity and
/// scope validation happens here; the parser guarantees only structure.
/// Panics are reserved for tree shapes the parser cannot produce.
pub struct SemanticBuilder {
    scope: Scope,
}

impl SemanticBuilder {
    pub fn new(scope: Scope) -> Self {
        SemanticBuilder { scope }
    }

    /// Build the operation tree for the whole syntax tree.
    pub fn build(&mut self, tree: &SyntaxTree) -> Result<Operation, SemanticError> {
        self.build_operation(tree, tree.root())
    }

    fn build_operation(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
    ) -> Result<Operation, SemanticError> {
        let node = tree.node(id);
        let position = node.position();

        match &node.token.kind {
            TokenKind::Plus => self.build_arithmetic(tree, id, ArithmeticOp::Add),
            TokenKind::Minus => self.build_arithmetic(tree, id, ArithmeticOp::Subtract),
            TokenKind::Star => self.build_arithmetic(tree, id, ArithmeticOp::Multiply),
            TokenKind::Slash => self.build_arithmetic(tree, id, ArithmeticOp::Divide),
            TokenKind::Percent => self.build_arithmetic(tree, id, ArithmeticOp::Modulo),

            TokenKind::Gt => self.build_comparison(tree, id, ComparisonOp::Greater),
            TokenKind::GtEq => self.build_comparison(tree, id, ComparisonOp::GreaterEqual),
            TokenKind::Lt => self.build_comparison(tree, id, ComparisonOp::Less),
            TokenKind::LtEq => self.build_comparison(tree, id, ComparisonOp::LessEqual),
            TokenKind::EqEq => self.build_comparison(tree, id, ComparisonOp::Equal),
            TokenKind::NotEq => self.build_comparison(tree, id, ComparisonOp::NotEqual),

            TokenKind::And | TokenKind::Or => self.build_logical(tree, id),
            TokenKind::Not => self.build_not(tree, id),

            TokenKind::LParen => {
                let children = tree.children(id);
                if children.len() != 1 {
                    return Err(SemanticError::OperandCount {
                        operator: "(".to_string(),
                        expected: "exactly one operand",
                        position,
                    });
                }
                self.build_operation(tree, children[0])
            }

            TokenKind::Integer(value) => {
                self.expect_leaf(tree, id, "literal")?;
                Ok(Operation::Literal(Literal::Long(*value)))
            }
            TokenKind::Float(value) => {
                self.expect_leaf(tree, id, "literal")?;
                Ok(Operation::Literal(Literal::Double(*value)))
            }
            TokenKind::String(value) => {
                self.expect_leaf(tree, id, "literal")?;
                Ok(Operation::Literal(Literal::String(value.clone())))
            }

            TokenKind::Symbol(name) => self.build_symbol(tree, id, name),
            TokenKind::Function(name) => self.build_function(tree, id, name),

            // The parser attaches arrows under their symbol or call node
            // and never leaves one anywhere else; reaching this arm means
            // the tree builder is broken, not the expression.
            TokenKind::Arrow => unreachable!("arrow node outside a lambda position"),
            TokenKind::RParen | TokenKind::Whitespace | TokenKind::Eof => {
                unreachable!("non-tree token in syntax tree")
            }
        }
    }

    fn expect_leaf(
        &self,
        tree: &SyntaxTree,
        id: NodeId,
        subject: &'static str,
    ) -> Result<(), SemanticError> {
        if tree.children(id).is_empty() {
            Ok(())
        } else {
            Err(SemanticError::UnexpectedOperand {
                subject,
                position: tree.node(id).position(),
            })
        }
    }

    fn build_arithmetic(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        op: ArithmeticOp,
    ) -> Result<Operation, SemanticError> {
        let node = tree.node(id);
        let position = node.position();
        let operator = node.token.describe();

        let children = tree.children(id);
        if children.len() != 2 {
            return Err(SemanticError::OperandCount {
                operator,
                expected: "two operands",
                position,
            });
        }

        let left = self.build_operation(tree, children[0])?;
        let right = self.build_operation(tree, children[1])?;
        for operand in [&left, &right] {
            if !operand.is_numeric() && !operand.is_field() {
                return Err(SemanticError::NumericOperands {
                    operator: operator.clone(),
                    position,
                });
            }
        }

        Ok(Operation::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn build_comparison(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        op: ComparisonOp,
    ) -> Result<Operation, SemanticError> {
        let node = tree.node(id);
        let position = node.position();
        let operator = node.token.describe();

        let children = tree.children(id);
        if children.len() != 2 {
            return Err(SemanticError::OperandCount {
                operator,
                expected: "two operands",
                position,
            });
        }

        let left = self.build_operation(tree, children[0])?;
        let right = self.build_operation(tree, children[1])?;
        if op.is_relational() {
            for operand in [&left, &right] {
                if !operand.is_numeric() && !operand.is_string() && !operand.is_field() {
                    return Err(SemanticError::ComparableOperands {
                        operator: operator.clone(),
                        position,
                    });
                }
            }
        }

        Ok(Operation::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn build_logical(&mut self, tree: &SyntaxTree, id: NodeId) -> Result<Operation, SemanticError> {
        let node = tree.node(id);
        let position = node.position();
        let operator = node.token.describe();
        let is_and = node.token.kind == TokenKind::And;

        let children = tree.children(id);
        if children.len() < 2 {
            return Err(SemanticError::OperandCount {
                operator,
                expected: "at minimum two operands",
                position,
            });
        }

        let mut operands = Vec::with_capacity(children.len());
        for &child in children {
            let operand = self.build_operation(tree, child)?;
            // Fields pass: their runtime type is the engine's concern.
            if !operand.is_boolean() && !operand.is_field() {
                return Err(SemanticError::BooleanOperands {
                    operator: operator.clone(),
                    position,
                });
            }
            operands.push(operand);
        }

        if is_and {
            Ok(Operation::And(operands))
        } else {
            Ok(Operation::Or(operands))
        }
    }

    fn build_not(&mut self, tree: &SyntaxTree, id: NodeId) -> Result<Operation, SemanticError> {
        let node = tree.node(id);
        let position = node.position();

        let children = tree.children(id);
        if children.len() != 1 {
            return Err(SemanticError::OperandCount {
                operator: "!".to_string(),
                expected: "a single operand",
                position,
            });
        }

        let operand = self.build_operation(tree, children[0])?;
        if !operand.is_boolean() && !operand.is_field() {
            return Err(SemanticError::BooleanOperands {
                operator: "!".to_string(),
                position,
            });
        }
        Ok(Operation::Not(Box::new(operand)))
    }

    fn build_symbol(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        name: &str,
    ) -> Result<Operation, SemanticError> {
        let position = tree.node(id).position();
        let children = tree.children(id);

        if !children.is_empty() {
            let first = tree.node(children[0]);
            if children.len() == 1 && first.token.kind == TokenKind::Arrow {
                return self.build_named_lambda(tree, id, name);
            }
            return Err(SemanticError::UnexpectedOperand {
                subject: "symbol",
                position,
            });
        }

        match name {
            "true" => Ok(Operation::Literal(Literal::Boolean(true))),
            "false" => Ok(Operation::Literal(Literal::Boolean(false))),
            "null" => Ok(Operation::Literal(Literal::Null)),
            "E" => Ok(Operation::Literal(Literal::Constant(NamedConstant::E))),
            "PI" => Ok(Operation::Literal(Literal::Constant(NamedConstant::Pi))),
            "Tau" => Ok(Operation::Literal(Literal::Constant(NamedConstant::Tau))),
            "if" | "else" | "while" | "do" | "for" => {
                Err(SemanticError::ForbiddenKeyword { position })
            }
            _ => Ok(Operation::Field(self.resolve_path(name, position)?)),
        }
    }

    /// Top-level `name => body`: a named boolean filter when the body is
    /// boolean, a named scalar lambda otherwise.
    fn build_named_lambda(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        name: &str,
    ) -> Result<Operation, SemanticError> {
        let position = tree.node(id).position();
        let arrow = tree.children(id)[0];

        if !self.scope.bind_parameter(name) {
            return Err(SemanticError::ParameterAlreadyUsed {
                name: name.to_string(),
                position,
            });
        }

        let body = self.build_lambda_body(tree, arrow)?;
        if body.is_boolean() {
            Ok(Operation::Filter {
                parameter: name.to_string(),
                body: Box::new(body),
            })
        } else {
            Ok(Operation::Lambda {
                parameter: name.to_string(),
                body: Box::new(body),
            })
        }
    }

    fn build_lambda_body(
        &mut self,
        tree: &SyntaxTree,
        arrow: NodeId,
    ) -> Result<Operation, SemanticError> {
        let children = tree.children(arrow);
        if children.len() != 1 {
            return Err(SemanticError::OperandCount {
                operator: "=>".to_string(),
                expected: "exactly one operand",
                position: tree.node(arrow).position(),
            });
        }
        self.build_operation(tree, children[0])
    }

    fn build_function(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        name: &str,
    ) -> Result<Operation, SemanticError> {
        match name.rsplit_once('.') {
            None => self.build_math_function(tree, id, name),
            Some((field, method)) => {
                let position = tree.node(id).position();
                let field = self.resolve_path(field, position)?;
                self.build_method(tree, id, field, method)
            }
        }
    }

    fn build_math_function(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        name: &str,
    ) -> Result<Operation, SemanticError> {
        let position = tree.node(id).position();

        let op = match name {
            "Abs" => MathOp::Abs,
            "Ceiling" => MathOp::Ceiling,
            "Floor" => MathOp::Floor,
            "Exp" => MathOp::Exp,
            "Log" => MathOp::Log,
            "Sqrt" => MathOp::Sqrt,
            "if" | "else" | "while" | "do" | "for" => {
                return Err(SemanticError::ForbiddenKeyword { position });
            }
            _ => {
                return Err(SemanticError::UnknownFunction {
                    name: name.to_string(),
                    position,
                });
            }
        };

        let children = tree.children(id);
        if children.len() != 1 {
            return Err(SemanticError::OperandCount {
                operator: name.to_string(),
                expected: "exactly one operand",
                position,
            });
        }

        let operand = self.build_operation(tree, children[0])?;
        if !operand.is_numeric() && !operand.is_field() {
            return Err(SemanticError::NumericOperands {
                operator: name.to_string(),
                position,
            });
        }
        Ok(Operation::MathFunction {
            op,
            operand: Box::new(operand),
        })
    }

    fn build_method(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        field: FieldPath,
        method: &str,
    ) -> Result<Operation, SemanticError> {
        let position = tree.node(id).position();

        match method {
            "Min" | "Max" | "Sum" | "Average" => {
                let op = match method {
                    "Min" => AggregateOp::Min,
                    "Max" => AggregateOp::Max,
                    "Sum" => AggregateOp::Sum,
                    _ => AggregateOp::Average,
                };
                let (parameter, body) = self.build_lambda_argument(tree, id, method)?;
                if !body.is_numeric() && !body.is_field() {
                    return Err(SemanticError::NumericLambda {
                        method: method.to_string(),
                        position,
                    });
                }
                Ok(Operation::Aggregate {
                    op,
                    field,
                    parameter,
                    body: Box::new(body),
                })
            }

            "Any" | "All" => {
                let op = if method == "Any" {
                    QuantifierOp::Any
                } else {
                    QuantifierOp::All
                };
                let (parameter, body) = self.build_lambda_argument(tree, id, method)?;
                if !body.is_boolean() && !body.is_field() {
                    return Err(SemanticError::BooleanLambda {
                        method: method.to_string(),
                        position,
                    });
                }
                Ok(Operation::Quantifier {
                    op,
                    field,
                    parameter: Some(parameter),
                    predicate: Some(Box::new(body)),
                })
            }

            "Count" => {
                if tree.children(id).is_empty() {
                    return Ok(Operation::Quantifier {
                        op: QuantifierOp::Count,
                        field,
                        parameter: None,
                        predicate: None,
                    });
                }
                let (parameter, body) = self.build_lambda_argument(tree, id, method)?;
                if !body.is_boolean() && !body.is_field() {
                    return Err(SemanticError::BooleanLambda {
                        method: method.to_string(),
                        position,
                    });
                }
                Ok(Operation::Quantifier {
                    op: QuantifierOp::CountWhere,
                    field,
                    parameter: Some(parameter),
                    predicate: Some(Box::new(body)),
                })
            }

            "Contains" | "StartsWith" | "EndsWith" => {
                let op = match method {
                    "Contains" => StringOp::Contains,
                    "StartsWith" => StringOp::StartsWith,
                    _ => StringOp::EndsWith,
                };
                let operand = self.build_string_operand(tree, id, method)?;
                Ok(Operation::StringPredicate {
                    op,
                    field,
                    operand: Some(Box::new(operand)),
                })
            }

            "Matches" => {
                let operand = self.build_string_operand(tree, id, method)?;
                let Operation::Literal(Literal::String(pattern)) = &operand else {
                    return Err(SemanticError::StringOperand {
                        method: method.to_string(),
                        position,
                    });
                };
                if regex::Regex::new(pattern).is_err() {
                    return Err(SemanticError::InvalidPattern {
                        pattern: pattern.clone(),
                        position,
                    });
                }
                Ok(Operation::StringPredicate {
                    op: StringOp::Matches,
                    field,
                    operand: Some(Box::new(operand)),
                })
            }

            "Length" => {
                if !tree.children(id).is_empty() {
                    return Err(SemanticError::OperandCount {
                        operator: "Length".to_string(),
                        expected: "no operand",
                        position,
                    });
                }
                Ok(Operation::StringPredicate {
                    op: StringOp::Length,
                    field,
                    operand: None,
                })
            }

            _ => Err(SemanticError::UnknownMethod {
                method: method.to_string(),
                field: field.dotted(),
                position,
            }),
        }
    }

    /// Shape-check a call's `param => body` argument, register the
    /// parameter and build the body.
    ///
    /// The parameter stays in scope after the body is built; the scope
    /// table is append-only for the lifetime of one compilation.
    fn build_lambda_argument(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        method: &str,
    ) -> Result<(String, Operation), SemanticError> {
        let position = tree.node(id).position();
        let children = tree.children(id);

        let lambda = if children.len() == 2 {
            let param = tree.node(children[0]);
            let arrow = tree.node(children[1]);
            match (&param.token.kind, &arrow.token.kind) {
                (TokenKind::Symbol(name), TokenKind::Arrow) if param.children.is_empty() => {
                    Some((name.clone(), children[1]))
                }
                _ => None,
            }
        } else {
            None
        };
        let Some((parameter, arrow)) = lambda else {
            return Err(SemanticError::LambdaRequired {
                method: method.to_string(),
                position,
            });
        };

        if !self.scope.bind_parameter(&parameter) {
            return Err(SemanticError::ParameterAlreadyUsed {
                name: parameter,
                position,
            });
        }

        let body = self.build_lambda_body(tree, arrow)?;
        Ok((parameter, body))
    }

    fn build_string_operand(
        &mut self,
        tree: &SyntaxTree,
        id: NodeId,
        method: &str,
    ) -> Result<Operation, SemanticError> {
        let position = tree.node(id).position();
        let children = tree.children(id);
        if children.len() != 1 {
            return Err(SemanticError::OperandCount {
                operator: method.to_string(),
                expected: "exactly one operand",
                position,
            });
        }

        let operand = self.build_operation(tree, children[0])?;
        if !operand.is_string() && !operand.is_field() {
            return Err(SemanticError::StringOperand {
                method: method.to_string(),
                position,
            });
        }
        Ok(operand)
    }

    /// Resolve a dotted path against the scope.
    fn resolve_path(&self, path: &str, position: usize) -> Result<FieldPath, SemanticError> {
        let mut parts = path.split('.');
        let root = parts.next().unwrap_or_default();
        if root.is_empty() {
            return Err(SemanticError::MissingPrecedingVariable { position });
        }

        let mut segments = Vec::new();
        for part in parts {
            if part.is_empty() {
                return Err(SemanticError::MalformedPath {
                    path: path.to_string(),
                    position,
                });
            }
            segments.push(part.to_string());
        }

        let Some(binding) = self.scope.lookup(root) else {
            return Err(SemanticError::VariableNotFound {
                name: root.to_string(),
                position,
            });
        };
        Ok(FieldPath::new(root.to_string(), segments, binding))
    }
}
