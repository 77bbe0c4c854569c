use crate::ast::operators::PREC_OPERAND;
use crate::ast::{classify, Arity, NodeId, SyntaxNode, SyntaxTree, Token, TokenKind};

/// Structural error with the character offset it was detected at.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Expression with no tokens at all
    EmptyExpression,

    /// Binary or variadic operator with nothing to its left
    MissingOperand { operator: String, position: usize },

    /// Grouping or call parenthesis never closed. Reported at the opener.
    UnmatchedOpen { position: usize },

    /// Closing parenthesis with no matching opener
    UnmatchedClose { position: usize },

    /// Arrow outside a lambda position
    MisplacedArrow { position: usize },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::EmptyExpression => write!(f, "empty expression at pos 0"),
            ParseError::MissingOperand { operator, position } => {
                write!(f, "missing operand for '{}' at pos {}", operator, position)
            }
            ParseError::UnmatchedOpen { position } => {
                write!(f, "unmatched opening parenthesis at pos {}", position)
            }
            ParseError::UnmatchedClose { position } => {
                write!(f, "unmatched closing parenthesis at pos {}", position)
            }
            ParseError::MisplacedArrow { position } => {
                write!(
                    f,
                    "'=>' must follow a lambda parameter at pos {}",
                    position
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Precedence-driven tree builder.
///
/// Processes the token sequence strictly left to right over an explicit
/// stack of open nodes; never backtracks. The stack always holds the
/// right-most spine of the tree under construction, bottom entry first,
/// and collapses to the root at end of input.
pub struct Parser {
    tokens: Vec<Token>,
    nodes: Vec<SyntaxNode>,
    stack: Vec<NodeId>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            nodes: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Build the untyped syntax tree.
    pub fn parse(mut self) -> Result<SyntaxTree, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::EmptyExpression);
        }

        let tokens = std::mem::take(&mut self.tokens);
        for token in tokens {
            match &token.kind {
                TokenKind::RParen => self.close_group(token)?,
                TokenKind::Arrow => self.push_arrow(token)?,
                // Unary tokens that expect a following operand stay on the
                // stack so subsequent tokens become their children.
                TokenKind::Function(_) | TokenKind::LParen | TokenKind::Not => {
                    self.push_opener(token)
                }
                _ => match classify(&token.kind).arity {
                    Arity::Unary => self.push_operand(token),
                    Arity::Binary | Arity::Variadic => self.insert_operator(token)?,
                },
            }
        }

        self.finish()
    }

    fn add_node(&mut self, token: Token) -> NodeId {
        let info = classify(&token.kind);
        let id = self.nodes.len();
        self.nodes
            .push(SyntaxNode::new(token, info.arity, info.precedence));
        id
    }

    /// Self-contained operand: becomes the sole stack entry when the stack
    /// is empty, otherwise the last child of the current stack top.
    fn push_operand(&mut self, token: Token) {
        let id = self.add_node(token);
        match self.stack.last() {
            Some(&top) => self.nodes[top].children.push(id),
            None => self.stack.push(id),
        }
    }

    /// Operand-expecting unary: linked like an operand and additionally
    /// pushed, so the following tokens land inside it.
    fn push_opener(&mut self, token: Token) {
        let id = self.add_node(token);
        if let Some(&top) = self.stack.last() {
            self.nodes[top].children.push(id);
        }
        self.stack.push(id);
    }

    /// Insert a binary or variadic operator by precedence climbing.
    ///
    /// Pops stack entries the new operator binds looser than, then either
    /// joins an already-open `&&`/`||` of the same kind, rehomes the
    /// candidate's last operand under the new node, or, when the stack ran
    /// out, adopts the old root and takes its place.
    fn insert_operator(&mut self, token: Token) -> Result<(), ParseError> {
        if self.stack.is_empty() {
            return Err(ParseError::MissingOperand {
                operator: token.describe(),
                position: token.position,
            });
        }

        let info = classify(&token.kind);
        let mut last_popped = None;
        while let Some(&top) = self.stack.last() {
            if info.precedence > self.nodes[top].precedence {
                last_popped = self.stack.pop();
            } else {
                break;
            }
        }

        match self.stack.last().copied() {
            Some(top) => {
                if info.arity == Arity::Variadic && self.nodes[top].token.kind == token.kind {
                    // The open variadic node simply accepts more operands;
                    // no new node is created.
                    return Ok(());
                }
                let Some(operand) = self.nodes[top].children.pop() else {
                    return Err(ParseError::MissingOperand {
                        operator: token.describe(),
                        position: token.position,
                    });
                };
                let id = self.add_node(token);
                self.nodes[id].children.push(operand);
                self.nodes[top].children.push(id);
                self.stack.push(id);
            }
            None => {
                // The whole tree bound tighter: the old root becomes the
                // new node's first operand.
                let root = last_popped.expect("popping emptied a non-empty stack");
                let id = self.add_node(token);
                self.nodes[id].children.push(root);
                self.stack.push(id);
            }
        }
        Ok(())
    }

    /// Close the innermost open call or group.
    ///
    /// Entries passed over while searching are already linked into the
    /// tree and are simply discarded. A call is finalized here: its
    /// optimistic variadic arity becomes a definite single-operand one.
    /// Closed nodes also stop being precedence floors; they bind like any
    /// other completed operand so later operators can adopt them.
    fn close_group(&mut self, token: Token) -> Result<(), ParseError> {
        while let Some(id) = self.stack.pop() {
            let node = &mut self.nodes[id];
            match node.token.kind {
                TokenKind::Function(_) if !node.closed => {
                    node.closed = true;
                    node.arity = Arity::Unary;
                    node.precedence = PREC_OPERAND;
                    self.stack.push(id);
                    return Ok(());
                }
                TokenKind::LParen if !node.closed => {
                    node.closed = true;
                    node.precedence = PREC_OPERAND;
                    self.stack.push(id);
                    return Ok(());
                }
                _ => {}
            }
        }
        Err(ParseError::UnmatchedClose {
            position: token.position,
        })
    }

    /// Attach an arrow under the lambda it declares.
    ///
    /// Valid only on a call node holding exactly its parameter symbol, or
    /// on a bare root symbol being declared as a named lambda.
    fn push_arrow(&mut self, token: Token) -> Result<(), ParseError> {
        let Some(&top) = self.stack.last() else {
            return Err(ParseError::MisplacedArrow {
                position: token.position,
            });
        };

        let node = &self.nodes[top];
        let valid = match &node.token.kind {
            TokenKind::Function(_) => {
                node.children.len() == 1 && self.is_plain_symbol(node.children[0])
            }
            TokenKind::Symbol(_) => node.children.is_empty(),
            _ => false,
        };
        if !valid {
            return Err(ParseError::MisplacedArrow {
                position: token.position,
            });
        }

        let id = self.add_node(token);
        self.nodes[top].children.push(id);
        self.stack.push(id);
        Ok(())
    }

    fn is_plain_symbol(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        matches!(node.token.kind, TokenKind::Symbol(_)) && node.children.is_empty()
    }

    /// Check for unclosed parentheses and collapse the stack to the root.
    fn finish(self) -> Result<SyntaxTree, ParseError> {
        for &id in &self.stack {
            let node = &self.nodes[id];
            match node.token.kind {
                TokenKind::LParen | TokenKind::Function(_) if !node.closed => {
                    return Err(ParseError::UnmatchedOpen {
                        position: node.position(),
                    });
                }
                _ => {}
            }
        }

        let root = *self
            .stack
            .first()
            .expect("stack cannot be empty after a non-empty token sequence");
        Ok(SyntaxTree::new(self.nodes, root))
    }
}
