use crate::ast::{Arity, Token};

/// Index of a node inside its [`SyntaxTree`] arena.
pub type NodeId = usize;

/// Untyped syntax tree node.
///
/// Built by the parser and consumed by the semantic builder. Children are
/// ordered and each node has exactly one parent; the arena representation
/// lets the parser's stack refer to nodes that are already linked into the
/// tree without shared mutation.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Originating token
    pub token: Token,
    /// Arity copied from the classification table. A function call starts
    /// Variadic and is downgraded to Unary when its closing parenthesis is
    /// seen.
    pub arity: Arity,
    /// Precedence copied from the classification table
    pub precedence: u8,
    /// Ordered child node ids
    pub children: Vec<NodeId>,
    /// Set on grouping and call nodes once their `)` has been consumed.
    /// Used to detect unmatched opening parentheses.
    pub closed: bool,
}

impl SyntaxNode {
    pub fn new(token: Token, arity: Arity, precedence: u8) -> Self {
        SyntaxNode {
            token,
            arity,
            precedence,
            children: Vec::new(),
            closed: false,
        }
    }

    pub fn position(&self) -> usize {
        self.token.position
    }
}

/// Arena-backed syntax tree produced by the parser.
///
/// The tree is an intermediate artifact: the semantic builder walks it once
/// and the whole arena is dropped afterwards.
#[derive(Debug)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: NodeId,
}

impl SyntaxTree {
    pub fn new(nodes: Vec<SyntaxNode>, root: NodeId) -> Self {
        SyntaxTree { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
