use std::fmt::Display;

/// Index of a node inside the forest's arena. Stable for the lifetime of
/// the compilation.
pub type NodeId = usize;

/// The role a node plays in a statement tree.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum NodeKind {
    LValue,
    RValue,
    Temporary,
    Operator,
    Read,
    Write,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A binary syntax node. The text payload is an identifier, a literal, an
/// operator symbol, or (for Read/Write leaves) a raw comma-joined variable
/// list. The parent link is a back reference only; ownership lives in the
/// arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub text: String,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

/// The syntax forest: one root per executable statement, in program order,
/// with every node held in a flat arena.
#[derive(Debug, Default)]
pub struct SyntaxForest {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SyntaxForest {
    pub fn new() -> Self {
        SyntaxForest::default()
    }

    pub fn alloc(&mut self, kind: NodeKind, text: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            text: text.into(),
            parent: None,
            left: None,
            right: None,
        });
        id
    }

    pub fn push_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn last_root(&self) -> Option<NodeId> {
        self.roots.last().copied()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// Links `child` as the left child of `parent`, updating the back
    /// reference.
    pub fn set_left(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].left = Some(child);
        self.nodes[child].parent = Some(parent);
    }

    /// Links `child` as the right child of `parent`, updating the back
    /// reference.
    pub fn set_right(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].right = Some(child);
        self.nodes[child].parent = Some(parent);
    }

    /// True when the node has both children populated.
    pub fn is_saturated(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        node.left.is_some() && node.right.is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
