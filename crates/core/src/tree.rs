//! Huffman tree model and construction.
//!
//! Nodes live in an arena owned by [`HuffmanTree`] and refer to each other by
//! [`NodeId`]. A tree is immutable once built: the builder, the record
//! deserializer and nothing else create nodes.
//!
//! # Selection order
//!
//! Construction repeatedly merges the two lowest-ranked nodes. The rank is a
//! total order, so every build from the same frequency table yields the same
//! tree:
//!
//! 1. lower weight first
//! 2. at equal weight, a leaf before an inner node
//! 3. two leaves: smaller symbol first
//! 4. two inner nodes: lower creation id (created earlier) first
//!
//! The first node selected becomes the left child, the second the right.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::frequency::FrequencyTable;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u16);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A tree element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Inner {
        weight: u64,
        left: NodeId,
        right: NodeId,
        /// Order of creation among inner nodes; only used for tie-breaking
        creation_id: u32,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match *self {
            Node::Leaf { weight, .. } | Node::Inner { weight, .. } => weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// This node's position in the merge selection order.
    pub fn selection_key(&self) -> SelectionKey {
        match *self {
            Node::Leaf { symbol, weight } => SelectionKey {
                weight,
                rank: Rank::Leaf(symbol),
            },
            Node::Inner {
                weight,
                creation_id,
                ..
            } => SelectionKey {
                weight,
                rank: Rank::Inner(creation_id),
            },
        }
    }
}

/// Tie-break rank among nodes of equal weight.
///
/// Variant order matters: the derived `Ord` puts every `Leaf` before every
/// `Inner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    Leaf(u8),
    Inner(u32),
}

/// Total order used to pick nodes for merging; smaller is selected first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SelectionKey {
    pub weight: u64,
    pub rank: Rank,
}

/// Append-only node store used while a tree is being assembled.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
    next_creation_id: u32,
}

impl Arena {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        // 256 leaves + 255 inner nodes always fit in u16
        let id = NodeId(self.nodes.len() as u16);
        self.nodes.push(node);
        id
    }

    pub(crate) fn leaf(&mut self, symbol: u8, weight: u64) -> NodeId {
        self.push(Node::Leaf { symbol, weight })
    }

    pub(crate) fn inner(&mut self, weight: u64, left: NodeId, right: NodeId) -> NodeId {
        let creation_id = self.next_creation_id;
        self.next_creation_id += 1;
        self.push(Node::Inner {
            weight,
            left,
            right,
            creation_id,
        })
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn finish(self, root: NodeId) -> HuffmanTree {
        HuffmanTree {
            nodes: self.nodes,
            root,
        }
    }
}

/// A built Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for a frequency table.
    ///
    /// Returns `None` when every count is zero. A table with one present
    /// symbol yields a tree whose root is that symbol's leaf.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let mut arena = Arena::new();
        let mut pool: BinaryHeap<Reverse<(SelectionKey, NodeId)>> = BinaryHeap::new();

        for (symbol, count) in frequencies.present() {
            let id = arena.leaf(symbol, count);
            pool.push(Reverse((arena.get(id).selection_key(), id)));
        }

        while pool.len() > 1 {
            let (Some(Reverse((_, left))), Some(Reverse((_, right)))) = (pool.pop(), pool.pop())
            else {
                break;
            };
            let weight = arena.get(left).weight() + arena.get(right).weight();
            let id = arena.inner(weight, left, right);
            pool.push(Reverse((arena.get(id).selection_key(), id)));
        }

        let Reverse((_, root)) = pool.pop()?;
        let tree = arena.finish(root);

        tracing::debug!(
            leaves = tree.leaf_count(),
            nodes = tree.len(),
            root_weight = tree.weight(),
            "built huffman tree"
        );
        Some(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Root weight: the total number of symbols the tree encodes.
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight()
    }

    /// Number of nodes (leaves and inner).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false for a built tree; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// True for the one-symbol tree whose root is a leaf.
    pub fn is_single_leaf(&self) -> bool {
        self.node(self.root).is_leaf()
    }

    /// Follow one codeword bit from an inner node: `false` goes left.
    ///
    /// Returns `None` when `id` is a leaf.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match *self.node(id) {
            Node::Leaf { .. } => None,
            Node::Inner { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    /// Node ids in pre-order (node, left subtree, right subtree).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            order.push(id);
            if let Node::Inner { left, right, .. } = *self.node(id) {
                stack.push(right);
                stack.push(left);
            }
        }

        order
    }
}
