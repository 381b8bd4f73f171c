//! Huffman tree construction and reconstruction
//!
//! Nodes live in an arena and refer to each other by index. The root is
//! always index 0.

use crate::error::CodecError;
use crate::frequency::ByteFrequencyMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

pub type NodeId = usize;

pub const ROOT: NodeId = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub symbol: Option<u8>,
    /// Sum of descendant leaf counts; zero in trees rebuilt from a config.
    pub weight: u64,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl Node {
    fn leaf(symbol: u8, weight: u64) -> Self {
        Self {
            symbol: Some(symbol),
            weight,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// The first node extracted becomes the left child. Equal weights are
    /// extracted in insertion order: leaves in ascending byte order, then
    /// merged nodes in the order they were created. Returns `None` for an
    /// empty frequency map.
    pub fn build(freq: &ByteFrequencyMap) -> Option<Self> {
        if freq.is_empty() {
            return None;
        }
        if freq.len() == 1 {
            let (symbol, weight) = freq.iter().next()?;
            return Some(Self {
                nodes: vec![Node::leaf(symbol, weight)],
            });
        }

        // Slot 0 is reserved for the final merge. Ids grow with insertion
        // order, so they double as the tie-break.
        let mut nodes = vec![Node::default()];
        let mut heap = BinaryHeap::with_capacity(freq.len());
        for (symbol, weight) in freq.iter() {
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::leaf(symbol, weight));
        }

        while heap.len() > 1 {
            let pair = (heap.pop(), heap.pop());
            let (Some(Reverse((lw, left))), Some(Reverse((rw, right)))) = pair else {
                unreachable!("loop condition guarantees two nodes");
            };
            let merged = Node {
                symbol: None,
                weight: lw + rw,
                left: Some(left),
                right: Some(right),
            };
            if heap.is_empty() {
                nodes[ROOT] = merged;
                break;
            }
            heap.push(Reverse((merged.weight, nodes.len())));
            nodes.push(merged);
        }

        tracing::debug!(symbols = freq.len(), nodes = nodes.len(), "built huffman tree");
        Some(Self { nodes })
    }

    /// A bare root with no symbol and no children, ready for
    /// [`insert_code`](Self::insert_code).
    pub fn unassigned() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Walks `code` from the root, creating nodes as needed, and marks the
    /// end of the walk as the leaf for `symbol`. An empty code assigns the
    /// root itself.
    pub fn insert_code(&mut self, symbol: u8, code: &[bool]) -> Result<(), CodecError> {
        let mut id = ROOT;
        for &bit in code {
            if let Some(existing) = self.nodes[id].symbol {
                return Err(CodecError::MalformedConfig(format!(
                    "code for {symbol:#04x} extends the code for {existing:#04x}"
                )));
            }
            id = match self.child(id, bit) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    let node = &mut self.nodes[id];
                    if bit {
                        node.right = Some(next);
                    } else {
                        node.left = Some(next);
                    }
                    next
                }
            };
        }

        let node = &mut self.nodes[id];
        if let Some(existing) = node.symbol {
            return Err(CodecError::MalformedConfig(format!(
                "code for {symbol:#04x} collides with the code for {existing:#04x}"
            )));
        }
        if !node.is_leaf() {
            return Err(CodecError::MalformedConfig(format!(
                "code for {symbol:#04x} is a prefix of another code"
            )));
        }
        node.symbol = Some(symbol);
        Ok(())
    }

    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Right child for a 1 bit, left child for a 0 bit.
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        let node = &self.nodes[id];
        if bit {
            node.right
        } else {
            node.left
        }
    }

    /// The symbol of a tree that is just one leaf.
    pub fn single_symbol(&self) -> Option<u8> {
        let root = self.root();
        if root.is_leaf() {
            root.symbol
        } else {
            None
        }
    }

    /// Leaves plus internal nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[cfg(test)]
    pub(crate) fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf() && n.symbol.is_some())
            .count()
    }
}
