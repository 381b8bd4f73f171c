//! Byte to bit-code mapping derived from a Huffman tree

use crate::tree::{HuffmanTree, ROOT};
use std::collections::BTreeMap;

/// Root-to-leaf path; `false` is a left turn, `true` a right turn.
pub type Code = Vec<bool>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Code>,
}

impl CodeTable {
    /// Depth-first walk of `tree`, left before right. A tree that is a
    /// single leaf yields one empty code.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack: Vec<(usize, Code)> = vec![(ROOT, Vec::new())];

        while let Some((id, path)) = stack.pop() {
            let node = tree.node(id);
            if node.is_leaf() {
                if let Some(symbol) = node.symbol {
                    codes.insert(symbol, path);
                }
                continue;
            }
            // Right is pushed first so the left subtree is visited first.
            if let Some(right) = node.right {
                let mut p = path.clone();
                p.push(true);
                stack.push((right, p));
            }
            if let Some(left) = node.left {
                let mut p = path;
                p.push(false);
                stack.push((left, p));
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: u8) -> Option<&[bool]> {
        self.codes.get(&symbol).map(Vec::as_slice)
    }

    /// Entries in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[bool])> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Dense lookup indexed by byte value, for the encode hot loop.
    pub(crate) fn to_lookup(&self) -> Vec<Option<&[bool]>> {
        let mut lookup = vec![None; 256];
        for (symbol, code) in self.iter() {
            lookup[symbol as usize] = Some(code);
        }
        lookup
    }
}
