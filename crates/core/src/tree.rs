//! Huffman tree construction.
//!
//! Nodes live in an arena (`Vec<HuffmanNode>`) and refer to their children by
//! [`NodeId`]. Every internal node owns exactly two children and no node is
//! shared, so the arena is a plain tree.
//!
//! # Tie-break rule
//!
//! The working set is a min-heap keyed by `(weight, sequence)`. Leaves are
//! created first, in ascending byte order, and internal nodes follow in
//! creation order; a node's sequence number is its arena index. Among nodes of
//! equal weight the one with the lower sequence number is selected first, and
//! the first node popped becomes the left child. The same frequency table
//! therefore always yields the same tree.
//!
//! # Single distinct byte
//!
//! A tree with one leaf would give that leaf an empty code. Instead the leaf is
//! paired with a weight-0 [`NodeKind::Phantom`] sibling under a synthesized
//! root: the real byte gets the one-bit code `0` and the phantom gets no code.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// Handle of a node inside a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A real symbol
    Leaf(u8),
    /// Internal node owning exactly two children
    Internal { left: NodeId, right: NodeId },
    /// Placeholder sibling used only when the input has one distinct byte
    Phantom,
}

/// A tree node and the total frequency of the leaves beneath it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HuffmanNode {
    pub weight: u64,
    pub kind: NodeKind,
}

/// Arena-backed Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for a non-empty frequency table.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyFrequencyTable` if no byte occurs.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        if freqs.is_empty() {
            return Err(HuffmanError::EmptyFrequencyTable.into());
        }

        let mut nodes: Vec<HuffmanNode> = freqs
            .iter()
            .map(|(byte, count)| HuffmanNode {
                weight: count,
                kind: NodeKind::Leaf(byte),
            })
            .collect();
        nodes.reserve(nodes.len());

        if nodes.len() == 1 {
            let weight = nodes[0].weight;
            nodes.push(HuffmanNode {
                weight: 0,
                kind: NodeKind::Phantom,
            });
            nodes.push(HuffmanNode {
                weight,
                kind: NodeKind::Internal {
                    left: NodeId(0),
                    right: NodeId(1),
                },
            });
            return Ok(Self {
                nodes,
                root: NodeId(2),
            });
        }

        let mut heap: BinaryHeap<Reverse<(u64, usize)>> = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| Reverse((node.weight, index)))
            .collect();

        while let Some(Reverse((left_weight, left))) = heap.pop() {
            let Some(Reverse((right_weight, right))) = heap.pop() else {
                return Ok(Self {
                    nodes,
                    root: NodeId(left),
                });
            };

            let index = nodes.len();
            let weight = left_weight + right_weight;
            nodes.push(HuffmanNode {
                weight,
                kind: NodeKind::Internal {
                    left: NodeId(left),
                    right: NodeId(right),
                },
            });
            heap.push(Reverse((weight, index)));
        }

        Err(HuffmanError::EmptyFrequencyTable.into())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &HuffmanNode {
        &self.nodes[id.0]
    }

    /// Total weight of the tree (the length of the input it was built from).
    pub fn weight(&self) -> u64 {
        self.node(self.root).weight
    }

    /// Number of real (non-phantom) leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf(_)))
            .count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Internal { .. }))
            .count()
    }

    /// Total number of nodes in the arena, phantom included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(data: &[u8]) -> HuffmanTree {
        HuffmanTree::build(&FrequencyTable::from_bytes(data)).unwrap()
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = HuffmanTree::build(&FrequencyTable::from_bytes(&[]));
        assert!(matches!(
            result,
            Err(crate::error::Error::Huffman(HuffmanError::EmptyFrequencyTable))
        ));
    }

    #[test]
    fn test_leaf_and_internal_counts() {
        let tree = tree_for(b"hello world");
        let distinct = FrequencyTable::from_bytes(b"hello world").len();
        assert_eq!(tree.leaf_count(), distinct);
        assert_eq!(tree.internal_count(), distinct - 1);
        assert_eq!(tree.weight(), 11);
    }

    #[test]
    fn test_internal_weight_is_sum_of_children() {
        let tree = tree_for(b"mississippi river");
        for index in 0..tree.len() {
            let node = tree.node(NodeId(index));
            if let NodeKind::Internal { left, right } = node.kind {
                assert_eq!(node.weight, tree.node(left).weight + tree.node(right).weight);
            }
        }
    }

    #[test]
    fn test_single_symbol_gets_phantom_sibling() {
        let tree = tree_for(&[7; 10]);
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_count(), 1);
        assert_eq!(tree.weight(), 10);

        let root = tree.node(tree.root());
        match root.kind {
            NodeKind::Internal { left, right } => {
                assert_eq!(tree.node(left).kind, NodeKind::Leaf(7));
                assert_eq!(tree.node(right).kind, NodeKind::Phantom);
                assert_eq!(tree.node(right).weight, 0);
            }
            other => panic!("expected internal root, got {:?}", other),
        }
    }

    #[test]
    fn test_ties_broken_by_byte_value() {
        // Equal weights: 'a' (lowest byte) is popped first and becomes the left child.
        let tree = tree_for(b"ba");
        match tree.node(tree.root()).kind {
            NodeKind::Internal { left, right } => {
                assert_eq!(tree.node(left).kind, NodeKind::Leaf(b'a'));
                assert_eq!(tree.node(right).kind, NodeKind::Leaf(b'b'));
            }
            other => panic!("expected internal root, got {:?}", other),
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let data = b"the quick brown fox jumps over the lazy dog";
        assert_eq!(tree_for(data), tree_for(data));
    }
}
