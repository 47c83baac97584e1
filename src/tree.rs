use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::Symbol;
use crate::frequency::FrequencyTable;

/// A node of the Huffman tree. Children are indices into the tree's arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode<S> {
    Leaf {
        symbol: S,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: usize,
        right: usize,
    },
}

impl<S> HuffmanNode<S> {
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }
}

/// Huffman tree stored as a flat node arena.
///
/// Leaves occupy the first slots in ascending symbol order and merged nodes
/// are appended after them, so a node's index doubles as its insertion
/// sequence number.
#[derive(Debug, Clone)]
pub struct HuffmanTree<S> {
    nodes: Vec<HuffmanNode<S>>,
    root: usize,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// The heap orders on `(weight, index)`: equal weights pop in insertion
    /// order. The first node popped becomes the left child. A frequency table
    /// always holds at least one entry, so there is always a root.
    pub fn build(freqs: &FrequencyTable<S>) -> Self {
        let mut nodes: Vec<HuffmanNode<S>> = Vec::with_capacity(freqs.len() * 2);
        let mut heap = BinaryHeap::with_capacity(freqs.len());

        for (symbol, weight) in freqs.iter() {
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(HuffmanNode::Leaf { symbol, weight });
        }

        let mut root = 0;
        while let Some(Reverse((left_weight, left))) = heap.pop() {
            let Some(Reverse((right_weight, right))) = heap.pop() else {
                root = left;
                break;
            };
            let weight = left_weight + right_weight;
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(HuffmanNode::Internal {
                weight,
                left,
                right,
            });
        }

        debug!(
            leaves = freqs.len(),
            nodes = nodes.len(),
            "huffman tree built"
        );
        HuffmanTree { nodes, root }
    }
}

impl<S> HuffmanTree<S> {
    pub fn root(&self) -> usize {
        self.root
    }

    /// Node at `index`, or `None` past the end of the arena.
    pub fn node(&self, index: usize) -> Option<&HuffmanNode<S>> {
        self.nodes.get(index)
    }

    // Indices handed out by the tree itself are always in range.
    pub(crate) fn at(&self, index: usize) -> &HuffmanNode<S> {
        &self.nodes[index]
    }

    /// Total weight, equal to the length of the analyzed input.
    pub fn weight(&self) -> u64 {
        self.at(self.root).weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_for(text: &str) -> HuffmanTree<char> {
        HuffmanTree::build(&FrequencyTable::from_text(text).unwrap())
    }

    #[test]
    fn test_single_symbol_is_leaf_root() {
        let tree = tree_for("aaaa");
        assert_eq!(tree.node_count(), 1);
        assert_eq!(
            tree.at(tree.root()),
            &HuffmanNode::Leaf {
                symbol: 'a',
                weight: 4
            }
        );
    }

    #[test]
    fn test_node_counts() {
        let tree = tree_for("aaaabbbccd");
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.node_count(), 7);
        assert_eq!(tree.weight(), 10);
    }

    #[test]
    fn test_internal_weight_is_sum_of_children() {
        let tree = tree_for("the quick brown fox jumps over the lazy dog");
        for index in 0..tree.node_count() {
            if let HuffmanNode::Internal {
                weight,
                left,
                right,
            } = tree.at(index)
            {
                assert_eq!(
                    *weight,
                    tree.at(*left).weight() + tree.at(*right).weight()
                );
                assert!(*left < index && *right < index);
            }
        }
    }

    #[test]
    fn test_tie_break_left_is_first_inserted() {
        // a and b tie at weight 2; a is inserted first and becomes the left child.
        let tree = tree_for("abab");
        match tree.at(tree.root()) {
            HuffmanNode::Internal { left, right, .. } => {
                assert_eq!(
                    tree.at(*left),
                    &HuffmanNode::Leaf {
                        symbol: 'a',
                        weight: 2
                    }
                );
                assert_eq!(
                    tree.at(*right),
                    &HuffmanNode::Leaf {
                        symbol: 'b',
                        weight: 2
                    }
                );
            }
            other => panic!("expected internal root, got {other:?}"),
        }
    }

    #[test]
    fn test_merged_node_loses_tie_to_leaf() {
        // c and d merge into weight 3, tying with b; b was inserted earlier so pops first.
        let tree = tree_for("aaaabbbccd");
        let HuffmanNode::Internal { left, right, .. } = tree.at(tree.root()) else {
            panic!("expected internal root");
        };
        assert_eq!(tree.at(*left).weight(), 4);
        let HuffmanNode::Internal { left: inner_left, .. } = tree.at(*right) else {
            panic!("expected internal right child");
        };
        assert_eq!(
            tree.at(*inner_left),
            &HuffmanNode::Leaf {
                symbol: 'b',
                weight: 3
            }
        );
    }

    #[test]
    fn test_node_out_of_range() {
        let tree = tree_for("abc");
        assert_eq!(tree.node_count(), 5);
        assert!(tree.node(tree.root()).is_some());
        assert!(tree.node(4).is_some());
        assert!(tree.node(5).is_none());
        assert!(tree.node(usize::MAX).is_none());
    }

    #[test]
    fn test_build_from_any_valid_table() {
        use std::collections::BTreeMap;

        let single = FrequencyTable::from_counts(BTreeMap::from([(7u8, 1u64)])).unwrap();
        let tree = HuffmanTree::build(&single);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.weight(), 1);

        let pair = FrequencyTable::from_counts(BTreeMap::from([(1u8, 5u64), (2, 9)])).unwrap();
        let tree = HuffmanTree::build(&pair);
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.weight(), 14);
    }
}
