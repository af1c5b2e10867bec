use std::{cmp::Ordering, collections::BinaryHeap};

use log::debug;

use crate::{
    error::{CodecError, Result},
    frequency::FrequencyTable,
    Symbol,
};

#[derive(Debug, PartialEq, Eq)]
pub enum TreeNode<S> {
    Leaf {
        symbol: S,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: Box<TreeNode<S>>,
        right: Box<TreeNode<S>>,
    },
}

impl<S> TreeNode<S> {
    pub fn weight(&self) -> usize {
        match self {
            TreeNode::Leaf { weight, .. } => *weight,
            TreeNode::Internal { weight, .. } => *weight,
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Queue entry. Equal weights are ordered by the sequence number the node
/// was pushed with, so the heap never sees two equal keys.
struct Pending<S> {
    weight: usize,
    seq: usize,
    node: TreeNode<S>,
}

impl<S> Ord for Pending<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: reversed to pop the lightest node first
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<S> PartialOrd for Pending<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> PartialEq for Pending<S> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl<S> Eq for Pending<S> {}

#[derive(Debug)]
pub struct HuffmanTree<S> {
    root: TreeNode<S>,
    merges: usize,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Merges the two lightest nodes until one remains. Leaves are queued in
    /// ascending symbol order and the first node popped becomes the left child.
    pub fn build(frequencies: &FrequencyTable<S>) -> Result<HuffmanTree<S>> {
        let mut heap: BinaryHeap<Pending<S>> = frequencies
            .iter()
            .enumerate()
            .map(|(seq, (symbol, weight))| Pending {
                weight,
                seq,
                node: TreeNode::Leaf { symbol, weight },
            })
            .collect();

        if heap.len() == 1 {
            debug!("single-symbol alphabet, no merges needed");
        }

        let mut seq = heap.len();
        let mut merges = 0;
        let root = loop {
            match (heap.pop(), heap.pop()) {
                (Some(left), Some(right)) => {
                    let weight = left.weight + right.weight;
                    heap.push(Pending {
                        weight,
                        seq,
                        node: TreeNode::Internal {
                            weight,
                            left: Box::new(left.node),
                            right: Box::new(right.node),
                        },
                    });
                    seq += 1;
                    merges += 1;
                }
                (Some(last), None) => break last.node,
                (None, _) => return Err(CodecError::EmptyInput),
            }
        };

        let tree = HuffmanTree { root, merges };
        debug!(
            "built tree over {} symbols: {} merges, depth {}",
            frequencies.distinct(),
            tree.merges,
            tree.depth()
        );
        Ok(tree)
    }
}

impl<S> HuffmanTree<S> {
    pub fn root(&self) -> &TreeNode<S> {
        &self.root
    }

    pub fn merges(&self) -> usize {
        self.merges
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}
