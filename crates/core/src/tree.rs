//! Huffman code tree construction and code assignment.
//!
//! # Tie-break
//!
//! Construction is deterministic across runs and implementations:
//! - each leaf gets a sequence number equal to its rank among the present
//!   symbols in ascending byte order
//! - each new internal node gets the next unused sequence number
//! - the queue yields the lowest weight first, and the lowest sequence number
//!   among equal weights
//! - the first node taken becomes the left child (code bit 0), the second the
//!   right child (code bit 1)
//!
//! A single distinct symbol produces a tree that is one leaf with an empty
//! code.

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

/// Longest code a [`Code`] can hold.
pub const MAX_CODE_LEN: usize = 64;

/// A node of the code tree. Traversal is root-down only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        symbol: u8,
    },
    /// Weight is the sum of the subtree's leaf counts; trees read back from a
    /// stream carry weight 0 because weights are not serialized.
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    /// The leaf's symbol, or `None` for an internal node.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Follow one code bit: `false` goes left, `true` goes right.
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { &**right } else { &**left }),
        }
    }

    /// Structural equality that ignores internal weights.
    pub fn same_shape(&self, other: &Node) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            match (a, b) {
                (Node::Leaf { symbol: x }, Node::Leaf { symbol: y }) if x == y => {}
                (
                    Node::Internal { left: al, right: ar, .. },
                    Node::Internal { left: bl, right: br, .. },
                ) => {
                    stack.push((&**al, &**bl));
                    stack.push((&**ar, &**br));
                }
                _ => return false,
            }
        }
        true
    }
}

/// Queue entry during construction.
struct Pending {
    weight: u64,
    seq: u32,
    node: Node,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap, we want lightest and oldest first
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A complete code tree: every internal node has two children and every
/// symbol appears in at most one leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    root: Node,
    leaves: usize,
}

impl CodeTree {
    /// Build the minimum weighted path length tree for the present symbols.
    ///
    /// # Errors
    /// `HuffmanError::EmptyAlphabet` if no symbol has a non-zero count.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        let mut heap: BinaryHeap<Pending> = freqs
            .symbols()
            .enumerate()
            .map(|(seq, (symbol, weight))| Pending {
                weight,
                seq: seq as u32,
                node: Node::Leaf { symbol },
            })
            .collect();
        let leaves = heap.len();
        let mut next_seq = leaves as u32;

        let root = loop {
            let first = heap.pop().ok_or(HuffmanError::EmptyAlphabet)?;
            let Some(second) = heap.pop() else {
                break first.node;
            };

            let weight = first.weight + second.weight;
            heap.push(Pending {
                weight,
                seq: next_seq,
                node: Node::Internal {
                    weight,
                    left: Box::new(first.node),
                    right: Box::new(second.node),
                },
            });
            next_seq += 1;
        };

        log::debug!(
            "built code tree: {} leaves, {} total weight",
            leaves,
            freqs.total()
        );

        Ok(Self { root, leaves })
    }

    /// Wrap a root produced elsewhere (the stream reader).
    pub(crate) fn from_root(root: Node, leaves: usize) -> Self {
        Self { root, leaves }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// A full binary tree with n leaves has n - 1 internal nodes.
    pub fn internal_count(&self) -> usize {
        self.leaves - 1
    }

    /// True when the tree is a single leaf (one distinct symbol).
    pub fn is_degenerate(&self) -> bool {
        matches!(self.root, Node::Leaf { .. })
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                Node::Leaf { .. } => deepest = deepest.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((&**left, depth + 1));
                    stack.push((&**right, depth + 1));
                }
            }
        }
        deepest
    }

    /// Derive every leaf's root-to-leaf path.
    ///
    /// # Errors
    /// `HuffmanError::CodeTooLong` if a path exceeds [`MAX_CODE_LEN`].
    pub fn code_map(&self) -> Result<CodeMap> {
        let mut map = CodeMap::empty();
        let mut stack = vec![(&self.root, 0u64, 0usize)];

        while let Some((node, bits, len)) = stack.pop() {
            match node {
                Node::Leaf { symbol } => {
                    if len > MAX_CODE_LEN {
                        return Err(HuffmanError::CodeTooLong {
                            symbol: *symbol,
                            length: len,
                            max: MAX_CODE_LEN,
                        }
                        .into());
                    }
                    map.codes[*symbol as usize] = Some(Code {
                        bits,
                        len: len as u8,
                    });
                }
                Node::Internal { left, right, .. } => {
                    stack.push((&**right, (bits << 1) | 1, len + 1));
                    stack.push((&**left, bits << 1, len + 1));
                }
            }
        }

        Ok(map)
    }
}

/// A root-to-leaf path: `len` bits stored in the low end of `bits`, first
/// decision highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    bits: u64,
    len: u8,
}

impl Code {
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && (self.is_empty() || other.bits >> (other.len - self.len) == self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            f.write_str(if self.bits >> i & 1 == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code lookup, one slot per byte value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMap {
    codes: [Option<Code>; 256],
}

impl CodeMap {
    fn empty() -> Self {
        Self { codes: [None; 256] }
    }

    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Present symbols and their codes, ascending by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.map(|c| (symbol as u8, c)))
    }

    /// Longest code length in the map.
    pub fn max_len(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Total payload bits for data with the given frequencies.
    pub fn payload_bits(&self, freqs: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| freqs.count(symbol) * code.len() as u64)
            .sum()
    }
}
