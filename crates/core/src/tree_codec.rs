//! Bit-level serialization of the code tree.
//!
//! # Grammar
//!
//! ```text
//! leaf     := 1 <symbol: 8 bits>
//! internal := <left> <right> 0
//! ```
//!
//! Children come before their parent, so a reader can rebuild the tree with a
//! stack: a `1` pushes a leaf, a `0` pops right then left and pushes their
//! parent. The container appends one extra `0` after the root; the reader
//! recognizes it as the separator because it arrives when the stack holds a
//! single node, and consumes it.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{MalformedError, Result};
use crate::tree::{CodeTree, Node};

/// Bits one leaf occupies in the encoding.
pub const LEAF_BITS: usize = 9;

/// Encoded size of a tree with `leaves` leaves, separator excluded.
pub fn encoded_len(leaves: usize) -> usize {
    leaves * LEAF_BITS + leaves.saturating_sub(1)
}

enum Visit<'a> {
    Enter(&'a Node),
    Combine,
}

/// Append the children-before-parent encoding of `tree` to `writer`.
///
/// Returns the number of bits written. The separator is not written.
pub fn write_tree(tree: &CodeTree, writer: &mut BitWriter) -> Result<usize> {
    let start = writer.bit_len();
    let mut stack = vec![Visit::Enter(tree.root())];

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(Node::Leaf { symbol }) => {
                writer.write_bit(true);
                writer.write_bits(*symbol as u64, 8)?;
            }
            Visit::Enter(Node::Internal { left, right, .. }) => {
                stack.push(Visit::Combine);
                stack.push(Visit::Enter(&**right));
                stack.push(Visit::Enter(&**left));
            }
            Visit::Combine => writer.write_bit(false),
        }
    }

    Ok(writer.bit_len() - start)
}

/// Rebuild a tree from `reader`, consuming everything up to and including
/// the separator bit.
///
/// # Errors
/// - `MalformedError::SeparatorBeforeTree` for a `0` on an empty stack
/// - `MalformedError::DuplicateSymbol` if a byte value appears twice
/// - `MalformedError::TruncatedTree` / `UnbalancedTree` if the data ends first
pub fn read_tree(reader: &mut BitReader<'_>) -> Result<CodeTree> {
    let mut stack: Vec<Node> = Vec::new();
    let mut seen = [false; 256];
    let mut leaves = 0usize;

    loop {
        let position = reader.position();
        let truncated = |pending: usize| {
            if pending > 1 {
                MalformedError::UnbalancedTree { pending }
            } else {
                MalformedError::TruncatedTree { position }
            }
        };

        let marker = reader.read_bit().map_err(|_| truncated(stack.len()))?;
        if marker {
            let symbol = reader.read_bits(8).map_err(|_| truncated(stack.len()))? as u8;
            if seen[symbol as usize] {
                return Err(MalformedError::DuplicateSymbol { symbol }.into());
            }
            seen[symbol as usize] = true;
            leaves += 1;
            stack.push(Node::Leaf { symbol });
            continue;
        }

        match stack.len() {
            0 => return Err(MalformedError::SeparatorBeforeTree { position }.into()),
            1 => break,
            _ => {
                if let (Some(right), Some(left)) = (stack.pop(), stack.pop()) {
                    stack.push(Node::Internal {
                        weight: 0,
                        left: Box::new(left),
                        right: Box::new(right),
                    });
                }
            }
        }
    }

    let root = stack
        .pop()
        .ok_or(MalformedError::UnbalancedTree { pending: 0 })?;
    log::trace!(
        "read code tree: {} leaves, separator at bit {}",
        leaves,
        reader.position() - 1
    );
    Ok(CodeTree::from_root(root, leaves))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::frequency::FrequencyTable;

    fn encode_with_separator(tree: &CodeTree) -> (Vec<u8>, usize) {
        let mut writer = BitWriter::new();
        let bits = write_tree(tree, &mut writer).unwrap();
        writer.write_bit(false);
        (writer.finish(), bits)
    }

    fn read_err(bytes: &[u8]) -> Error {
        read_tree(&mut BitReader::new(bytes)).unwrap_err()
    }

    #[test]
    fn test_ababa_layout() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(b"ababa")).unwrap();
        let (bytes, bits) = encode_with_separator(&tree);

        // 1 01100010 (b), 1 01100001 (a), 0 (combine), 0 (separator)
        assert_eq!(bits, 19);
        assert_eq!(bits, encoded_len(2));
        assert_eq!(bytes, vec![0b1011_0001, 0b0101_1000, 0b0100_0000]);
    }

    #[test]
    fn test_round_trip_shape() {
        let data = b"she sells sea shells by the sea shore";
        let tree = CodeTree::build(&FrequencyTable::from_bytes(data)).unwrap();
        let (bytes, bits) = encode_with_separator(&tree);

        let mut reader = BitReader::new(&bytes);
        let decoded = read_tree(&mut reader).unwrap();
        assert!(decoded.root().same_shape(tree.root()));
        assert_eq!(decoded.leaf_count(), tree.leaf_count());
        assert_eq!(reader.position(), bits + 1);
        assert_eq!(decoded.code_map().unwrap(), tree.code_map().unwrap());
    }

    #[test]
    fn test_single_leaf() {
        let tree = CodeTree::build(&FrequencyTable::from_bytes(b"zzzz")).unwrap();
        let (bytes, bits) = encode_with_separator(&tree);
        assert_eq!(bits, 9);

        let mut reader = BitReader::new(&bytes);
        let decoded = read_tree(&mut reader).unwrap();
        assert!(decoded.is_degenerate());
        assert_eq!(decoded.root().symbol(), Some(b'z'));
        assert_eq!(reader.position(), 10);
    }

    #[test]
    fn test_full_alphabet() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = CodeTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        let (bytes, bits) = encode_with_separator(&tree);
        assert_eq!(bits, encoded_len(256));

        let decoded = read_tree(&mut BitReader::new(&bytes)).unwrap();
        assert_eq!(decoded.leaf_count(), 256);
        assert_eq!(decoded.internal_count(), 255);
        assert!(decoded.root().same_shape(tree.root()));
    }

    #[test]
    fn test_separator_first() {
        assert!(matches!(
            read_err(&[0b0000_0000]),
            Error::Malformed(MalformedError::SeparatorBeforeTree { position: 0 })
        ));
    }

    #[test]
    fn test_duplicate_symbol() {
        // 1 01000001, 1 01000001
        let mut writer = BitWriter::new();
        writer.write_bits(0b1_0100_0001, 9).unwrap();
        writer.write_bits(0b1_0100_0001, 9).unwrap();
        writer.write_bits(0, 2).unwrap();
        assert!(matches!(
            read_err(&writer.finish()),
            Error::Malformed(MalformedError::DuplicateSymbol { symbol: 0x41 })
        ));
    }

    #[test]
    fn test_truncated_leaf() {
        // A marker bit followed by only 7 symbol bits
        assert!(matches!(
            read_err(&[0b1111_1111]),
            Error::Malformed(MalformedError::TruncatedTree { .. })
        ));
    }

    #[test]
    fn test_never_reduces() {
        // Two leaves and then the data ends before any combine
        let mut writer = BitWriter::new();
        writer.write_bits(0b1_0000_0001, 9).unwrap();
        writer.write_bits(0b1_0000_0010, 9).unwrap();
        // Pad with ones so the tail reads as another marker that cannot finish
        writer.write_bits(0b111111, 6).unwrap();
        assert!(matches!(
            read_err(&writer.finish()),
            Error::Malformed(MalformedError::UnbalancedTree { pending: 2 })
        ));
    }
}
