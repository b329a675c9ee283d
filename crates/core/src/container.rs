//! Stream layout, encode/decode, and integrity verification.
//!
//! # Stream Format
//!
//! All bit fields are packed MSB-first.
//!
//! ```text
//! +-------------------------+
//! | length (32 bits)        |  payload bit count, or repeat count for a
//! |                         |  single-leaf tree
//! +-------------------------+
//! | tree (variable)         |  children-before-parent, see `tree_codec`
//! +-------------------------+
//! | separator (1 bit)       |  always 0
//! +-------------------------+
//! | payload (length bits)   |  codes of every input byte, in order
//! +-------------------------+
//! | padding (0-7 bits)      |  zeros up to the byte boundary
//! +-------------------------+
//! | digest (16 bytes)       |  MD5 of the raw data, not bit-packed
//! +-------------------------+
//! ```
//!
//! # Single-symbol input
//!
//! When the input holds one distinct byte value the tree is a lone leaf with
//! an empty code, so the payload is empty. The length field then records how
//! many times the symbol repeats.
//!
//! # Empty input
//!
//! An empty buffer has no alphabet and is rejected with
//! `HuffmanError::EmptyAlphabet`. No stream ever decodes to zero bytes.

use crate::bitio::{BitReader, BitWriter};
use crate::digest::{Digest, DIGEST_LEN};
use crate::error::{Error, HuffmanError, MalformedError, Result};
use crate::frequency::FrequencyTable;
use crate::stats::CodecStats;
use crate::tree::CodeTree;
use crate::tree_codec::{encoded_len, read_tree, write_tree};

/// Width of the length header in bits.
pub const HEADER_BITS: usize = 32;

/// Smallest valid stream: header, one leaf plus separator, digest.
pub const MIN_STREAM_LEN: usize = HEADER_BITS / 8 + 2 + DIGEST_LEN;

/// File extension reserved for encoded streams (without the dot).
pub const EXTENSION: &str = "he";

/// Inputs at least this large are counted on the rayon pool.
const PARALLEL_COUNT_THRESHOLD: usize = 1 << 20;

/// Result of a successful encode.
#[derive(Debug, Clone)]
pub struct Encoded {
    /// The complete stream, digest included
    pub bytes: Vec<u8>,

    /// Digest of the raw input
    pub digest: Digest,

    pub stats: CodecStats,
}

/// Result of a successful, verified decode.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// The reconstructed raw data
    pub bytes: Vec<u8>,

    /// Digest of `bytes`, equal to the one stored in the stream
    pub digest: Digest,

    pub stats: CodecStats,
}

/// Layout of a stream as read from its header and tree section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// Raw value of the 32-bit length header
    pub length_field: u32,

    /// Tree section size, separator excluded
    pub tree_bits: usize,

    /// Bit index of the first payload bit
    pub payload_offset: usize,

    /// Payload section size
    pub payload_bits: usize,

    /// Bits between the payload and the digest
    pub padding_bits: usize,

    /// Leaves in the stored tree
    pub leaves: usize,

    /// Digest stored in the final 16 bytes
    pub stored_digest: Digest,
}

impl StreamInfo {
    /// True for a single-leaf tree, whose length field is a repeat count.
    pub fn is_degenerate(&self) -> bool {
        self.leaves == 1
    }

    /// Number of bytes the stream decodes to, when the tree is a single leaf.
    pub fn repeat_count(&self) -> Option<u64> {
        self.is_degenerate().then_some(self.length_field as u64)
    }
}

/// Encode `data` into a self-describing stream.
///
/// # Errors
/// - `HuffmanError::EmptyAlphabet` for empty input
/// - `HuffmanError::PayloadTooLong` if the payload exceeds `u32::MAX` bits
pub fn encode(data: &[u8]) -> Result<Encoded> {
    let mut stats = CodecStats::new();

    let freqs = if data.len() >= PARALLEL_COUNT_THRESHOLD {
        FrequencyTable::from_bytes_parallel(data)
    } else {
        FrequencyTable::from_bytes(data)
    };
    let tree = CodeTree::build(&freqs)?;
    let codes = tree.code_map()?;

    let payload_bits = codes.payload_bits(&freqs);
    let length = if tree.is_degenerate() {
        freqs.total()
    } else {
        payload_bits
    };
    let length_field =
        u32::try_from(length).map_err(|_| HuffmanError::PayloadTooLong { bits: length })?;

    let mut writer = BitWriter::with_capacity(
        HEADER_BITS + encoded_len(tree.leaf_count()) + 1 + payload_bits as usize,
    );
    writer.write_bits(length_field as u64, HEADER_BITS)?;
    let tree_bits = write_tree(&tree, &mut writer)?;
    writer.write_bit(false);

    for &byte in data {
        let code = codes
            .get(byte)
            .ok_or(HuffmanError::MissingCode { symbol: byte })?;
        writer.write_bits(code.bits(), code.len())?;
    }

    let padding_bits = writer.padding_bits();
    let digest = Digest::of(data);
    let mut bytes = writer.finish();
    bytes.extend_from_slice(digest.as_bytes());

    stats.raw_bytes = data.len() as u64;
    stats.encoded_bytes = bytes.len() as u64;
    stats.distinct_symbols = tree.leaf_count();
    stats.internal_nodes = tree.internal_count();
    stats.max_code_len = codes.max_len();
    stats.tree_bits = tree_bits;
    stats.payload_bits = payload_bits;
    stats.padding_bits = padding_bits;
    stats.complete();

    log::debug!(
        "encoded {} bytes into {} ({} symbols, tree {} bits, payload {} bits, padding {})",
        data.len(),
        bytes.len(),
        tree.leaf_count(),
        tree_bits,
        payload_bits,
        padding_bits
    );

    Ok(Encoded {
        bytes,
        digest,
        stats,
    })
}

/// Parse the header and tree, validating the declared payload length
/// against the bits actually present.
fn parse_layout(stream: &[u8]) -> Result<(StreamInfo, CodeTree, BitReader<'_>)> {
    if stream.len() < MIN_STREAM_LEN {
        return Err(MalformedError::StreamTooShort {
            required: MIN_STREAM_LEN,
            actual: stream.len(),
        }
        .into());
    }

    let (body, tail) = stream.split_at(stream.len() - DIGEST_LEN);
    let stored_digest = Digest::from_slice(tail).ok_or(MalformedError::StreamTooShort {
        required: MIN_STREAM_LEN,
        actual: stream.len(),
    })?;

    let mut reader = BitReader::new(body);
    let length_field = reader.read_bits(HEADER_BITS)? as u32;
    let tree = read_tree(&mut reader)?;
    let payload_offset = reader.position();
    // The separator sits between the tree and the payload
    let tree_bits = payload_offset - HEADER_BITS - 1;

    let payload_bits = if tree.is_degenerate() {
        0
    } else {
        length_field as usize
    };
    let available = reader.bits_remaining();
    if payload_bits > available {
        return Err(MalformedError::PayloadOverrun {
            declared: payload_bits as u64,
            available,
        }
        .into());
    }
    let padding_bits = available - payload_bits;
    if padding_bits >= 8 {
        return Err(MalformedError::TrailingBits {
            count: padding_bits,
        }
        .into());
    }

    let info = StreamInfo {
        length_field,
        tree_bits,
        payload_offset,
        payload_bits,
        padding_bits,
        leaves: tree.leaf_count(),
        stored_digest,
    };
    log::trace!("stream layout: {:?}", info);

    Ok((info, tree, reader))
}

/// Read a stream's layout without decoding the payload.
pub fn inspect(stream: &[u8]) -> Result<StreamInfo> {
    parse_layout(stream).map(|(info, _, _)| info)
}

/// Walk the payload from the root once per symbol.
///
/// A code left unfinished when the declared bits run out is dropped; the
/// digest check decides whether the symbols before it are the original data.
fn walk_payload(tree: &CodeTree, reader: &mut BitReader<'_>, payload_bits: usize) -> Result<Vec<u8>> {
    let root = tree.root();
    let mut output = Vec::with_capacity(payload_bits / tree.depth().max(1));
    let mut node = root;
    let mut partial = 0usize;

    for _ in 0..payload_bits {
        let bit = reader.read_bit()?;
        if let Some(next) = node.child(bit) {
            node = next;
            partial += 1;
        }
        if let Some(symbol) = node.symbol() {
            output.push(symbol);
            node = root;
            partial = 0;
        }
    }

    if partial > 0 {
        log::debug!(
            "payload ends {} bits into a code after {} symbols, dropping it",
            partial,
            output.len()
        );
    }
    Ok(output)
}

/// Compare a computed digest with the one the stream carries.
fn verify(info: &StreamInfo, digest: Digest, decoded_len: usize) -> Result<()> {
    if digest == info.stored_digest {
        return Ok(());
    }
    log::warn!(
        "digest mismatch: stream carries {}, decoded {} bytes hash to {}",
        info.stored_digest,
        decoded_len,
        digest
    );
    Err(Error::Integrity {
        expected: info.stored_digest,
        actual: digest,
    })
}

/// Decode and verify a stream.
///
/// Nothing is returned unless the decoded bytes hash to the stored digest.
///
/// # Errors
/// - `Error::Malformed` / `Error::BitIo` for structural violations
/// - `Error::Integrity` on digest mismatch
pub fn decode(stream: &[u8]) -> Result<Decoded> {
    let mut stats = CodecStats::new();
    let (info, tree, mut reader) = parse_layout(stream)?;

    let (bytes, digest) = match tree.root().symbol() {
        Some(symbol) => {
            // Verify the run before allocating it
            let count = info.length_field as usize;
            let digest = Digest::of_repeated(symbol, count);
            verify(&info, digest, count)?;
            (vec![symbol; count], digest)
        }
        None => {
            let bytes = walk_payload(&tree, &mut reader, info.payload_bits)?;
            let digest = Digest::of(&bytes);
            verify(&info, digest, bytes.len())?;
            (bytes, digest)
        }
    };

    stats.raw_bytes = bytes.len() as u64;
    stats.encoded_bytes = stream.len() as u64;
    stats.distinct_symbols = tree.leaf_count();
    stats.internal_nodes = tree.internal_count();
    stats.max_code_len = tree.depth();
    stats.tree_bits = info.tree_bits;
    stats.payload_bits = info.payload_bits as u64;
    stats.padding_bits = info.padding_bits;
    stats.complete();

    log::debug!(
        "decoded {} bytes from {} byte stream, digest {}",
        bytes.len(),
        stream.len(),
        digest
    );

    Ok(Decoded {
        bytes,
        digest,
        stats,
    })
}
