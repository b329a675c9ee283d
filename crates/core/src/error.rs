//! Error types for the hecodec codec.
//!
//! Every failure is returned as a structured value; nothing in the codec
//! panics on bad input. Errors fall into three families the caller cares
//! about:
//! - integrity: the stream parsed but its digest does not match the output
//! - malformed: the stream violates the bit-level layout
//! - empty alphabet: there is nothing to build a code from

use crate::digest::Digest;
use thiserror::Error;

/// Top-level error type for all codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Code construction failed
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// The encoded stream violates the container layout
    #[error("malformed stream: {0}")]
    Malformed(#[from] MalformedError),

    /// Decoded bytes hash to a different digest than the one stored
    #[error("integrity check failed: stored digest {expected}, decoded data hashes to {actual}")]
    Integrity { expected: Digest, actual: Digest },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for a digest mismatch on decode.
    pub fn is_integrity_failure(&self) -> bool {
        matches!(self, Error::Integrity { .. })
    }

    /// True when the stream itself could not be parsed.
    ///
    /// Bit I/O errors only escape the container while reading, so they are
    /// counted as malformed input as well.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed(_) | Error::BitIo(_))
    }
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one field)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Errors raised while building a code from input data.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// Zero-length input: no symbol occurs, so no tree exists
    #[error("empty alphabet: cannot encode an empty buffer")]
    EmptyAlphabet,

    /// A root-to-leaf path is longer than a code word can hold
    #[error("code for symbol {symbol:#04x} is {length} bits long, maximum is {max}")]
    CodeTooLong { symbol: u8, length: usize, max: usize },

    /// A symbol in the input has no entry in the code map
    #[error("symbol {symbol:#04x} has no code")]
    MissingCode { symbol: u8 },

    /// Payload bit count (or repeat count) does not fit the 32-bit header
    #[error("payload of {bits} bits does not fit the 32-bit length header")]
    PayloadTooLong { bits: u64 },
}

/// Structural violations found while parsing an encoded stream.
#[derive(Debug, Error)]
pub enum MalformedError {
    /// Not enough bytes for the length header and the digest
    #[error("stream too short: need at least {required} bytes, got {actual}")]
    StreamTooShort { required: usize, actual: usize },

    /// The tree section ran into the end of the packed data
    #[error("tree section truncated at bit {position}")]
    TruncatedTree { position: usize },

    /// A 0 marker arrived before any leaf was pushed
    #[error("separator at bit {position} before any tree node")]
    SeparatorBeforeTree { position: usize },

    /// The same byte value appeared in two leaves
    #[error("symbol {symbol:#04x} appears in more than one leaf")]
    DuplicateSymbol { symbol: u8 },

    /// The data ended while several subtrees were still waiting to combine
    #[error("tree section does not reduce to a single root ({pending} nodes pending)")]
    UnbalancedTree { pending: usize },

    /// The header declares more payload bits than the stream holds
    #[error("header declares {declared} payload bits but only {available} remain")]
    PayloadOverrun { declared: u64, available: usize },

    /// More than 7 bits remain after the payload
    #[error("{count} trailing bits after payload, padding is at most 7")]
    TrailingBits { count: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
