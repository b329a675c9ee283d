//! hecodec-core: static Huffman coding over the byte alphabet
//!
//! This library turns a buffer into a single self-describing stream and back:
//! - Counts byte frequencies and builds a Huffman code tree
//! - Serializes the tree and the payload into one MSB-first bitstream
//! - Appends an MD5 digest of the raw data and verifies it on decode
//!
//! # Architecture
//!
//! Modules, leaf-first:
//! - `bitio`: bit packing and unpacking
//! - `frequency`: byte occurrence counts
//! - `tree`: deterministic code tree construction and code maps
//! - `tree_codec`: tree serialization and the stack-machine reader
//! - `digest`: the 128-bit content digest
//! - `container`: stream layout, encode/decode, integrity check
//! - `codec`: byte-in, byte-out trait for collaborators
//! - `stats`: sizes and timing of one call
//!
//! # Design Principles
//!
//! - **No panics**: all errors are structured and recoverable
//! - **Deterministic**: equal input always produces byte-identical output
//! - **Verified**: decode never hands back data that fails the digest check
//!
//! # Example
//! ```
//! let encoded = hecodec_core::encode(b"ababa").unwrap();
//! let decoded = hecodec_core::decode(&encoded.bytes).unwrap();
//! assert_eq!(decoded.bytes, b"ababa");
//! assert_eq!(decoded.digest, encoded.digest);
//! ```

pub mod bitio;
pub mod codec;
pub mod container;
pub mod digest;
pub mod error;
pub mod frequency;
pub mod stats;
pub mod tree;
pub mod tree_codec;

// Re-export commonly used types
pub use codec::{Codec, HuffmanCodec};
pub use container::{decode, encode, inspect, Decoded, Encoded, StreamInfo, EXTENSION};
pub use digest::Digest;
pub use error::{Error, Result};
