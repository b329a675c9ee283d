//! Byte-in, byte-out interface for code that only needs to shrink and
//! restore buffers.

use crate::container;
use crate::error::Result;

/// A lossless, self-verifying buffer codec.
pub trait Codec {
    /// Encode `data` into a self-contained stream.
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Restore the original bytes, failing if the stream does not verify.
    fn decompress(&self, stream: &[u8]) -> Result<Vec<u8>>;
}

/// Static Huffman coding in the `.he` stream format.
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffmanCodec;

impl Codec for HuffmanCodec {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        container::encode(data).map(|encoded| encoded.bytes)
    }

    fn decompress(&self, stream: &[u8]) -> Result<Vec<u8>> {
        container::decode(stream).map(|decoded| decoded.bytes)
    }
}
