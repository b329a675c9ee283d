//! 128-bit content digest stored at the end of every stream.
//!
//! The digest is MD5 over the raw bytes. It is only an integrity check for
//! accidental corruption, never an authenticity guarantee.

use std::fmt;

/// Size of the digest in bytes.
pub const DIGEST_LEN: usize = 16;

/// Block fed to the hasher per step by [`Digest::of_repeated`].
const RUN_CHUNK: usize = 64 * 1024;

/// MD5 digest of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// Hash `data`.
    pub fn of(data: &[u8]) -> Self {
        Self(md5::compute(data).0)
    }

    /// Hash `count` copies of `byte` without building the run in memory.
    pub fn of_repeated(byte: u8, count: usize) -> Self {
        let chunk = [byte; RUN_CHUNK];
        let mut context = md5::Context::new();
        let mut left = count;
        while left > 0 {
            let take = left.min(RUN_CHUNK);
            context.consume(&chunk[..take]);
            left -= take;
        }
        Self(context.compute().0)
    }

    /// Read a digest from exactly [`DIGEST_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lower-case hex, 32 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
