//! Byte frequency counting.
//!
//! Only symbols with a non-zero count take part in code construction; the
//! encoded alphabet is exactly the set of byte values present in the input.

use rayon::prelude::*;

/// Slice length each rayon task counts on its own before the merge.
const PARALLEL_CHUNK: usize = 1 << 16;

/// Occurrence counts for all 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count every byte of `data` in a single pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Same result as [`FrequencyTable::from_bytes`], counted on the rayon pool.
    pub fn from_bytes_parallel(data: &[u8]) -> Self {
        let counts = data
            .par_chunks(PARALLEL_CHUNK)
            .map(|chunk| Self::from_bytes(chunk).counts)
            .reduce(
                || [0u64; 256],
                |mut acc, part| {
                    for (a, p) in acc.iter_mut().zip(part.iter()) {
                        *a += p;
                    }
                    acc
                },
            );
        Self { counts }
    }

    pub fn from_counts(counts: [u64; 256]) -> Self {
        Self { counts }
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Present symbols with their counts, ascending by symbol.
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Number of distinct byte values present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct() == 0
    }
}
