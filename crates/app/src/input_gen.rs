//! Sample input generation.
//!
//! `--generate` writes a file whose byte statistics vary from block to
//! block, so encoding it shows both good and poor compression:
//! - runs of one byte (single-leaf-like, very cheap)
//! - text over a small alphabet (short codes)
//! - short repeating patterns
//! - uniform random bytes (close to 8 bits per byte)
//!
//! Output is fully determined by the seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest block generated with one set of statistics.
const BLOCK_BYTES: usize = 4096;

const TEXT_ALPHABET: &[u8] = b"etaoinshrdlu etaoin shrdlu cmfwyp.,\n";

/// Generate `size_bytes` of mixed-statistics data from `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let block = (size_bytes - data.len()).min(rng.gen_range(1..=BLOCK_BYTES));

        match rng.gen_range(0..10u8) {
            // 30% runs
            0..=2 => {
                let byte: u8 = rng.gen();
                data.resize(data.len() + block, byte);
            }
            // 40% text
            3..=6 => {
                for _ in 0..block {
                    data.push(TEXT_ALPHABET[rng.gen_range(0..TEXT_ALPHABET.len())]);
                }
            }
            // 20% patterns
            7..=8 => {
                let pattern: Vec<u8> = (0..rng.gen_range(2..=16)).map(|_| rng.gen()).collect();
                data.extend(pattern.iter().cycle().take(block));
            }
            // 10% noise
            _ => {
                for _ in 0..block {
                    data.push(rng.gen());
                }
            }
        }
    }

    data
}
