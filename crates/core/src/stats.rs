//! Statistics describing one encode or decode call.
//!
//! Filled in by the container as it goes and handed back with the result, so
//! callers can report what the codec did without re-parsing the stream.

use std::time::{Duration, Instant};

/// Sizes and timing for a single codec invocation.
#[derive(Debug, Clone)]
pub struct CodecStats {
    // === Timing ===
    /// When the call started
    pub start_time: Instant,

    /// When the call finished (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Bytes of original (unencoded) data
    pub raw_bytes: u64,

    /// Bytes of the encoded stream, digest included
    pub encoded_bytes: u64,

    // === Tree ===
    /// Distinct byte values, one per leaf
    pub distinct_symbols: usize,

    /// Internal nodes in the code tree
    pub internal_nodes: usize,

    /// Longest code length in bits
    pub max_code_len: usize,

    // === Bit layout ===
    /// Tree section size, separator excluded
    pub tree_bits: usize,

    /// Payload section size
    pub payload_bits: u64,

    /// Zero bits appended to reach a byte boundary
    pub padding_bits: usize,
}

impl CodecStats {
    /// Create stats with the start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            encoded_bytes: 0,
            distinct_symbols: 0,
            internal_nodes: 0,
            max_code_len: 0,
            tree_bits: 0,
            payload_bits: 0,
            padding_bits: 0,
        }
    }

    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Encoded size over raw size; 0.0 for no data.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.encoded_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average payload bits spent per raw byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.raw_bytes as f64
        }
    }

    /// Raw bytes processed per second.
    pub fn throughput_bps(&self) -> f64 {
        let secs = self.duration().as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Codec Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Raw:     {} bytes", self.raw_bytes);
        println!("Encoded: {} bytes", self.encoded_bytes);
        println!("Ratio:   {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Code Tree ===");
        println!("Symbols: {}", self.distinct_symbols);
        println!("Internal nodes: {}", self.internal_nodes);
        println!("Longest code: {} bits", self.max_code_len);
        println!();
        println!("=== Layout ===");
        println!("Tree: {} bits", self.tree_bits);
        println!("Payload: {} bits ({:.3} bits/byte)", self.payload_bits, self.bits_per_symbol());
        println!("Padding: {} bits", self.padding_bits);
        println!();
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             raw_bytes={}\n\
             encoded_bytes={}\n\
             compression_ratio={:.4}\n\
             distinct_symbols={}\n\
             internal_nodes={}\n\
             max_code_len={}\n\
             tree_bits={}\n\
             payload_bits={}\n\
             padding_bits={}\n",
            self.duration().as_millis(),
            self.raw_bytes,
            self.encoded_bytes,
            self.compression_ratio(),
            self.distinct_symbols,
            self.internal_nodes,
            self.max_code_len,
            self.tree_bits,
            self.payload_bits,
            self.padding_bits,
        )
    }
}

impl Default for CodecStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        let stats = CodecStats::new();
        assert!(stats.end_time.is_none());
        assert_eq!(stats.compression_ratio(), 0.0);
        assert_eq!(stats.bits_per_symbol(), 0.0);
    }

    #[test]
    fn test_ratios() {
        let mut stats = CodecStats::new();
        stats.raw_bytes = 1000;
        stats.encoded_bytes = 750;
        stats.payload_bits = 4000;

        assert_eq!(stats.compression_ratio(), 0.75);
        assert_eq!(stats.bits_per_symbol(), 4.0);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut stats = CodecStats::new();
        stats.complete();
        let first = stats.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(stats.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut stats = CodecStats::new();
        stats.raw_bytes = 5;
        stats.payload_bits = 5;
        stats.distinct_symbols = 2;

        let text = stats.export_text();
        assert!(text.contains("raw_bytes=5\n"));
        assert!(text.contains("payload_bits=5\n"));
        assert!(text.contains("distinct_symbols=2\n"));
    }
}
