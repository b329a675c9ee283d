//! Integration tests for the full codec: encode -> stream -> decode, with
//! verification that output matches input and that corruption is caught.

use hecodec_core::{
    bitio::BitReader,
    decode, encode,
    error::{Error, HuffmanError},
    frequency::FrequencyTable,
    inspect,
    tree::CodeTree,
    tree_codec::read_tree,
    Codec, Digest, HuffmanCodec,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Data mixing runs, text, and noise, reproducible from `seed`.
fn mixed_data(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(len);
    while data.len() < len {
        match rng.gen_range(0..3) {
            0 => {
                let byte: u8 = rng.gen();
                data.extend(std::iter::repeat(byte).take(rng.gen_range(1..200)));
            }
            1 => data.extend_from_slice(b"the quick brown fox jumps over the lazy dog. "),
            _ => {
                for _ in 0..rng.gen_range(1..100) {
                    data.push(rng.gen());
                }
            }
        }
    }
    data.truncate(len);
    data
}

#[test]
fn test_round_trip_reports_same_digest() {
    let input = b"hello world! this is a test of the full codec with some repetition: aaaaaaaaaa bbbbbbbbbb";

    let encoded = encode(input).expect("encode failed");
    let decoded = decode(&encoded.bytes).expect("decode failed");

    assert_eq!(decoded.bytes, input, "output doesn't match input");
    assert_eq!(decoded.digest, encoded.digest);
    assert_eq!(decoded.digest, Digest::of(input));
}

#[test]
fn test_ababa_scenario() {
    let input = [0x61, 0x62, 0x61, 0x62, 0x61];

    let freqs = FrequencyTable::from_bytes(&input);
    assert_eq!(freqs.count(0x61), 3);
    assert_eq!(freqs.count(0x62), 2);

    let tree = CodeTree::build(&freqs).unwrap();
    assert_eq!(tree.internal_count(), 1);
    assert_eq!(tree.leaf_count(), 2);
    let codes = tree.code_map().unwrap();
    assert_eq!(codes.get(0x61).unwrap().len(), 1);
    assert_eq!(codes.get(0x62).unwrap().len(), 1);
    assert_ne!(codes.get(0x61), codes.get(0x62));

    let encoded = encode(&input).unwrap();
    assert_eq!(inspect(&encoded.bytes).unwrap().payload_bits, 5);

    let decoded = decode(&encoded.bytes).unwrap();
    assert_eq!(decoded.bytes, input);
    assert_eq!(decoded.digest.as_bytes(), &md5::compute(input).0);
}

#[test]
fn test_determinism() {
    let input = mixed_data(7, 50_000);
    let first = encode(&input).unwrap();
    let second = encode(&input).unwrap();
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_degenerate_alphabet() {
    let input = vec![0x41u8; 1000];
    let encoded = encode(&input).unwrap();
    assert_eq!(encoded.stats.internal_nodes, 0);

    let info = inspect(&encoded.bytes).unwrap();
    assert!(info.is_degenerate());
    assert_eq!(info.repeat_count(), Some(1000));

    assert_eq!(decode(&encoded.bytes).unwrap().bytes, input);
}

#[test]
fn test_all_symbols() {
    let mut input: Vec<u8> = (0..=255).collect();
    // Skew the weights so the tree is not perfectly balanced
    input.extend(std::iter::repeat(b'e').take(500));
    input.extend(std::iter::repeat(b't').take(200));

    let encoded = encode(&input).unwrap();
    let info = inspect(&encoded.bytes).unwrap();
    assert_eq!(info.leaves, 256);
    assert_eq!(encoded.stats.internal_nodes, 255);

    // The stored tree reads back with the same shape
    let mut reader = BitReader::new(&encoded.bytes[..encoded.bytes.len() - 16]);
    reader.read_bits(32).unwrap();
    let stored = read_tree(&mut reader).unwrap();
    let built = CodeTree::build(&FrequencyTable::from_bytes(&input)).unwrap();
    assert!(stored.root().same_shape(built.root()));

    assert_eq!(decode(&encoded.bytes).unwrap().bytes, input);
}

#[test]
fn test_empty_input_policy() {
    let result = encode(&[]);
    assert!(matches!(
        result,
        Err(Error::Huffman(HuffmanError::EmptyAlphabet))
    ));
}

#[test]
fn test_large_mixed_data() {
    // Big enough to take the parallel counting path
    let input = mixed_data(2024, 3 << 20);
    let encoded = encode(&input).unwrap();
    assert_eq!(decode(&encoded.bytes).unwrap().bytes, input);
}

#[test]
fn test_tamper_equal_length_codes() {
    // Four equally frequent symbols give 2-bit codes everywhere, so any
    // payload flip still parses and must be caught by the digest.
    let input = b"abcd".repeat(50);
    let clean = encode(&input).unwrap().bytes;
    let info = inspect(&clean).unwrap();

    for bit in info.payload_offset..info.payload_offset + info.payload_bits {
        let mut stream = clean.clone();
        stream[bit / 8] ^= 0x80 >> (bit % 8);
        let err = decode(&stream).unwrap_err();
        assert!(err.is_integrity_failure(), "payload bit {bit}: {err}");
    }

    let digest_start = clean.len() - 16;
    for bit in digest_start * 8..clean.len() * 8 {
        let mut stream = clean.clone();
        stream[bit / 8] ^= 0x80 >> (bit % 8);
        assert!(decode(&stream).unwrap_err().is_integrity_failure());
    }
}

#[test]
fn test_tamper_unequal_length_codes() {
    // Mixed data gives codes of many lengths, so flips shift code boundaries
    // and can leave the payload ending inside a code.
    let input = mixed_data(99, 4096);
    let clean = encode(&input).unwrap().bytes;
    let info = inspect(&clean).unwrap();

    for bit in (info.payload_offset..info.payload_offset + info.payload_bits).step_by(37) {
        let mut stream = clean.clone();
        stream[bit / 8] ^= 0x80 >> (bit % 8);
        match decode(&stream) {
            Ok(decoded) => panic!("flip at bit {bit} decoded {} bytes", decoded.bytes.len()),
            Err(err) => assert!(err.is_integrity_failure(), "payload bit {bit}: {err}"),
        }
    }
}

#[test]
fn test_truncated_stream() {
    let clean = encode(b"truncate me, please").unwrap().bytes;
    for len in 0..clean.len() - 16 {
        let err = decode(&clean[..len]).unwrap_err();
        assert!(
            err.is_malformed() || err.is_integrity_failure(),
            "len {len}: {err}"
        );
    }
}

#[test]
fn test_codec_trait() {
    let codec = HuffmanCodec;
    let input = mixed_data(5, 10_000);
    let stream = codec.compress(&input).unwrap();
    assert_eq!(codec.decompress(&stream).unwrap(), input);
}
