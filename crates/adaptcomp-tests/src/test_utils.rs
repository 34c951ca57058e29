//! Seeded content generators for adaptcomp tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// One mebibyte
pub const MIB: usize = 1024 * 1024;

/// Seed used when a pattern does not take one explicitly
pub const DEFAULT_SEED: u64 = 0x00AD_A97C;

/// Test content patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestDataPattern {
    /// No bytes at all
    Empty,
    /// A single `A`
    SingleByte,
    /// One character repeated
    Repeated(u8),
    /// Uniformly random printable ASCII (0x20..=0x7E)
    RandomPrintable {
        /// RNG seed
        seed: u64,
    },
    /// Uniformly random bytes
    RandomBinary {
        /// RNG seed
        seed: u64,
    },
    /// Compact JSON array of records; `size` counts objects, not bytes
    JsonArray,
    /// Rust source assembled from a fixed template; `size` counts functions
    RustSource,
}

/// Generate test content with the specified pattern
///
/// `size` is a byte count except where the pattern says otherwise.
pub fn generate_test_data(size: usize, pattern: TestDataPattern) -> Vec<u8> {
    match pattern {
        TestDataPattern::Empty => Vec::new(),
        TestDataPattern::SingleByte => vec![b'A'],
        TestDataPattern::Repeated(byte) => vec![byte; size],
        TestDataPattern::RandomPrintable { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..size)
                .map(|_| rng.gen_range(0x20u8..=0x7e))
                .collect()
        }
        TestDataPattern::RandomBinary { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut data = vec![0u8; size];
            rng.fill(data.as_mut_slice());
            data
        }
        TestDataPattern::JsonArray => json_array(size).into_bytes(),
        TestDataPattern::RustSource => rust_source(size).into_bytes(),
    }
}

fn json_array(objects: usize) -> String {
    let mut out = String::from("[");
    for id in 0..objects {
        if id > 0 {
            out.push(',');
        }
        let _ = write!(
            out,
            r#"{{"id":{id},"name":"item-{id}","active":{},"score":{}.{:02}}}"#,
            id % 3 != 0,
            id % 10,
            (id * 37) % 100
        );
    }
    out.push(']');
    out
}

fn rust_source(functions: usize) -> String {
    let mut out = String::from("use std::collections::HashMap;\n\n");
    for index in 0..functions {
        let _ = write!(
            out,
            "/// Sums the values stored under `key`\npub fn total_{index}(map: &HashMap<String, u64>, key: &str) -> u64 {{\n    let mut sum = 0;\n    match map.get(key) {{\n        Some(value) => sum += value,\n        None => {{}}\n    }}\n    sum\n}}\n\n"
        );
    }
    out
}

/// Write generated content into a temporary directory
pub fn create_test_file(
    temp_dir: &TempDir,
    name: &str,
    size: usize,
    pattern: TestDataPattern,
) -> std::io::Result<PathBuf> {
    let file_path = temp_dir.path().join(name);
    fs::write(&file_path, generate_test_data(size, pattern))?;
    Ok(file_path)
}

/// Inputs every reference-codec variant must round-trip
pub fn roundtrip_corpus() -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("empty", generate_test_data(0, TestDataPattern::Empty)),
        ("1 byte", generate_test_data(1, TestDataPattern::SingleByte)),
        (
            "1 MiB random printable",
            generate_test_data(MIB, TestDataPattern::RandomPrintable { seed: DEFAULT_SEED }),
        ),
        (
            "1 MiB repeated",
            generate_test_data(MIB, TestDataPattern::Repeated(b'A')),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_test_data_patterns() {
        assert!(generate_test_data(10, TestDataPattern::Empty).is_empty());
        assert_eq!(generate_test_data(10, TestDataPattern::SingleByte), b"A");

        let repeated = generate_test_data(1024, TestDataPattern::Repeated(b'z'));
        assert_eq!(repeated.len(), 1024);
        assert!(repeated.iter().all(|&b| b == b'z'));

        let printable = generate_test_data(4096, TestDataPattern::RandomPrintable { seed: 1 });
        assert_eq!(printable.len(), 4096);
        assert!(printable.iter().all(|b| (0x20..=0x7e).contains(b)));
    }

    #[test]
    fn test_random_printable_covers_full_range() {
        let printable = generate_test_data(4096, TestDataPattern::RandomPrintable { seed: 3 });
        let mut seen = [false; 256];
        for &byte in &printable {
            seen[usize::from(byte)] = true;
        }
        assert!((0x20..=0x7e).all(|byte| seen[byte]));
    }

    #[test]
    fn test_seeded_data_repeats() {
        let pattern = TestDataPattern::RandomBinary { seed: 9 };
        assert_eq!(generate_test_data(256, pattern), generate_test_data(256, pattern));
    }

    #[test]
    fn test_json_array_shape() {
        let json = String::from_utf8(generate_test_data(3, TestDataPattern::JsonArray)).unwrap();
        assert_eq!(
            json,
            r#"[{"id":0,"name":"item-0","active":false,"score":0.00},{"id":1,"name":"item-1","active":true,"score":1.37},{"id":2,"name":"item-2","active":true,"score":2.74}]"#
        );
    }

    #[test]
    fn test_create_test_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path =
            create_test_file(&temp_dir, "sample.txt", 512, TestDataPattern::Repeated(b'x')).unwrap();

        assert!(file_path.exists());
        assert_eq!(fs::metadata(&file_path).unwrap().len(), 512);
    }
}
