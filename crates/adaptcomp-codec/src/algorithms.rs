//! Compression algorithm implementations
//!
//! This module provides byte-level implementations for the variants backed by
//! ecosystem crates, behind a unified interface that reads tuned parameters.

use adaptcomp_types::{parameters::LEVEL, AlgorithmVariant, Error, Parameters, Result};
use std::io::{Read, Write};

/// Trait for compression algorithm implementations
pub trait Algorithm {
    /// Compress data with tuned parameters
    fn compress(&self, data: &[u8], parameters: &Parameters) -> Result<Vec<u8>>;

    /// Decompress data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Get the variant this algorithm implements
    fn variant(&self) -> AlgorithmVariant;

    /// Get the default compression level
    fn default_level(&self) -> i64;

    /// Get the supported level range
    fn level_range(&self) -> (i64, i64);

    /// Resolve the `level` parameter, clamped to the supported range
    fn level(&self, parameters: &Parameters) -> i64 {
        let (min, max) = self.level_range();
        parameters
            .get(LEVEL)
            .and_then(|value| value.as_i64())
            .unwrap_or_else(|| self.default_level())
            .clamp(min, max)
    }
}

/// Algorithm implementation factory
pub struct AlgorithmImpl;

impl AlgorithmImpl {
    /// Create an algorithm implementation for a variant, if one exists
    pub fn create(variant: AlgorithmVariant) -> Option<Box<dyn Algorithm + Send + Sync>> {
        match variant {
            AlgorithmVariant::Gzip => Some(Box::new(GzipAlgorithm)),
            AlgorithmVariant::Zstd => Some(Box::new(ZstdAlgorithm)),
            AlgorithmVariant::Lz4 => Some(Box::new(Lz4Algorithm)),
            AlgorithmVariant::Brotli => Some(Box::new(BrotliAlgorithm)),
            AlgorithmVariant::Lzma
            | AlgorithmVariant::Bzip2
            | AlgorithmVariant::ContentAware
            | AlgorithmVariant::Quantum
            | AlgorithmVariant::Neuromorphic
            | AlgorithmVariant::Topological => None,
        }
    }

    /// Get all implemented variants
    pub fn implemented() -> Vec<AlgorithmVariant> {
        vec![
            AlgorithmVariant::Gzip,
            AlgorithmVariant::Zstd,
            AlgorithmVariant::Lz4,
            AlgorithmVariant::Brotli,
        ]
    }
}

/// Gzip (DEFLATE) compression implementation
#[derive(Debug, Clone)]
pub struct GzipAlgorithm;

impl Algorithm for GzipAlgorithm {
    fn compress(&self, data: &[u8], parameters: &Parameters) -> Result<Vec<u8>> {
        let level = self.level(parameters) as u32;
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::new(level));

        encoder.write_all(data).map_err(|e| {
            Error::compression_failed(self.variant(), format!("Gzip compression write failed: {}", e))
        })?;

        encoder.finish().map_err(|e| {
            Error::compression_failed(self.variant(), format!("Gzip compression finish failed: {}", e))
        })
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decompressed = Vec::new();
        flate2::read::GzDecoder::new(data)
            .read_to_end(&mut decompressed)
            .map_err(|e| {
                Error::compression_failed(self.variant(), format!("Gzip decompression failed: {}", e))
            })?;
        Ok(decompressed)
    }

    fn variant(&self) -> AlgorithmVariant {
        AlgorithmVariant::Gzip
    }

    fn default_level(&self) -> i64 {
        6
    }

    fn level_range(&self) -> (i64, i64) {
        (0, 9)
    }
}

/// Zstandard compression implementation
#[derive(Debug, Clone)]
pub struct ZstdAlgorithm;

impl Algorithm for ZstdAlgorithm {
    fn compress(&self, data: &[u8], parameters: &Parameters) -> Result<Vec<u8>> {
        let level = self.level(parameters) as i32;
        zstd::stream::encode_all(data, level).map_err(|e| {
            Error::compression_failed(self.variant(), format!("Zstd compression failed: {}", e))
        })
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        zstd::stream::decode_all(data).map_err(|e| {
            Error::compression_failed(self.variant(), format!("Zstd decompression failed: {}", e))
        })
    }

    fn variant(&self) -> AlgorithmVariant {
        AlgorithmVariant::Zstd
    }

    fn default_level(&self) -> i64 {
        3
    }

    fn level_range(&self) -> (i64, i64) {
        (1, 22)
    }
}

/// LZ4 compression implementation
#[derive(Debug, Clone)]
pub struct Lz4Algorithm;

impl Algorithm for Lz4Algorithm {
    fn compress(&self, data: &[u8], _parameters: &Parameters) -> Result<Vec<u8>> {
        // lz4_flex has a single speed-oriented mode; level is accepted but ignored
        Ok(lz4_flex::compress_prepend_size(data))
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        lz4_flex::decompress_size_prepended(data).map_err(|e| {
            Error::compression_failed(self.variant(), format!("LZ4 decompression failed: {}", e))
        })
    }

    fn variant(&self) -> AlgorithmVariant {
        AlgorithmVariant::Lz4
    }

    fn default_level(&self) -> i64 {
        1
    }

    fn level_range(&self) -> (i64, i64) {
        (1, 12)
    }
}

/// Brotli compression implementation
#[derive(Debug, Clone)]
pub struct BrotliAlgorithm;

impl BrotliAlgorithm {
    const DEFAULT_BUFFER: usize = 4096;

    /// log2 of the `window_size` parameter, clamped to what brotli accepts
    fn lgwin(parameters: &Parameters) -> u32 {
        parameters
            .get("window_size")
            .and_then(|value| value.as_i64())
            .filter(|&window| window > 0)
            .map_or(22, |window| 63 - (window as u64).leading_zeros())
            .clamp(10, 24)
    }

    fn buffer_size(parameters: &Parameters) -> usize {
        parameters
            .get("block_size")
            .and_then(|value| value.as_i64())
            .map_or(Self::DEFAULT_BUFFER, |block| block.clamp(1024, 65_536) as usize)
    }
}

impl Algorithm for BrotliAlgorithm {
    fn compress(&self, data: &[u8], parameters: &Parameters) -> Result<Vec<u8>> {
        let quality = self.level(parameters) as u32;
        let mut compressed = Vec::new();
        let mut compressor = brotli::CompressorWriter::new(
            &mut compressed,
            Self::buffer_size(parameters),
            quality,
            Self::lgwin(parameters),
        );

        compressor.write_all(data).map_err(|e| {
            Error::compression_failed(self.variant(), format!("Brotli compression write failed: {}", e))
        })?;

        compressor.flush().map_err(|e| {
            Error::compression_failed(self.variant(), format!("Brotli compression flush failed: {}", e))
        })?;

        drop(compressor);
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decompressed = Vec::new();
        let mut decompressor = brotli::Decompressor::new(data, Self::DEFAULT_BUFFER);

        decompressor.read_to_end(&mut decompressed).map_err(|e| {
            Error::compression_failed(self.variant(), format!("Brotli decompression failed: {}", e))
        })?;

        Ok(decompressed)
    }

    fn variant(&self) -> AlgorithmVariant {
        AlgorithmVariant::Brotli
    }

    fn default_level(&self) -> i64 {
        6
    }

    fn level_range(&self) -> (i64, i64) {
        (0, 11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptcomp_types::ParameterValue;
    use rstest::rstest;

    fn with_level(level: i64) -> Parameters {
        let mut parameters = Parameters::new();
        parameters.insert(LEVEL.to_string(), ParameterValue::Int(level));
        parameters
    }

    #[rstest]
    #[case(AlgorithmVariant::Gzip)]
    #[case(AlgorithmVariant::Zstd)]
    #[case(AlgorithmVariant::Lz4)]
    #[case(AlgorithmVariant::Brotli)]
    fn test_roundtrip(#[case] variant: AlgorithmVariant) {
        let algo = AlgorithmImpl::create(variant).unwrap();
        let data = b"Hello, world! This is a test string for compression.".repeat(10);

        let compressed = algo.compress(&data, &with_level(algo.default_level())).unwrap();
        let decompressed = algo.decompress(&compressed).unwrap();

        assert_eq!(data, decompressed);
        assert!(compressed.len() < data.len());
        assert_eq!(algo.variant(), variant);
    }

    #[test]
    fn test_unimplemented_variants() {
        for variant in AlgorithmVariant::ALL {
            let implemented = AlgorithmImpl::implemented().contains(&variant);
            assert_eq!(AlgorithmImpl::create(variant).is_some(), implemented);
        }
    }

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(ZstdAlgorithm.level(&with_level(40)), 22);
        assert_eq!(GzipAlgorithm.level(&with_level(-3)), 0);
        assert_eq!(BrotliAlgorithm.level(&Parameters::new()), 6);
    }

    #[test]
    fn test_brotli_window_mapping() {
        let mut parameters = Parameters::new();
        assert_eq!(BrotliAlgorithm::lgwin(&parameters), 22);

        parameters.insert("window_size".into(), ParameterValue::Int(1024));
        assert_eq!(BrotliAlgorithm::lgwin(&parameters), 10);

        parameters.insert("window_size".into(), ParameterValue::Int(16_777_216));
        assert_eq!(BrotliAlgorithm::lgwin(&parameters), 24);

        parameters.insert("window_size".into(), ParameterValue::Int(64));
        assert_eq!(BrotliAlgorithm::lgwin(&parameters), 10);
    }

    #[test]
    fn test_corrupt_input_is_reported() {
        let error = GzipAlgorithm.decompress(b"definitely not gzip").unwrap_err();
        assert_eq!(error.variant(), Some(AlgorithmVariant::Gzip));
    }
}
