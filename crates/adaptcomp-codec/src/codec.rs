//! Reference codec over the ecosystem-backed variants

use crate::algorithms::{Algorithm, AlgorithmImpl};
use crate::frame;
use adaptcomp_types::{AlgorithmVariant, Codec, Error, Parameters, Result};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

const UNSUPPORTED: &str = "not supported by the reference codec";

/// Codec implementing Gzip, Zstd, Lz4 and Brotli
///
/// Every other variant fails with a recoverable `CompressionFailed` error so
/// callers can fall through to the next candidate.
pub struct ReferenceCodec {
    algorithms: HashMap<AlgorithmVariant, Box<dyn Algorithm + Send + Sync>>,
}

impl std::fmt::Debug for ReferenceCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut supported: Vec<_> = self.algorithms.keys().collect();
        supported.sort();
        f.debug_struct("ReferenceCodec")
            .field("supported", &supported)
            .finish()
    }
}

impl ReferenceCodec {
    /// Create a codec with every implemented algorithm
    pub fn new() -> Self {
        let algorithms = AlgorithmImpl::implemented()
            .into_iter()
            .filter_map(|variant| AlgorithmImpl::create(variant).map(|algo| (variant, algo)))
            .collect();

        Self { algorithms }
    }

    fn algorithm(&self, variant: AlgorithmVariant) -> Result<&(dyn Algorithm + Send + Sync)> {
        self.algorithms
            .get(&variant)
            .map(|algorithm| &**algorithm)
            .ok_or_else(|| Error::compression_failed(variant, UNSUPPORTED))
    }

    /// Compress and wrap the payload in a framed container
    pub fn compress_framed(
        &self,
        data: &[u8],
        variant: AlgorithmVariant,
        parameters: &Parameters,
    ) -> Result<Vec<u8>> {
        let payload = self.compress(data, variant, parameters)?;
        Ok(frame::pack(variant, &payload))
    }

    /// Decompress a framed container, reading the variant from its header
    pub fn decompress_framed(&self, data: &[u8]) -> Result<(AlgorithmVariant, Vec<u8>)> {
        let (variant, payload) = frame::unpack(data)?;
        let decompressed = self.decompress(payload, variant)?;
        Ok((variant, decompressed))
    }
}

impl Default for ReferenceCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Codec for ReferenceCodec {
    fn compress(
        &self,
        data: &[u8],
        variant: AlgorithmVariant,
        parameters: &Parameters,
    ) -> Result<Vec<u8>> {
        let algorithm = self.algorithm(variant)?;
        let start_time = Instant::now();
        let compressed = algorithm.compress(data, parameters)?;

        debug!(
            "Compressed {} bytes to {} bytes with {} in {:?}",
            data.len(),
            compressed.len(),
            variant,
            start_time.elapsed()
        );
        Ok(compressed)
    }

    fn decompress(&self, data: &[u8], variant: AlgorithmVariant) -> Result<Vec<u8>> {
        let algorithm = self.algorithm(variant)?;
        let start_time = Instant::now();
        let decompressed = algorithm.decompress(data)?;

        debug!(
            "Decompressed {} bytes to {} bytes with {} in {:?}",
            data.len(),
            decompressed.len(),
            variant,
            start_time.elapsed()
        );
        Ok(decompressed)
    }

    fn supports(&self, variant: AlgorithmVariant) -> bool {
        self.algorithms.contains_key(&variant)
    }
}
